//! Database queries for orders.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entity::order::{self, ActiveModel, Entity as Order};
use crate::entity::order_document::{self, Entity as OrderDocument};
use crate::error::{AppError, AppResult};

use super::DbPool;

/// Order fields supplied by the caller.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_number: String,
    pub supplier: Option<String>,
    pub notes: Option<String>,
}

impl DbPool {
    /// Insert a new order.
    pub async fn insert_order(&self, new_order: NewOrder) -> AppResult<order::Model> {
        let now = Utc::now();
        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            order_number: Set(new_order.order_number),
            supplier: Set(new_order.supplier),
            notes: Set(new_order.notes),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert order: {}", e)))
    }

    /// Get an order by ID.
    pub async fn get_order(&self, id: Uuid) -> AppResult<Option<order::Model>> {
        Order::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get order: {}", e)))
    }

    /// Delete an order and its document rows in one transaction.
    /// Returns false if the order did not exist.
    pub async fn delete_order_with_documents(&self, id: Uuid) -> AppResult<bool> {
        let txn = self.connection().begin().await?;

        let documents = OrderDocument::delete_many()
            .filter(order_document::Column::OrderId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete order documents: {}", e)))?;

        let orders = Order::delete_many()
            .filter(order::Column::Id.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete order: {}", e)))?;

        txn.commit().await?;

        if orders.rows_affected > 0 {
            tracing::info!(
                order_id = %id,
                documents = documents.rows_affected,
                "Order deleted"
            );
        }

        Ok(orders.rows_affected > 0)
    }
}
