//! Database queries for order documents.
//!
//! Rows are written only after the backing file has been stored.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::entity::order_document::{self, ActiveModel, Entity as OrderDocument};
use crate::error::{AppError, AppResult};
use crate::services::documents::DocumentRepository;

use super::DbPool;

/// Document metadata produced by the upload writer, ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub order_id: Uuid,
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub mime_type: String,
}

impl DbPool {
    /// Insert one document record.
    pub async fn insert_document(&self, doc: NewDocument) -> AppResult<order_document::Model> {
        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            order_id: Set(doc.order_id),
            file_name: Set(doc.file_name),
            file_path: Set(doc.file_path),
            file_size: Set(doc.file_size),
            mime_type: Set(doc.mime_type),
            created_at: Set(Utc::now()),
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert document: {}", e)))
    }

    /// Get a document by ID.
    pub async fn get_document(&self, id: Uuid) -> AppResult<Option<order_document::Model>> {
        OrderDocument::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get document: {}", e)))
    }

    /// List documents for an order, oldest first.
    pub async fn list_documents_for_order(
        &self,
        order_id: Uuid,
    ) -> AppResult<Vec<order_document::Model>> {
        OrderDocument::find()
            .filter(order_document::Column::OrderId.eq(order_id))
            .order_by_asc(order_document::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list documents: {}", e)))
    }
}

#[async_trait]
impl DocumentRepository for DbPool {
    async fn find_document_by_id(&self, id: Uuid) -> AppResult<Option<order_document::Model>> {
        self.get_document(id).await
    }
}
