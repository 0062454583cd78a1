//! Order API models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::DocumentResponse;
use crate::entity::order;
use crate::services::FailedFile;

/// An order with its documents.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub order_number: String,
    pub supplier: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub documents: Vec<DocumentResponse>,
}

impl OrderResponse {
    pub fn new(order: order::Model, documents: Vec<DocumentResponse>) -> Self {
        Self {
            id: order.id,
            order_number: order.order_number,
            supplier: order.supplier,
            notes: order.notes,
            created_at: order.created_at,
            updated_at: order.updated_at,
            documents,
        }
    }
}

/// Response for order creation.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateOrderResponse {
    pub order: OrderResponse,
    /// Files that could not be stored or recorded.
    pub files_failed: Vec<FailedFile>,
}

/// Response for attaching documents to an existing order.
#[derive(Debug, Serialize, ToSchema)]
pub struct AttachDocumentsResponse {
    pub order_id: Uuid,
    pub documents: Vec<DocumentResponse>,
    pub files_failed: Vec<FailedFile>,
}

/// Multipart form accepted by order creation (OpenAPI description only).
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct OrderUploadForm {
    pub order_number: String,
    pub supplier: Option<String>,
    pub notes: Option<String>,
    /// Any number of file parts; the part name is not significant.
    #[schema(value_type = Vec<String>, format = Binary)]
    pub documents: Vec<Vec<u8>>,
}

/// Multipart form accepted when attaching documents (OpenAPI description only).
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct DocumentUploadForm {
    #[schema(value_type = Vec<String>, format = Binary)]
    pub documents: Vec<Vec<u8>>,
}
