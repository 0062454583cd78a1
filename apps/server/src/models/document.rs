//! Document API models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::order_document;

/// Document metadata as returned by the API.
///
/// The on-disk path is never exposed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentResponse {
    pub id: Uuid,
    pub order_id: Uuid,
    pub file_name: String,
    pub file_size: i64,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
    /// Relative URL that downloads the document.
    pub download_url: String,
    /// Relative URL that opens the document inline.
    pub print_url: String,
}

impl From<order_document::Model> for DocumentResponse {
    fn from(model: order_document::Model) -> Self {
        Self {
            download_url: format!("/api/v1/documents/{}/download", model.id),
            print_url: format!("/api/v1/documents/{}/print", model.id),
            id: model.id,
            order_id: model.order_id,
            file_name: model.file_name,
            file_size: model.file_size,
            mime_type: model.mime_type,
            created_at: model.created_at,
        }
    }
}

/// Documents belonging to one order.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentListResponse {
    pub order_id: Uuid,
    pub documents: Vec<DocumentResponse>,
}
