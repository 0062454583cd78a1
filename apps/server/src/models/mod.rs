//! API request/response models.

pub mod document;
pub mod order;

pub use document::{DocumentListResponse, DocumentResponse};
pub use order::{
    AttachDocumentsResponse, CreateOrderResponse, DocumentUploadForm, OrderResponse,
    OrderUploadForm,
};
