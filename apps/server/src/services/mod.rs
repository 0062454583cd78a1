//! Business logic services.

pub mod documents;
pub mod orders;
pub mod storage;
pub mod upload;

pub use documents::{DeliveryMode, DocumentRepository, RetrieveError, RetrievedDocument};
pub use storage::{DocumentStorage, FailedFile, IncomingFile, StoreOutcome};
pub use upload::{UploadForm, read_upload_form};
