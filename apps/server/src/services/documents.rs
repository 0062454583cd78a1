//! Document retrieval for download and inline viewing.
//!
//! Metadata is resolved through a [`DocumentRepository`], then the backing
//! file is checked and read in full. A missing row and a missing file are
//! reported as different errors even though both surface as 404.

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::entity::order_document;
use crate::error::{AppError, AppResult};

/// Read access to document metadata.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn find_document_by_id(&self, id: Uuid) -> AppResult<Option<order_document::Model>>;
}

/// How the client should present a retrieved document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Save as a file.
    Attachment,
    /// Display in the browser (print preview).
    Inline,
}

impl DeliveryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attachment => "attachment",
            Self::Inline => "inline",
        }
    }
}

/// Document bytes plus the headers to send with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievedDocument {
    pub content: Vec<u8>,
    pub content_type: String,
    pub content_disposition: String,
}

/// Retrieval failures.
#[derive(Debug, thiserror::Error)]
pub enum RetrieveError {
    #[error("Document not found")]
    DocumentNotFound,

    #[error("File not found on disk: {path}")]
    FileMissing { path: String },

    #[error("{0}")]
    Internal(String),
}

impl RetrieveError {
    /// Map to an API error; unexpected failures carry `public` as their message.
    pub fn into_app_error(self, public: &'static str) -> AppError {
        match self {
            Self::DocumentNotFound => AppError::NotFound("Document not found".to_string()),
            Self::FileMissing { path } => AppError::FileMissing { path },
            Self::Internal(detail) => AppError::Internal { public, detail },
        }
    }
}

/// Resolve a document and load its contents.
pub async fn retrieve<R>(
    repo: &R,
    document_id: Uuid,
    mode: DeliveryMode,
) -> Result<RetrievedDocument, RetrieveError>
where
    R: DocumentRepository + ?Sized,
{
    let document = repo
        .find_document_by_id(document_id)
        .await
        .map_err(|e| RetrieveError::Internal(e.to_string()))?
        .ok_or(RetrieveError::DocumentNotFound)?;

    let exists = tokio::fs::try_exists(&document.file_path)
        .await
        .map_err(|e| RetrieveError::Internal(format!("Failed to stat {}: {}", document.file_path, e)))?;
    if !exists {
        return Err(RetrieveError::FileMissing {
            path: document.file_path,
        });
    }

    let content = match tokio::fs::read(&document.file_path).await {
        Ok(content) => content,
        // Removed between the existence check and the read.
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(RetrieveError::FileMissing {
                path: document.file_path,
            });
        }
        Err(e) => {
            return Err(RetrieveError::Internal(format!(
                "Failed to read {}: {}",
                document.file_path, e
            )));
        }
    };

    debug!(
        document_id = %document_id,
        mode = mode.as_str(),
        size = content.len(),
        "Loaded document"
    );

    Ok(RetrievedDocument {
        content,
        content_disposition: content_disposition(mode, &document.file_name),
        content_type: document.mime_type,
    })
}

/// Build a `Content-Disposition` value for the given display name.
///
/// The name is emitted as a quoted-string with `"` and `\` escaped and
/// control characters dropped. Non-ASCII names get an ASCII fallback in
/// `filename` plus an RFC 5987 `filename*` parameter.
pub fn content_disposition(mode: DeliveryMode, file_name: &str) -> String {
    let visible: String = file_name.chars().filter(|c| !c.is_control()).collect();

    let fallback: String = visible
        .chars()
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect();
    let quoted = fallback.replace('\\', "\\\\").replace('"', "\\\"");

    if visible.is_ascii() {
        format!("{}; filename=\"{}\"", mode.as_str(), quoted)
    } else {
        format!(
            "{}; filename=\"{}\"; filename*=UTF-8''{}",
            mode.as_str(),
            quoted,
            urlencoding::encode(&visible)
        )
    }
}
