//! Local filesystem storage for order documents.
//!
//! Files live under `{documents_dir}/{order_id}/{millis}_{uuid}_{safe_name}`.
//! The client-supplied name only contributes a sanitized suffix, so it can
//! never steer the write outside the order directory.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::db::NewDocument;
use crate::error::{AppError, AppResult};

/// Content type recorded when the client declares none.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Longest sanitized name suffix kept in a stored file name.
const MAX_SAFE_NAME_LEN: usize = 100;

/// A file received from the client, fully buffered.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    /// Original client-supplied name.
    pub name: String,
    /// Client-declared content type.
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl IncomingFile {
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// A file from the batch that could not be written.
#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
pub struct FailedFile {
    pub file: String,
    pub reason: String,
}

/// Result of storing a batch of files.
#[derive(Debug, Default)]
pub struct StoreOutcome {
    /// One entry per written file, in input order.
    pub stored: Vec<NewDocument>,
    pub failed: Vec<FailedFile>,
}

/// Writes order documents to the local content directory.
#[derive(Debug, Clone)]
pub struct DocumentStorage {
    root: PathBuf,
}

impl DocumentStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding all documents of one order.
    pub fn order_dir(&self, order_id: Uuid) -> PathBuf {
        self.root.join(order_id.to_string())
    }

    /// Store a batch of files for an order.
    ///
    /// The order directory is created first (idempotent). Each file is then
    /// written independently: a failed write is reported in
    /// `StoreOutcome::failed` and does not stop the rest of the batch.
    /// Nothing is written to the database here.
    pub async fn store(&self, order_id: Uuid, files: Vec<IncomingFile>) -> AppResult<StoreOutcome> {
        let order_dir = self.order_dir(order_id);

        tokio::fs::create_dir_all(&order_dir).await.map_err(|e| {
            AppError::FileSystem(format!(
                "Failed to create order directory {}: {}",
                order_dir.display(),
                e
            ))
        })?;

        let mut outcome = StoreOutcome::default();

        for file in files {
            let path = order_dir.join(stored_file_name(&file.name));

            match tokio::fs::write(&path, &file.data).await {
                Ok(()) => {
                    debug!(
                        order_id = %order_id,
                        path = %path.display(),
                        size = file.size(),
                        "Stored document"
                    );
                    outcome.stored.push(NewDocument {
                        order_id,
                        file_path: path.to_string_lossy().into_owned(),
                        file_size: file.size() as i64,
                        mime_type: file
                            .content_type
                            .filter(|ct| !ct.trim().is_empty())
                            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()),
                        file_name: file.name,
                    });
                }
                Err(e) => {
                    warn!(
                        order_id = %order_id,
                        file = %file.name,
                        "Failed to write document: {}",
                        e
                    );
                    outcome.failed.push(FailedFile {
                        file: file.name,
                        reason: "Failed to write file".to_string(),
                    });
                }
            }
        }

        info!(
            order_id = %order_id,
            stored = outcome.stored.len(),
            failed = outcome.failed.len(),
            "Document batch stored"
        );

        Ok(outcome)
    }

    /// Remove an order's directory and everything in it.
    /// A missing directory is not an error.
    pub async fn remove_order_dir(&self, order_id: Uuid) -> AppResult<()> {
        let dir = self.order_dir(order_id);
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::FileSystem(format!(
                "Failed to remove {}: {}",
                dir.display(),
                e
            ))),
        }
    }
}

/// Build the on-disk name for an uploaded file.
///
/// Format: `{millis}_{uuid}_{safe_name}`.
fn stored_file_name(original: &str) -> String {
    format!(
        "{}_{}_{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple(),
        safe_name(original)
    )
}

/// Reduce a client-supplied name to a single safe path segment.
fn safe_name(original: &str) -> String {
    // Keep only the last path segment of whatever the client sent.
    let base = original.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_start_matches('.');
    let truncated: String = if trimmed.len() > MAX_SAFE_NAME_LEN {
        // Keep the tail so the extension survives.
        trimmed[trimmed.len() - MAX_SAFE_NAME_LEN..].to_string()
    } else {
        trimmed.to_string()
    };

    if truncated.is_empty() {
        "file".to_string()
    } else {
        truncated
    }
}
