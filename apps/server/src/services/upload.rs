//! Multipart form reading for order document uploads.
//!
//! Text fields are collected into a map; every part carrying a filename is
//! buffered as an [`IncomingFile`]. Limits are enforced while streaming so an
//! oversized request is rejected before it is fully read.

use std::collections::HashMap;

use actix_multipart::{Field, Multipart};
use futures_util::StreamExt;
use tracing::debug;

use crate::config::UploadSettings;
use crate::error::{AppError, AppResult};

use super::storage::IncomingFile;

/// Longest accepted text field value, in bytes.
const MAX_TEXT_FIELD_LEN: usize = 4096;

/// Parsed multipart form.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub fields: HashMap<String, String>,
    pub files: Vec<IncomingFile>,
}

impl UploadForm {
    /// Get a trimmed, non-empty text field.
    pub fn field(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(String::from)
    }
}

/// Read a whole multipart payload, enforcing upload limits.
pub async fn read_upload_form(
    payload: &mut Multipart,
    limits: &UploadSettings,
) -> AppResult<UploadForm> {
    let mut form = UploadForm::default();
    let mut total_size: usize = 0;

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::InvalidInput(format!("Multipart error: {}", e)))?;

        let content_disposition = field
            .content_disposition()
            .ok_or_else(|| AppError::InvalidInput("Missing content disposition".to_string()))?;

        let field_name = content_disposition.get_name().unwrap_or_default().to_string();
        let filename = content_disposition.get_filename().map(String::from);

        match filename {
            Some(name) => {
                let content_type = field.content_type().map(|m| m.essence_str().to_string());
                let data = read_field(&mut field, limits.max_upload_size, &mut total_size).await?;

                // Browsers submit an empty part for an untouched file input.
                if name.is_empty() && data.is_empty() {
                    continue;
                }

                if form.files.len() >= limits.max_files_per_request {
                    return Err(AppError::InvalidInput(format!(
                        "Too many files: at most {} per request",
                        limits.max_files_per_request
                    )));
                }

                debug!(file = %name, size = data.len(), "Received upload part");
                form.files.push(IncomingFile {
                    name,
                    content_type,
                    data,
                });
            }
            None => {
                let data = read_field(&mut field, limits.max_upload_size, &mut total_size).await?;
                if data.len() > MAX_TEXT_FIELD_LEN {
                    return Err(AppError::InvalidInput(format!(
                        "Field '{}' is too long",
                        field_name
                    )));
                }
                let value = String::from_utf8(data).map_err(|_| {
                    AppError::InvalidInput(format!("Field '{}' is not valid UTF-8", field_name))
                })?;
                form.fields.insert(field_name, value);
            }
        }
    }

    Ok(form)
}

/// Buffer one field, failing once the request total passes `max_total`.
async fn read_field(
    field: &mut Field,
    max_total: usize,
    total_size: &mut usize,
) -> AppResult<Vec<u8>> {
    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| AppError::InvalidInput(format!("Read error: {}", e)))?;
        *total_size += chunk.len();
        if *total_size > max_total {
            return Err(AppError::PayloadTooLarge(format!(
                "Upload exceeds limit of {} bytes",
                max_total
            )));
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}
