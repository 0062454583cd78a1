//! Order creation and document attachment.
//!
//! Files are always written before their metadata rows. There is no
//! rollback: a file whose row fails to insert stays on disk and is reported
//! back as failed.

use tracing::{info, warn};
use uuid::Uuid;

use crate::db::{DbPool, NewOrder};
use crate::entity::{order, order_document};
use crate::error::{AppError, AppResult};

use super::storage::{DocumentStorage, FailedFile, IncomingFile};
use super::upload::UploadForm;

/// Documents recorded for an order plus per-file failures.
#[derive(Debug, Default)]
pub struct AttachOutcome {
    pub documents: Vec<order_document::Model>,
    pub failed: Vec<FailedFile>,
}

/// Validate the order fields of an upload form.
pub fn new_order_from_form(form: &UploadForm) -> AppResult<NewOrder> {
    let order_number = form.field("order_number").ok_or_else(|| {
        AppError::InvalidInput("Missing required field: order_number".to_string())
    })?;

    check_length("order_number", &order_number, MAX_ORDER_NUMBER_CHARS)?;

    let supplier = form.field("supplier");
    if let Some(supplier) = &supplier {
        check_length("supplier", supplier, MAX_SUPPLIER_CHARS)?;
    }

    Ok(NewOrder {
        order_number,
        supplier,
        notes: form.field("notes"),
    })
}

/// Column widths of `orders`, counted in characters as the database does.
const MAX_ORDER_NUMBER_CHARS: usize = 100;
const MAX_SUPPLIER_CHARS: usize = 255;

fn check_length(field: &str, value: &str, max_chars: usize) -> AppResult<()> {
    if value.chars().count() > max_chars {
        return Err(AppError::InvalidInput(format!(
            "{} must be at most {} characters",
            field, max_chars
        )));
    }
    Ok(())
}

/// Create an order and store its documents.
pub async fn create_order(
    pool: &DbPool,
    storage: &DocumentStorage,
    form: UploadForm,
) -> AppResult<(order::Model, AttachOutcome)> {
    let new_order = new_order_from_form(&form)?;
    let order = pool.insert_order(new_order).await?;

    info!(
        order_id = %order.id,
        order_number = %order.order_number,
        files = form.files.len(),
        "Order created"
    );

    let outcome = store_and_record(pool, storage, order.id, form.files).await?;
    Ok((order, outcome))
}

/// Attach documents to an existing order.
pub async fn attach_documents(
    pool: &DbPool,
    storage: &DocumentStorage,
    order_id: Uuid,
    files: Vec<IncomingFile>,
) -> AppResult<AttachOutcome> {
    pool.get_order(order_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    if files.is_empty() {
        return Err(AppError::InvalidInput("No files provided".to_string()));
    }

    store_and_record(pool, storage, order_id, files).await
}

/// Delete an order, its document rows, and its stored files.
pub async fn delete_order(pool: &DbPool, storage: &DocumentStorage, order_id: Uuid) -> AppResult<()> {
    if !pool.delete_order_with_documents(order_id).await? {
        return Err(AppError::NotFound("Order not found".to_string()));
    }

    if let Err(e) = storage.remove_order_dir(order_id).await {
        warn!(order_id = %order_id, "Order deleted but files were not removed: {}", e);
    }

    Ok(())
}

async fn store_and_record(
    pool: &DbPool,
    storage: &DocumentStorage,
    order_id: Uuid,
    files: Vec<IncomingFile>,
) -> AppResult<AttachOutcome> {
    if files.is_empty() {
        return Ok(AttachOutcome::default());
    }

    let stored = storage.store(order_id, files).await?;
    let mut outcome = AttachOutcome {
        documents: Vec::with_capacity(stored.stored.len()),
        failed: stored.failed,
    };

    for new_document in stored.stored {
        let file_name = new_document.file_name.clone();
        match pool.insert_document(new_document).await {
            Ok(document) => outcome.documents.push(document),
            Err(e) => {
                warn!(order_id = %order_id, file = %file_name, "Failed to record document: {}", e);
                outcome.failed.push(FailedFile {
                    file: file_name,
                    reason: "Failed to record document".to_string(),
                });
            }
        }
    }

    Ok(outcome)
}
