//! Document download and print handlers.

use actix_web::http::header;
use actix_web::{HttpResponse, web};
use tracing::info;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::services::documents::{self, DeliveryMode};

/// Download a stored document as an attachment.
#[utoipa::path(
    get,
    path = "/api/v1/documents/{document_id}/download",
    tag = "Documents",
    params(
        ("document_id" = Uuid, Path, description = "Document UUID")
    ),
    responses(
        (status = 200, description = "Document bytes", content_type = "application/octet-stream"),
        (status = 400, description = "Malformed document ID", body = crate::error::ErrorResponse),
        (status = 404, description = "Document or file not found", body = crate::error::ErrorResponse),
        (status = 500, description = "Failed to download document", body = crate::error::ErrorResponse),
    )
)]
pub async fn download_document(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    serve_document(
        pool.get_ref(),
        &path,
        DeliveryMode::Attachment,
        "Failed to download document",
    )
    .await
}

/// Open a stored document inline (print preview).
#[utoipa::path(
    get,
    path = "/api/v1/documents/{document_id}/print",
    tag = "Documents",
    params(
        ("document_id" = Uuid, Path, description = "Document UUID")
    ),
    responses(
        (status = 200, description = "Document bytes", content_type = "application/octet-stream"),
        (status = 400, description = "Malformed document ID", body = crate::error::ErrorResponse),
        (status = 404, description = "Document or file not found", body = crate::error::ErrorResponse),
        (status = 500, description = "Failed to load document", body = crate::error::ErrorResponse),
    )
)]
pub async fn print_document(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    serve_document(
        pool.get_ref(),
        &path,
        DeliveryMode::Inline,
        "Failed to load document",
    )
    .await
}

async fn serve_document(
    pool: &DbPool,
    raw_id: &str,
    mode: DeliveryMode,
    failure_message: &'static str,
) -> AppResult<HttpResponse> {
    let document_id = Uuid::parse_str(raw_id)
        .map_err(|_| AppError::InvalidInput("Invalid document ID".to_string()))?;

    let document = documents::retrieve(pool, document_id, mode)
        .await
        .map_err(|e| e.into_app_error(failure_message))?;

    info!(
        document_id = %document_id,
        mode = mode.as_str(),
        size = document.content.len(),
        "Serving document"
    );

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, document.content_type))
        .insert_header((header::CONTENT_DISPOSITION, document.content_disposition))
        .body(document.content))
}

/// Configure document routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/documents/{document_id}/download").route(web::get().to(download_document)),
    )
    .service(web::resource("/documents/{document_id}/print").route(web::get().to(print_document)));
}
