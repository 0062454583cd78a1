//! Order API handlers.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use tokio::sync::Semaphore;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::AdminAuth;
use crate::config::UploadSettings;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    AttachDocumentsResponse, CreateOrderResponse, DocumentListResponse, DocumentResponse,
    DocumentUploadForm, OrderResponse, OrderUploadForm,
};
use crate::services::{DocumentStorage, orders, read_upload_form};

fn parse_order_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidInput("Invalid order ID".to_string()))
}

/// Create an order, optionally with documents.
///
/// Multipart form fields: `order_number` (required), `supplier`, `notes`.
/// Every part with a filename is stored as a document of the new order.
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    tag = "Orders",
    request_body(content = OrderUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Order created", body = CreateOrderResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 413, description = "Upload too large", body = crate::error::ErrorResponse),
        (status = 503, description = "Too many concurrent uploads", body = crate::error::ErrorResponse),
    )
)]
pub async fn create_order(
    pool: web::Data<DbPool>,
    storage: web::Data<DocumentStorage>,
    limits: web::Data<UploadSettings>,
    upload_permits: web::Data<Semaphore>,
    mut payload: Multipart,
) -> AppResult<HttpResponse> {
    let _permit = upload_permits.try_acquire().map_err(|_| {
        warn!("Order upload rejected: too many concurrent uploads");
        AppError::ServiceUnavailable(
            "Too many concurrent uploads. Please try again later.".to_string(),
        )
    })?;

    let form = read_upload_form(&mut payload, limits.get_ref()).await?;
    let (order, outcome) = orders::create_order(pool.get_ref(), storage.get_ref(), form).await?;

    let documents = outcome.documents.into_iter().map(DocumentResponse::from).collect();

    Ok(HttpResponse::Created().json(CreateOrderResponse {
        order: OrderResponse::new(order, documents),
        files_failed: outcome.failed,
    }))
}

/// Get an order with its documents.
#[utoipa::path(
    get,
    path = "/api/v1/orders/{order_id}",
    tag = "Orders",
    params(
        ("order_id" = Uuid, Path, description = "Order UUID")
    ),
    responses(
        (status = 200, description = "Order", body = OrderResponse),
        (status = 400, description = "Malformed order ID", body = crate::error::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_order(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let order_id = parse_order_id(&path)?;

    let order = pool
        .get_order(order_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    let documents = pool
        .list_documents_for_order(order_id)
        .await?
        .into_iter()
        .map(DocumentResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(OrderResponse::new(order, documents)))
}

/// List the documents of an order.
#[utoipa::path(
    get,
    path = "/api/v1/orders/{order_id}/documents",
    tag = "Orders",
    params(
        ("order_id" = Uuid, Path, description = "Order UUID")
    ),
    responses(
        (status = 200, description = "Documents", body = DocumentListResponse),
        (status = 404, description = "Order not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn list_order_documents(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let order_id = parse_order_id(&path)?;

    if pool.get_order(order_id).await?.is_none() {
        return Err(AppError::NotFound("Order not found".to_string()));
    }

    let documents = pool
        .list_documents_for_order(order_id)
        .await?
        .into_iter()
        .map(DocumentResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(DocumentListResponse {
        order_id,
        documents,
    }))
}

/// Attach documents to an existing order.
#[utoipa::path(
    post,
    path = "/api/v1/orders/{order_id}/documents",
    tag = "Orders",
    params(
        ("order_id" = Uuid, Path, description = "Order UUID")
    ),
    request_body(content = DocumentUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Documents attached", body = AttachDocumentsResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::error::ErrorResponse),
        (status = 413, description = "Upload too large", body = crate::error::ErrorResponse),
        (status = 503, description = "Too many concurrent uploads", body = crate::error::ErrorResponse),
    )
)]
pub async fn attach_documents(
    pool: web::Data<DbPool>,
    storage: web::Data<DocumentStorage>,
    limits: web::Data<UploadSettings>,
    upload_permits: web::Data<Semaphore>,
    path: web::Path<String>,
    mut payload: Multipart,
) -> AppResult<HttpResponse> {
    let order_id = parse_order_id(&path)?;

    let _permit = upload_permits.try_acquire().map_err(|_| {
        warn!(order_id = %order_id, "Document upload rejected: too many concurrent uploads");
        AppError::ServiceUnavailable(
            "Too many concurrent uploads. Please try again later.".to_string(),
        )
    })?;

    let form = read_upload_form(&mut payload, limits.get_ref()).await?;
    let outcome =
        orders::attach_documents(pool.get_ref(), storage.get_ref(), order_id, form.files).await?;

    info!(
        order_id = %order_id,
        attached = outcome.documents.len(),
        failed = outcome.failed.len(),
        "Documents attached"
    );

    Ok(HttpResponse::Ok().json(AttachDocumentsResponse {
        order_id,
        documents: outcome.documents.into_iter().map(DocumentResponse::from).collect(),
        files_failed: outcome.failed,
    }))
}

/// Delete an order with all its documents (admin only).
#[utoipa::path(
    delete,
    path = "/api/v1/orders/{order_id}",
    tag = "Orders",
    params(
        ("order_id" = Uuid, Path, description = "Order UUID")
    ),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 401, description = "Missing or invalid admin key", body = crate::error::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::error::ErrorResponse),
    ),
    security(
        ("admin_key" = [])
    )
)]
pub async fn delete_order(
    _admin: AdminAuth,
    pool: web::Data<DbPool>,
    storage: web::Data<DocumentStorage>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let order_id = parse_order_id(&path)?;

    orders::delete_order(pool.get_ref(), storage.get_ref(), order_id).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Configure order routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/orders").route(web::post().to(create_order)))
        .service(
            web::resource("/orders/{order_id}")
                .route(web::get().to(get_order))
                .route(web::delete().to(delete_order)),
        )
        .service(
            web::resource("/orders/{order_id}/documents")
                .route(web::get().to(list_order_documents))
                .route(web::post().to(attach_documents)),
        );
}
