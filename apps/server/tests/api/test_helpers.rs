//! Shared helpers for API tests.

use actix_web::{App, dev::ServiceResponse, test, web};
use inventory_lib::auth::AdminKey;
use inventory_lib::config::{DatabaseSettings, UploadSettings};
use inventory_lib::db::DbPool;
use inventory_lib::services::DocumentStorage;
use serde_json::Value;
use tempfile::TempDir;
use tokio::sync::Semaphore;

/// Admin key used in tests.
pub const TEST_ADMIN_KEY: &str = "test-admin-key";

const BOUNDARY: &str = "----inventory-test-boundary";

/// Database, storage and upload limits for one test.
pub struct TestContext {
    pub pool: DbPool,
    pub storage: DocumentStorage,
    pub limits: UploadSettings,
    // Dropped with the context, removing stored files.
    _dir: TempDir,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_limits(UploadSettings {
            max_upload_size: 1024 * 1024,
            max_files_per_request: 5,
            max_concurrent_uploads: 4,
        })
        .await
    }

    pub async fn with_limits(limits: UploadSettings) -> Self {
        // A single connection keeps the in-memory database alive and shared.
        let pool = DbPool::connect(&DatabaseSettings {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
        })
        .await
        .expect("Failed to open in-memory database");
        pool.run_migrations()
            .await
            .expect("Failed to run migrations");

        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let storage = DocumentStorage::new(dir.path().join("documents"));

        Self {
            pool,
            storage,
            limits,
            _dir: dir,
        }
    }
}

/// Create a test app wired like the production server.
pub async fn create_test_app(
    ctx: &TestContext,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(ctx.pool.clone()))
            .app_data(web::Data::new(ctx.storage.clone()))
            .app_data(web::Data::new(AdminKey::new(Some(TEST_ADMIN_KEY.to_string()))))
            .app_data(web::Data::new(ctx.limits))
            .app_data(web::Data::new(Semaphore::new(ctx.limits.max_concurrent_uploads)))
            .service(
                web::scope("/api/v1")
                    .configure(inventory_lib::api::configure_health_routes)
                    .configure(inventory_lib::api::configure_order_routes)
                    .configure(inventory_lib::api::configure_document_routes),
            ),
    )
    .await
}

/// Minimal multipart/form-data body builder.
#[derive(Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"documents\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// A file part without a Content-Type header.
    pub fn untyped_file(mut self, filename: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"documents\"; filename=\"{filename}\"\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Returns the Content-Type header value and the encoded body.
    pub fn build(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        (format!("multipart/form-data; boundary={BOUNDARY}"), self.body)
    }
}

/// POST a multipart body and return status plus JSON response.
pub async fn post_multipart<S>(app: &S, uri: &str, body: MultipartBody) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let (content_type, payload) = body.build();
    let req = test::TestRequest::post()
        .uri(uri)
        .insert_header(("Content-Type", content_type))
        .set_payload(payload)
        .to_request();

    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

/// Create an order with the given files and return the response body.
pub async fn create_order_with_files<S>(app: &S, files: &[(&str, &str, &[u8])]) -> Value
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let mut body = MultipartBody::new()
        .text("order_number", "PO-1001")
        .text("supplier", "Acme Laptops");
    for (name, content_type, data) in files {
        body = body.file(name, content_type, data);
    }

    let (status, json) = post_multipart(app, "/api/v1/orders", body).await;
    assert_eq!(status, 201, "Order creation failed: {}", json);
    json
}

/// GET a URI and return status, headers of interest and raw body.
pub async fn get_raw<S>(app: &S, uri: &str) -> (u16, Option<String>, Option<String>, Vec<u8>)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let req = test::TestRequest::get().uri(uri).to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    let header = |name: actix_web::http::header::HeaderName| {
        resp.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    };
    let content_type = header(actix_web::http::header::CONTENT_TYPE);
    let disposition = header(actix_web::http::header::CONTENT_DISPOSITION);
    let body = test::read_body(resp).await.to_vec();
    (status, content_type, disposition, body)
}
