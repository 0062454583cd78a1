//! Inventory orders server - main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware.

use actix_cors::Cors;
use actix_web::{App, HttpServer, http::header, web};
use tokio::sync::Semaphore;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use inventory_lib::api::{self, ApiDoc};
use inventory_lib::auth::AdminKey;
use inventory_lib::config::Config;
use inventory_lib::db::DbPool;
use inventory_lib::middleware::RequestLogger;
use inventory_lib::services::DocumentStorage;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    // Used by the container HEALTHCHECK: only verifies that configuration loads.
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(if Config::from_env().is_ok() { 0 } else { 1 });
    }

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - In production, DATABASE_URL must not use the development default");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  Inventory Orders Server");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
    }

    tokio::fs::create_dir_all(&config.documents_dir)
        .await
        .expect("Failed to create documents directory");

    let pool = DbPool::new(&config)
        .await
        .expect("Failed to initialize database");
    info!("Database connection established");

    pool.run_migrations()
        .await
        .expect("Failed to run migrations");

    let admin_key = AdminKey::new(config.admin_key.clone());
    if !admin_key.is_configured() {
        warn!("No admin key configured: order deletion is disabled");
    }

    let storage = DocumentStorage::new(config.documents_dir.clone());
    info!("Documents directory: {}", storage.root().display());
    let upload_settings = config.upload;
    // Shared across workers so the limit is process-wide.
    let upload_permits = web::Data::new(Semaphore::new(upload_settings.max_concurrent_uploads));
    info!(
        "Upload limits: {}MB per request, {} files per request, {} concurrent uploads",
        upload_settings.max_upload_size / 1024 / 1024,
        upload_settings.max_files_per_request,
        upload_settings.max_concurrent_uploads
    );

    let bind_address = config.bind_address();
    let is_development = config.is_development();
    let worker_count = if is_development { 4 } else { num_cpus::get() };
    info!(
        "Starting server at http://{} ({} workers)",
        bind_address, worker_count
    );

    let server = HttpServer::new(move || {
        let cors = if is_development {
            Cors::default()
                .allowed_origin("http://localhost:3000")
                .allowed_origin("http://127.0.0.1:3000")
        } else {
            Cors::default()
        }
        .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-admin-key"),
        ])
        .expose_headers(vec![header::CONTENT_DISPOSITION])
        .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(RequestLogger)
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(admin_key.clone()))
            .app_data(web::Data::new(upload_settings))
            .app_data(upload_permits.clone())
            .service(
                web::scope("/api/v1")
                    .configure(api::configure_health_routes)
                    .configure(api::configure_order_routes)
                    .configure(api::configure_document_routes),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    });

    server.workers(worker_count).bind(&bind_address)?.run().await
}
