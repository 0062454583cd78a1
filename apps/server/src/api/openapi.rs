//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models, services};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inventory Orders Server",
        version = "0.1.0",
        description = "Purchase orders and their attached documents for school laptop inventory"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Order endpoints
        api::orders::create_order,
        api::orders::get_order,
        api::orders::list_order_documents,
        api::orders::attach_documents,
        api::orders::delete_order,
        // Document endpoints
        api::documents::download_document,
        api::documents::print_document,
    ),
    components(
        schemas(
            error::ErrorResponse,
            api::health::HealthResponse,
            api::health::ReadyResponse,
            models::OrderResponse,
            models::CreateOrderResponse,
            models::AttachDocumentsResponse,
            models::DocumentResponse,
            models::DocumentListResponse,
            models::OrderUploadForm,
            models::DocumentUploadForm,
            services::FailedFile,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Orders", description = "Order creation, document attachment and deletion"),
        (name = "Documents", description = "Document download and print")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Add admin key security scheme.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "admin_key",
                utoipa::openapi::security::SecurityScheme::ApiKey(
                    utoipa::openapi::security::ApiKey::Header(
                        utoipa::openapi::security::ApiKeyValue::new(
                            crate::config::ADMIN_KEY_HEADER,
                        ),
                    ),
                ),
            );
        }
    }
}
