//! API endpoint modules.

pub mod documents;
pub mod health;
pub mod openapi;
pub mod orders;

pub use documents::configure_routes as configure_document_routes;
pub use health::configure_health_routes;
pub use openapi::ApiDoc;
pub use orders::configure_routes as configure_order_routes;
