//! API test suite for orders and order documents.
//!
//! Runs against an in-memory SQLite database and a temporary documents
//! directory, so no external services are needed.
//!
//! Run with: cargo test --test api

mod test_helpers;

mod test_documents;
