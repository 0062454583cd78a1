//! Inventory orders server library.
//!
//! Purchase orders for school laptop inventory and the documents attached to
//! them: upload, storage on the local filesystem, metadata in a relational
//! database, and download/print retrieval.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
