//! SeaORM entity definitions.

pub mod order;
pub mod order_document;
