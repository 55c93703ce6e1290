//! Write requests accepted by the coordinator.
//!
//! These are plain structured records; the HTTP layer parses wire formats
//! into them. Both carry the category by *name* — the coordinator resolves
//! the name to a persisted record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Payload for creating a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddProductRequest {
    pub name: String,
    pub brand: String,
    pub price: Decimal,
    pub inventory: i32,
    pub description: String,
    pub category: String,
}

/// Full-replacement payload for updating a product.
///
/// Every field must be supplied, even if unchanged; the coordinator
/// overwrites the stored record field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateProductRequest {
    pub name: String,
    pub brand: String,
    pub price: Decimal,
    pub inventory: i32,
    pub description: String,
    pub category: String,
}
