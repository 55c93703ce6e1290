use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shopkeeper_core::{Entity, ProductId};

use crate::category::Category;

/// Sellable item entity with price, inventory and a single category reference.
///
/// The category reference is mandatory: a product is only persisted against a
/// category that already exists in the store. Price and inventory bounds are
/// not validated here; callers supply whatever they like.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub price: Decimal,
    pub inventory: i32,
    pub description: String,
    pub category: Category,
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &ProductId {
        &self.id
    }
}

/// A product that has not been persisted yet.
///
/// `category` must already be persisted; the coordinator guarantees this by
/// resolving the category before constructing one of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub brand: String,
    pub price: Decimal,
    pub inventory: i32,
    pub description: String,
    pub category: Category,
}
