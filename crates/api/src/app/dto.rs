use rust_decimal::Decimal;
use serde::Deserialize;

use shopkeeper_catalog::{AddProductRequest, Category, Product, UpdateProductRequest};
use shopkeeper_media::Image;

// -------------------------
// Request DTOs
// -------------------------

/// Product payload: create and update both take the full field set (updates
/// are full replacement, not a partial merge).
#[derive(Debug, Deserialize)]
pub struct ProductBody {
    pub name: String,
    pub brand: String,
    pub price: Decimal,
    pub inventory: i32,
    pub description: String,
    pub category: String,
}

impl ProductBody {
    pub fn into_add_request(self) -> AddProductRequest {
        AddProductRequest {
            name: self.name,
            brand: self.brand,
            price: self.price,
            inventory: self.inventory,
            description: self.description,
            category: self.category,
        }
    }

    pub fn into_update_request(self) -> UpdateProductRequest {
        UpdateProductRequest {
            name: self.name,
            brand: self.brand,
            price: self.price,
            inventory: self.inventory,
            description: self.description,
            category: self.category,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CategoryBody {
    pub name: String,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn category_to_json(category: &Category) -> serde_json::Value {
    serde_json::json!({
        "id": category.id.as_i64(),
        "name": category.name,
    })
}

pub fn product_to_json(product: &Product) -> serde_json::Value {
    serde_json::json!({
        "id": product.id.as_i64(),
        "name": product.name,
        "brand": product.brand,
        "price": product.price,
        "inventory": product.inventory,
        "description": product.description,
        "category": category_to_json(&product.category),
    })
}

/// Image metadata only; the bytes are served by the download route.
pub fn image_to_json(image: &Image) -> serde_json::Value {
    serde_json::json!({
        "id": image.id.as_i64(),
        "file_name": image.file_name,
        "file_type": image.file_type,
        "size_bytes": image.data.len(),
        "download_url": image.download_url,
        "product_id": image.product_id.as_i64(),
    })
}
