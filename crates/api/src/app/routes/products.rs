use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    routing::post,
};
use serde::Deserialize;

use shopkeeper_core::ProductId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_product).get(list_products))
        .route("/count", get(count_products))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

#[derive(Debug, Deserialize)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub brand: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CountFilter {
    pub brand: String,
    pub name: String,
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::ProductBody>,
) -> axum::response::Response {
    match services.catalog.add_product(body.into_add_request()) {
        Ok(product) => {
            (StatusCode::CREATED, Json(dto::product_to_json(&product))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.catalog.product(id) {
        Ok(product) => (StatusCode::OK, Json(dto::product_to_json(&product))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::ProductBody>,
) -> axum::response::Response {
    let id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services
        .catalog
        .update_product(id, body.into_update_request())
    {
        Ok(product) => (StatusCode::OK, Json(dto::product_to_json(&product))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.catalog.delete_product(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// List products, optionally filtered. `category`/`brand` combine, as do
/// `brand`/`name`; the remaining combinations are not part of the query
/// surface.
pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(filter): Query<ProductFilter>,
) -> axum::response::Response {
    let result = match (
        filter.category.as_deref(),
        filter.brand.as_deref(),
        filter.name.as_deref(),
    ) {
        (None, None, None) => services.catalog.products(),
        (Some(category), None, None) => services.catalog.products_by_category(category),
        (None, Some(brand), None) => services.catalog.products_by_brand(brand),
        (Some(category), Some(brand), None) => {
            services.catalog.products_by_category_and_brand(category, brand)
        }
        (None, None, Some(name)) => services.catalog.products_by_name(name),
        (None, Some(brand), Some(name)) => {
            services.catalog.products_by_brand_and_name(brand, name)
        }
        _ => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_filter",
                "category cannot be combined with name",
            );
        }
    };

    match result {
        Ok(items) => {
            let items = items.iter().map(dto::product_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn count_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(filter): Query<CountFilter>,
) -> axum::response::Response {
    match services
        .catalog
        .count_products_by_brand_and_name(&filter.brand, &filter.name)
    {
        Ok(count) => (StatusCode::OK, Json(serde_json::json!({ "count": count }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
