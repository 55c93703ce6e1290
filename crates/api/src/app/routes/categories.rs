use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;

use shopkeeper_catalog::NewCategory;
use shopkeeper_core::CategoryId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_category).get(list_categories))
        .route(
            "/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
}

#[derive(Debug, Deserialize)]
pub struct CategoryFilter {
    pub name: Option<String>,
}

pub async fn create_category(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CategoryBody>,
) -> axum::response::Response {
    match services.catalog.add_category(NewCategory::new(body.name)) {
        Ok(category) => {
            (StatusCode::CREATED, Json(dto::category_to_json(&category))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// List all categories, or look one up with `?name=`.
pub async fn list_categories(
    Extension(services): Extension<Arc<AppServices>>,
    Query(filter): Query<CategoryFilter>,
) -> axum::response::Response {
    if let Some(name) = filter.name.as_deref() {
        return match services.catalog.category_by_name(name) {
            Ok(category) => {
                (StatusCode::OK, Json(dto::category_to_json(&category))).into_response()
            }
            Err(e) => errors::domain_error_to_response(e),
        };
    }

    match services.catalog.categories() {
        Ok(items) => {
            let items = items.iter().map(dto::category_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_category(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: CategoryId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.catalog.category(id) {
        Ok(category) => (StatusCode::OK, Json(dto::category_to_json(&category))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_category(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::CategoryBody>,
) -> axum::response::Response {
    let id: CategoryId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.catalog.update_category(id, body.name) {
        Ok(category) => (StatusCode::OK, Json(dto::category_to_json(&category))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_category(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: CategoryId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.catalog.delete_category(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
