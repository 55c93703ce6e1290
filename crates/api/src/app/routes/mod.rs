use axum::Router;

pub mod categories;
pub mod images;
pub mod products;
pub mod system;

/// Router for all `/api/v1` endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/api/v1/products", products::router())
        .nest("/api/v1/categories", categories::router())
        .nest("/api/v1/images", images::router())
}
