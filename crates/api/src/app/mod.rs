//! HTTP API application wiring (axum router + service wiring).
//!
//! If you're new to Rust, this folder is structured like:
//! - `services.rs`: infrastructure wiring (store selection, service construction)
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app() -> Router {
    let services = Arc::new(services::build_services().await);

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router().layer(Extension(services)))
        .layer(ServiceBuilder::new())
}
