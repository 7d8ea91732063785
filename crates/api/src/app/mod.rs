//! HTTP application wiring (Axum router + service wiring).
//!
//! Layout of this folder:
//! - `services.rs`: store selection and shared per-process state
//! - `templates.rs`: Handlebars registry with the embedded page templates
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: template contexts and form payloads
//! - `errors.rs`: consistent error pages

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;
pub mod templates;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: AppServices) -> Router {
    let services = Arc::new(services);

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .fallback(routes::system::fallback)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(Extension(services)),
        )
}
