use axum::Router;

pub mod polls;
pub mod system;

/// Router for the polls pages.
pub fn router() -> Router {
    polls::router()
}
