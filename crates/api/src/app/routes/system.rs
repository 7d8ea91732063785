use axum::{http::StatusCode, response::Response};

use crate::app::errors;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn fallback() -> Response {
    errors::not_found("The requested resource was not found on this server.")
}
