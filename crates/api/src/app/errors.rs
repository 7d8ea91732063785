use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use pollsite_infra::StoreError;

/// Message of the 404 page for a question id that matches no question.
pub const QUESTION_NOT_FOUND: &str = "No Question matches the given query.";

/// Minimal HTML error page.
///
/// `title` and `message` are compile-time constants, so they are written
/// without escaping; never pass request or store data here.
pub fn html_error(status: StatusCode, title: &'static str, message: &'static str) -> Response {
    let body = format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n\
         <head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
         <body>\n<h1>{title}</h1>\n<p>{message}</p>\n</body>\n</html>\n"
    );
    (status, Html(body)).into_response()
}

pub fn not_found(message: &'static str) -> Response {
    html_error(StatusCode::NOT_FOUND, "Not Found", message)
}

pub fn server_error() -> Response {
    html_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Server Error",
        "The server could not complete the request.",
    )
}

/// Map a store fault to a 5xx page. The fault text is logged, never rendered.
pub fn store_error_to_response(operation: &'static str, err: StoreError) -> Response {
    tracing::error!(operation, error = %err, "store fault");
    if err.is_unavailable() {
        html_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "Service Unavailable",
            "The poll store is unavailable. Try again later.",
        )
    } else {
        server_error()
    }
}
