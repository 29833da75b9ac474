// handlers/mod.rs - 2-Tier Handler Architecture
//
// Public (session only) → Protected (signed-in and allow-listed)

pub mod public;    // Tier 1: /api/articles, /auth/*, /isAuthenticated, /logout
pub mod protected; // Tier 2: /admin, /edit, /delete, /upload-article

use std::path::Path;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

/// Body sent when an HTML-facing route fails internally
pub const SERVER_ERROR_TEXT: &str = "Server Error";

/// Read a page from the admin pages directory and serve it as HTML
pub async fn serve_page(pages_dir: &Path, file_name: &str) -> Response {
    let path = pages_dir.join(file_name);
    match tokio::fs::read_to_string(&path).await {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            tracing::error!("Failed to read page {}: {}", path.display(), e);
            server_error()
        }
    }
}

pub fn server_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR_TEXT).into_response()
}
