use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Redirect, Response},
};
use serde::Serialize;
use serde_json::json;
use tower_sessions::Session;

use crate::auth::session;
use crate::middleware::auth::LANDING_PATH;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatus {
    pub is_authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// GET /isAuthenticated - whether this browser has a signed-in identity
///
/// Reports sign-in only; allow-list membership is never revealed.
pub async fn is_authenticated(session: Session) -> Json<AuthStatus> {
    let identity = session::current_identity(&session).await;
    Json(AuthStatus {
        is_authenticated: identity.is_some(),
        display_name: identity.map(|i| i.display_name),
    })
}

/// GET /logout - destroy the session and go back to the landing page
pub async fn logout(session: Session) -> Response {
    match session::sign_out(&session).await {
        Ok(()) => Redirect::to(LANDING_PATH).into_response(),
        Err(e) => {
            tracing::error!("Session destruction error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Session destruction error" })),
            )
                .into_response()
        }
    }
}
