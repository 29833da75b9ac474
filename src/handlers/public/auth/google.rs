// handlers/public/auth/google.rs - GET /auth/google and its callback

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    response::Redirect,
};
use tower_sessions::Session;

use crate::app::AppState;
use crate::auth::{session, AuthError, Identity};
use crate::middleware::auth::LANDING_PATH;

/// First admin page after a successful allow-listed sign-in
pub const ADMIN_HOME_PATH: &str = "/uploadarticle";

/// GET /auth/google - send the browser to the provider's consent page
pub async fn google_login(State(state): State<AppState>, session: Session) -> Redirect {
    let Some(provider) = state.identity_provider.as_ref() else {
        tracing::warn!("Sign-in requested but no identity provider is configured");
        return Redirect::to(LANDING_PATH);
    };

    let (auth_url, pending) = match provider.authorize() {
        Ok(started) => started,
        Err(e) => {
            tracing::error!("Failed to build authorization URL: {}", e);
            return Redirect::to(LANDING_PATH);
        }
    };

    if let Err(e) = session::store_pending_login(&session, &pending).await {
        tracing::error!("Failed to store login state: {}", e);
        return Redirect::to(LANDING_PATH);
    }

    Redirect::to(&auth_url)
}

/// GET /auth/google/callback - finish sign-in, then route by allow-list membership
pub async fn google_callback(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<HashMap<String, String>>,
) -> Redirect {
    let identity = match finish_login(&state, &session, &params).await {
        Ok(identity) => identity,
        Err(e) => {
            tracing::warn!("Sign-in failed: {}", e);
            return Redirect::to(LANDING_PATH);
        }
    };

    if let Err(e) = session::sign_in(&session, &identity).await {
        tracing::error!("Failed to attach identity to session: {}", e);
        return Redirect::to(LANDING_PATH);
    }

    if state.allow_list.is_authorized(&identity.external_id) {
        tracing::info!("Admin signed in: {}", identity.display_name);
        Redirect::to(ADMIN_HOME_PATH)
    } else {
        tracing::info!("Signed in without admin access: {}", identity.display_name);
        Redirect::to(LANDING_PATH)
    }
}

async fn finish_login(
    state: &AppState,
    session: &Session,
    params: &HashMap<String, String>,
) -> Result<Identity, AuthError> {
    let provider = state
        .identity_provider
        .as_ref()
        .ok_or_else(|| AuthError::Config("no identity provider configured".to_string()))?;

    if let Some(error) = params.get("error") {
        return Err(AuthError::Exchange(format!("provider returned error: {}", error)));
    }

    let code = params
        .get("code")
        .ok_or_else(|| AuthError::Exchange("callback missing code".to_string()))?;
    let returned_state = params.get("state").ok_or(AuthError::StateMismatch)?;

    let pending = session::take_pending_login(session, returned_state).await?;
    provider.complete(code, pending).await
}
