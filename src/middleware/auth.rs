use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::Redirect,
};
use tower_sessions::Session;

use crate::app::AppState;
use crate::auth::{self, session::current_identity, Identity};

/// Where rejected admin requests are sent
pub const LANDING_PATH: &str = "/";

/// Signed-in, allow-listed identity. Taking this as a handler argument gates
/// the route; anything else is redirected to the landing page with no hint
/// of why.
#[derive(Clone, Debug)]
pub struct AdminUser(pub Identity);

impl AdminUser {
    pub fn identity(&self) -> &Identity {
        &self.0
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await.map_err(|(_, msg)| {
            tracing::error!("Session layer missing on admin route: {}", msg);
            Redirect::to(LANDING_PATH)
        })?;

        let identity = current_identity(&session).await;

        if let Err(denied) = auth::check_access(identity.as_ref(), &state.allow_list) {
            tracing::debug!("Admin gate rejected {} {}: {}", parts.method, parts.uri.path(), denied);
            return Err(Redirect::to(LANDING_PATH));
        }

        identity.map(AdminUser).ok_or_else(|| Redirect::to(LANDING_PATH))
    }
}
