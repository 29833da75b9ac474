use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod google;
pub mod session;

pub use google::GoogleOAuth;

/// External identity attached to a browser session after OAuth sign-in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub external_id: String,
    pub display_name: String,
}

/// Fixed set of external ids allowed into the admin area.
///
/// Built once from configuration and shared read-only between requests.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    ids: HashSet<String>,
}

impl AllowList {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_authorized(&self, identity_token: &str) -> bool {
        self.ids.contains(identity_token)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Why the admin gate turned a request away. Only ever logged; both cases
/// produce the same redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessDenied {
    #[error("no signed-in identity")]
    AuthRequired,
    #[error("identity is not on the allow-list")]
    AuthDenied,
}

/// Combined gate: an identity must be present and allow-listed
pub fn check_access(identity: Option<&Identity>, allow_list: &AllowList) -> Result<(), AccessDenied> {
    match identity {
        None => Err(AccessDenied::AuthRequired),
        Some(identity) if allow_list.is_authorized(&identity.external_id) => Ok(()),
        Some(_) => Err(AccessDenied::AuthDenied),
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("OAuth configuration error: {0}")]
    Config(String),

    #[error("OAuth state missing or mismatched")]
    StateMismatch,

    #[error("Token exchange failed: {0}")]
    Exchange(String),

    #[error("Profile request failed: {0}")]
    Profile(#[from] reqwest::Error),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// CSRF state and PKCE verifier kept in the session between the two OAuth legs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingLogin {
    pub csrf_state: String,
    pub pkce_verifier: String,
}

/// Third-party login seam: Google in production, fakes in tests
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Build the provider URL to send the browser to
    fn authorize(&self) -> Result<(String, PendingLogin), AuthError>;

    /// Trade the callback code for the signed-in identity
    async fn complete(&self, code: &str, pending: PendingLogin) -> Result<Identity, AuthError>;
}
