//! Google sign-in over the OAuth 2.0 authorization-code flow with PKCE.
//!
//! [`GoogleOAuth::authorize`] builds the consent URL (scope `profile`) and
//! hands back the CSRF state and PKCE verifier; the caller parks them in the
//! session. [`GoogleOAuth::complete`] exchanges the callback code for an
//! access token and reads the account id and display name from the userinfo
//! endpoint.

use async_trait::async_trait;
use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use serde::Deserialize;

use super::{AuthError, Identity, IdentityProvider, PendingLogin};
use crate::config::GoogleOAuthConfig;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// Subset of the userinfo response available under the `profile` scope
#[derive(Debug, Deserialize)]
struct GoogleProfile {
    id: String,
    name: Option<String>,
}

impl From<GoogleProfile> for Identity {
    fn from(profile: GoogleProfile) -> Self {
        let display_name = profile
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| profile.id.clone());
        Identity {
            external_id: profile.id,
            display_name,
        }
    }
}

/// OAuth client type with auth URL and token URL set.
type ConfiguredClient = oauth2::Client<
    oauth2::basic::BasicErrorResponse,
    oauth2::basic::BasicTokenResponse,
    oauth2::basic::BasicTokenIntrospectionResponse,
    oauth2::StandardRevocableToken,
    oauth2::basic::BasicRevocationErrorResponse,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

pub struct GoogleOAuth {
    client: ConfiguredClient,
    http: reqwest::Client,
}

impl GoogleOAuth {
    pub fn from_config(config: &GoogleOAuthConfig) -> Result<Self, AuthError> {
        let client = BasicClient::new(ClientId::new(config.client_id.clone()))
            .set_client_secret(ClientSecret::new(config.client_secret.clone()))
            .set_auth_uri(
                AuthUrl::new(GOOGLE_AUTH_URL.to_string()).map_err(|e| AuthError::Config(e.to_string()))?,
            )
            .set_token_uri(
                TokenUrl::new(GOOGLE_TOKEN_URL.to_string()).map_err(|e| AuthError::Config(e.to_string()))?,
            )
            .set_redirect_uri(
                RedirectUrl::new(config.callback_url.clone()).map_err(|e| AuthError::Config(e.to_string()))?,
            );

        // Token endpoint must not follow redirects
        let http = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| AuthError::Config(e.to_string()))?;

        Ok(Self { client, http })
    }
}

#[async_trait]
impl IdentityProvider for GoogleOAuth {
    fn authorize(&self) -> Result<(String, PendingLogin), AuthError> {
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let (auth_url, csrf_state) = self
            .client
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new("profile".to_string()))
            .set_pkce_challenge(pkce_challenge)
            .url();

        let pending = PendingLogin {
            csrf_state: csrf_state.secret().clone(),
            pkce_verifier: pkce_verifier.secret().clone(),
        };
        Ok((auth_url.to_string(), pending))
    }

    async fn complete(&self, code: &str, pending: PendingLogin) -> Result<Identity, AuthError> {
        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .set_pkce_verifier(PkceCodeVerifier::new(pending.pkce_verifier))
            .request_async(&self.http)
            .await
            .map_err(|e| AuthError::Exchange(e.to_string()))?;

        let profile: GoogleProfile = self
            .http
            .get(GOOGLE_USERINFO_URL)
            .bearer_auth(token.access_token().secret())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(profile.into())
    }
}
