use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::json;
use sha2::{Digest, Sha512};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tower_sessions::{cookie::Key, cookie::SameSite, Expiry, SessionManagerLayer, SessionStore};

use crate::auth::{AllowList, IdentityProvider};
use crate::config::{AppConfig, SessionConfig};
use crate::database::ArticleStore;
use crate::handlers;
use crate::upload::{UploadStorage, UploadValidator};

/// Shared per-process state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ArticleStore>,
    pub allow_list: Arc<AllowList>,
    pub identity_provider: Option<Arc<dyn IdentityProvider>>,
    pub uploads: UploadStorage,
    pub validator: UploadValidator,
    pub site_dir: PathBuf,
    pub pages_dir: PathBuf,
    pub max_request_size_bytes: usize,
}

impl AppState {
    pub fn new(config: &AppConfig, store: Arc<dyn ArticleStore>) -> Self {
        let allow_list = AllowList::new(config.admin.allowed_ids.iter().cloned());
        if allow_list.is_empty() {
            tracing::warn!("ADMIN_ALLOWED_IDS is empty; nobody can reach the admin area");
        } else {
            tracing::info!("Admin allow-list has {} ids", allow_list.len());
        }

        Self {
            store,
            allow_list: Arc::new(allow_list),
            identity_provider: None,
            uploads: UploadStorage::new(config.storage.upload_dir.clone()),
            validator: UploadValidator::default(),
            site_dir: config.storage.site_dir.clone(),
            pages_dir: config.storage.pages_dir.clone(),
            max_request_size_bytes: config.api.max_request_size_bytes,
        }
    }

    pub fn with_identity_provider(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.identity_provider = Some(provider);
        self
    }
}

/// Full application router, minus the session layer (see [`with_sessions`])
pub fn router(state: AppState) -> Router {
    let uploads = ServeDir::new(state.uploads.dir());
    let site = ServeDir::new(&state.site_dir);
    let body_limit = state.max_request_size_bytes;

    Router::new()
        .route("/health", get(health))
        .merge(auth_routes())
        .merge(public_api_routes())
        .merge(admin_routes(body_limit))
        // Static files
        .nest_service("/uploads", uploads)
        .fallback_service(site)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    use handlers::public::auth;

    Router::new()
        .route("/auth/google", get(auth::google_login))
        .route("/auth/google/callback", get(auth::google_callback))
        .route("/isAuthenticated", get(auth::is_authenticated))
        .route("/logout", get(auth::logout))
}

fn public_api_routes() -> Router<AppState> {
    use handlers::public::articles;

    Router::new()
        .route("/api/articles", get(articles::list_articles))
        .route("/api/articles/{id}", get(articles::get_article))
        .route("/api/recent-articles", get(articles::recent_articles))
        .route("/api/recent-articles/index", get(articles::recent_articles_index))
}

fn admin_routes(body_limit: usize) -> Router<AppState> {
    use handlers::protected::{admin, upload};

    Router::new()
        .route("/admin", get(admin::dashboard))
        .route("/api/admin/articles", get(admin::list_articles))
        .route("/delete/{id}", get(admin::delete_article))
        .route("/edit/{id}", post(admin::edit_article))
        .route("/uploadarticle", get(upload::upload_form))
        // Same pages under their file names, so the static fallback never serves them
        .route(&format!("/{}", admin::DASHBOARD_PAGE), get(admin::dashboard))
        .route(&format!("/{}", upload::UPLOAD_PAGE), get(upload::upload_form))
        .route(
            "/upload-article",
            post(upload::upload_article).layer(DefaultBodyLimit::max(body_limit)),
        )
}

/// Wrap the router in cookie sessions backed by `store`.
///
/// Cookies are signed with a key derived from `SESSION_SECRET`; without one a
/// random key is used and sessions do not survive a restart.
pub fn with_sessions<S>(router: Router, store: S, config: &SessionConfig) -> Router
where
    S: SessionStore + Clone,
{
    let key = match &config.secret {
        Some(secret) => Key::from(Sha512::digest(secret.as_bytes()).as_slice()),
        None => {
            tracing::warn!("SESSION_SECRET not set; using a random session key");
            Key::generate()
        }
    };

    let hours = config.inactivity_hours.max(1) as u64;
    let expiry = std::time::Duration::from_secs(hours * 60 * 60)
        .try_into()
        .map(Expiry::OnInactivity)
        .unwrap_or(Expiry::OnSessionEnd);

    let layer = SessionManagerLayer::new(store)
        .with_secure(config.secure)
        .with_same_site(SameSite::Lax)
        .with_expiry(expiry)
        .with_signed(key);

    router.layer(layer)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "store": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "store": "unavailable"
                })),
            )
        }
    }
}
