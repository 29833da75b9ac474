#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Response};
use tempfile::TempDir;
use tower_sessions::MemoryStore;

use inkpress::app::{self, AppState};
use inkpress::auth::{AuthError, Identity, IdentityProvider, PendingLogin};
use inkpress::config::AppConfig;
use inkpress::database::models::{Article, ArticleFields};
use inkpress::database::{ArticleStore, MemoryArticleStore};

pub const ADMIN_ID: &str = "admin-1";
pub const ADMIN_NAME: &str = "Ada Admin";
pub const ADMIN_CODE: &str = "admin-code";
pub const STRANGER_CODE: &str = "stranger-code";

pub const ADMIN_PAGE: &str = "<html><body>admin dashboard</body></html>";
pub const UPLOAD_PAGE: &str = "<html><body>upload form</body></html>";
pub const INDEX_PAGE: &str = "<html><body>landing</body></html>";

/// Provider stand-in: two known codes, everything else fails the exchange
pub struct FakeProvider;

#[async_trait]
impl IdentityProvider for FakeProvider {
    fn authorize(&self) -> Result<(String, PendingLogin), AuthError> {
        let csrf_state = uuid::Uuid::new_v4().simple().to_string();
        let url = format!("https://provider.test/consent?state={}", csrf_state);
        Ok((
            url,
            PendingLogin {
                csrf_state,
                pkce_verifier: "verifier".to_string(),
            },
        ))
    }

    async fn complete(&self, code: &str, _pending: PendingLogin) -> Result<Identity, AuthError> {
        match code {
            ADMIN_CODE => Ok(Identity {
                external_id: ADMIN_ID.to_string(),
                display_name: ADMIN_NAME.to_string(),
            }),
            STRANGER_CODE => Ok(Identity {
                external_id: "stranger-9".to_string(),
                display_name: "Sam Stranger".to_string(),
            }),
            other => Err(AuthError::Exchange(format!("unknown code {}", other))),
        }
    }
}

/// The full router served in-process on its own port with fresh stores
pub struct TestApp {
    pub base_url: String,
    pub store: MemoryArticleStore,
    pub client: reqwest::Client,
    pub site_dir: TempDir,
    pub pages_dir: TempDir,
    pub upload_dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Result<Self> {
        let site_dir = tempfile::tempdir()?;
        let pages_dir = tempfile::tempdir()?;
        let upload_dir = tempfile::tempdir()?;
        std::fs::write(pages_dir.path().join("admin.html"), ADMIN_PAGE)?;
        std::fs::write(pages_dir.path().join("uploadArticle.html"), UPLOAD_PAGE)?;
        std::fs::write(site_dir.path().join("index.html"), INDEX_PAGE)?;

        let mut config = AppConfig::development();
        config.admin.allowed_ids = vec![ADMIN_ID.to_string()];
        config.session.secret = Some("integration-test-secret".to_string());
        config.session.secure = false;
        config.storage.site_dir = site_dir.path().to_path_buf();
        config.storage.pages_dir = pages_dir.path().to_path_buf();
        config.storage.upload_dir = upload_dir.path().to_path_buf();

        let store = MemoryArticleStore::new();
        let state = AppState::new(&config, Arc::new(store.clone())).with_identity_provider(Arc::new(FakeProvider));
        let router = app::with_sessions(app::router(state), MemoryStore::default(), &config.session);

        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()?;

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            store,
            client,
            site_dir,
            pages_dir,
            upload_dir,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    /// Run both OAuth legs with the given provider code; returns the callback response
    pub async fn login(&self, code: &str) -> Result<Response> {
        let start = self.get("/auth/google").await?;
        let consent_url = location(&start);
        let state = consent_url
            .split("state=")
            .nth(1)
            .context("consent URL carries no state")?
            .to_string();

        self.get(&format!("/auth/google/callback?code={}&state={}", code, state))
            .await
    }

    pub async fn login_as_admin(&self) -> Result<()> {
        let res = self.login(ADMIN_CODE).await?;
        anyhow::ensure!(location(&res) == "/uploadarticle", "admin login did not land on the upload page");
        Ok(())
    }

    pub async fn seed(&self, title: &str) -> Result<Article> {
        let article = self
            .store
            .create(ArticleFields {
                title: Some(title.to_string()),
                hashtags: Some("rust, web".to_string()),
                category: Some("tech".to_string()),
                content: Some(format!("Body of {}", title)),
                author: Some("Original Author".to_string()),
                cover_image: None,
            })
            .await?;
        Ok(article)
    }
}

pub fn location(res: &Response) -> String {
    res.headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
