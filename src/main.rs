use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tower_sessions::{ExpiredDeletion, MemoryStore};
use tower_sessions_sqlx_store::PostgresStore;
use tracing_subscriber::EnvFilter;

use inkpress::app::{self, AppState};
use inkpress::auth::GoogleOAuth;
use inkpress::config;
use inkpress::database::{manager, MemoryArticleStore, PgArticleStore};

/// How often expired sessions are swept from PostgreSQL
const SESSION_SWEEP_SECS: u64 = 60 * 60;

#[derive(Parser, Debug)]
#[command(name = "inkpress", version, about = "Article publishing server")]
struct Cli {
    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Keep articles and sessions in memory instead of PostgreSQL
    #[arg(long)]
    memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, GOOGLE_CLIENT_ID, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = config::config();
    tracing::info!("Starting inkpress in {:?} mode", config.environment);

    if inkpress::is_production!() && config.session.secret.is_none() {
        tracing::warn!("Running in production without SESSION_SECRET; sessions will not survive a restart");
    }

    tokio::fs::create_dir_all(&config.storage.upload_dir)
        .await
        .with_context(|| format!("failed to create upload dir {}", config.storage.upload_dir.display()))?;

    let (router, store_kind) = if cli.memory {
        let state = with_provider(AppState::new(config, Arc::new(MemoryArticleStore::new())))?;
        let router = app::with_sessions(app::router(state), MemoryStore::default(), &config.session);
        (router, "memory")
    } else {
        let pool = manager::connect(&config.database).await?;

        let articles = PgArticleStore::new(pool.clone());
        articles.ensure_schema().await?;

        let sessions = PostgresStore::new(pool);
        sessions.migrate().await.context("failed to migrate session table")?;
        tokio::task::spawn(
            sessions
                .clone()
                .continuously_delete_expired(tokio::time::Duration::from_secs(SESSION_SWEEP_SECS)),
        );

        let state = with_provider(AppState::new(config, Arc::new(articles)))?;
        let router = app::with_sessions(app::router(state), sessions, &config.session);
        (router, "postgres")
    };

    let port = cli.port.unwrap_or(config.server.port);
    let bind_addr = format!("{}:{}", config.server.host, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("inkpress listening on http://{} ({} store)", bind_addr, store_kind);

    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}

fn with_provider(state: AppState) -> anyhow::Result<AppState> {
    match &config::config().oauth {
        Some(oauth) => {
            let google = GoogleOAuth::from_config(oauth).context("invalid Google OAuth configuration")?;
            Ok(state.with_identity_provider(Arc::new(google)))
        }
        None => {
            tracing::warn!("GOOGLE_CLIENT_ID/GOOGLE_CLIENT_SECRET not set; sign-in is disabled");
            Ok(state)
        }
    }
}
