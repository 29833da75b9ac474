use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from pool setup and schema management
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

const CREATE_ARTICLES: &str = r#"
    CREATE TABLE IF NOT EXISTS articles (
        id          UUID PRIMARY KEY,
        title       TEXT NOT NULL,
        hashtags    TEXT[] NOT NULL DEFAULT '{}',
        category    TEXT NOT NULL,
        content     TEXT NOT NULL,
        cover_image TEXT,
        author      TEXT NOT NULL,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        seq         BIGSERIAL NOT NULL
    )
"#;

// Tables created before `seq` existed
const ADD_ARTICLES_SEQ: &str = "ALTER TABLE articles ADD COLUMN IF NOT EXISTS seq BIGSERIAL NOT NULL";

const CREATE_ARTICLES_LISTING_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS articles_listing_idx ON articles (created_at DESC, seq DESC)";

/// Open the application pool from `DATABASE_URL`
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    let raw = config
        .url
        .as_deref()
        .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;
    let url = validate_url(raw)?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout))
        .connect(raw)
        .await?;

    info!("Created database pool for: {}", redacted(&url));
    Ok(pool)
}

/// Create the articles table and its listing index if missing
pub async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
    sqlx::query(CREATE_ARTICLES).execute(pool).await?;
    sqlx::query(ADD_ARTICLES_SEQ).execute(pool).await?;
    sqlx::query(CREATE_ARTICLES_LISTING_INDEX).execute(pool).await?;
    info!("Article schema ready");
    Ok(())
}

fn validate_url(raw: &str) -> Result<url::Url, DatabaseError> {
    let url = url::Url::parse(raw).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
    match url.scheme() {
        "postgres" | "postgresql" => Ok(url),
        _ => Err(DatabaseError::InvalidDatabaseUrl),
    }
}

/// Connection string safe for logs
fn redacted(url: &url::Url) -> String {
    let mut url = url.clone();
    if url.password().is_some() {
        let _ = url.set_password(Some("***"));
    }
    url.to_string()
}
