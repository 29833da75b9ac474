use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Article, ArticleEdit, ArticleFields, ArticleSummary};
use crate::pagination::PageWindow;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Article not found")]
    NotFound,

    #[error("Missing required fields: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Store failure: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            other => StoreError::Internal(other.to_string()),
        }
    }
}

impl From<DatabaseError> for StoreError {
    fn from(err: DatabaseError) -> Self {
        StoreError::Internal(err.to_string())
    }
}

/// Identifiers are opaque to callers; a value that is not one of ours is a
/// store failure rather than a miss.
pub fn parse_id(id: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(id).map_err(|_| StoreError::Internal(format!("malformed article id: {}", id)))
}

/// Persistent article collection. All listings are newest first.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    async fn create(&self, fields: ArticleFields) -> Result<Article, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Article, StoreError>;

    /// Only title, content and category can change
    async fn update_fields(&self, id: &str, edit: ArticleEdit) -> Result<Article, StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// One page of summaries plus the total number of articles
    async fn list_page(&self, window: PageWindow) -> Result<(Vec<ArticleSummary>, u64), StoreError>;

    async fn list_recent(&self, limit: u64) -> Result<Vec<Article>, StoreError>;

    async fn list_all(&self) -> Result<Vec<Article>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}
