use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{self, DatabaseError};
use crate::database::models::{Article, ArticleEdit, ArticleFields, ArticleSummary};
use crate::database::store::{parse_id, ArticleStore, StoreError};
use crate::pagination::PageWindow;

const ARTICLE_COLUMNS: &str = "id, title, hashtags, category, content, cover_image, author, created_at";

/// Newest first; `seq` breaks created_at ties in insertion order
const NEWEST_FIRST: &str = "ORDER BY created_at DESC, seq DESC";

/// PostgreSQL-backed article store
#[derive(Clone)]
pub struct PgArticleStore {
    pool: PgPool,
}

impl PgArticleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        manager::ensure_schema(&self.pool).await
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl ArticleStore for PgArticleStore {
    async fn create(&self, fields: ArticleFields) -> Result<Article, StoreError> {
        let new_article = fields.validate()?;

        let sql = format!(
            "INSERT INTO articles ({ARTICLE_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {ARTICLE_COLUMNS}"
        );
        let article = sqlx::query_as::<_, Article>(&sql)
            .bind(Uuid::new_v4())
            .bind(&new_article.title)
            .bind(&new_article.hashtags)
            .bind(&new_article.category)
            .bind(&new_article.content)
            .bind(&new_article.cover_image)
            .bind(&new_article.author)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;
        Ok(article)
    }

    async fn find_by_id(&self, id: &str) -> Result<Article, StoreError> {
        let id = parse_id(id)?;
        let sql = format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = $1");
        sqlx::query_as::<_, Article>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn update_fields(&self, id: &str, edit: ArticleEdit) -> Result<Article, StoreError> {
        let id = parse_id(id)?;
        edit.validate()?;

        // NULL parameters leave the column untouched
        let sql = format!(
            "UPDATE articles SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                category = COALESCE($4, category)
             WHERE id = $1
             RETURNING {ARTICLE_COLUMNS}"
        );
        sqlx::query_as::<_, Article>(&sql)
            .bind(id)
            .bind(edit.title)
            .bind(edit.content)
            .bind(edit.category)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let id = parse_id(id)?;
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list_page(&self, window: PageWindow) -> Result<(Vec<ArticleSummary>, u64), StoreError> {
        let sql = format!(
            "SELECT id, title, cover_image, created_at, content FROM articles {NEWEST_FIRST} LIMIT $1 OFFSET $2"
        );
        let items = sqlx::query_as::<_, ArticleSummary>(&sql)
            .bind(to_i64(window.limit))
            .bind(to_i64(window.skip))
            .fetch_all(&self.pool);

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM articles").fetch_one(&self.pool);

        let (items, total) = futures::try_join!(items, total)?;
        Ok((items, total.max(0) as u64))
    }

    async fn list_recent(&self, limit: u64) -> Result<Vec<Article>, StoreError> {
        let sql = format!("SELECT {ARTICLE_COLUMNS} FROM articles {NEWEST_FIRST} LIMIT $1");
        let rows = sqlx::query_as::<_, Article>(&sql)
            .bind(to_i64(limit))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_all(&self) -> Result<Vec<Article>, StoreError> {
        let sql = format!("SELECT {ARTICLE_COLUMNS} FROM articles {NEWEST_FIRST}");
        let rows = sqlx::query_as::<_, Article>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
