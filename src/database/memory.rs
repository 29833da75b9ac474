use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::{Article, ArticleEdit, ArticleFields, ArticleSummary};
use crate::database::store::{parse_id, ArticleStore, StoreError};
use crate::pagination::PageWindow;

/// In-memory article store for `--memory` runs and tests.
///
/// Articles are kept in insertion order; equal timestamps list the later
/// insertion first.
#[derive(Clone, Debug, Default)]
pub struct MemoryArticleStore {
    articles: Arc<RwLock<Vec<Article>>>,
}

impl MemoryArticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.articles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.articles.read().await.is_empty()
    }
}

fn newest_first(articles: &[Article]) -> Vec<&Article> {
    let mut sorted: Vec<&Article> = articles.iter().rev().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted
}

fn to_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

#[async_trait]
impl ArticleStore for MemoryArticleStore {
    async fn create(&self, fields: ArticleFields) -> Result<Article, StoreError> {
        let article = fields.validate()?.into_article(Uuid::new_v4(), Utc::now());
        self.articles.write().await.push(article.clone());
        Ok(article)
    }

    async fn find_by_id(&self, id: &str) -> Result<Article, StoreError> {
        let id = parse_id(id)?;
        self.articles
            .read()
            .await
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update_fields(&self, id: &str, edit: ArticleEdit) -> Result<Article, StoreError> {
        let id = parse_id(id)?;
        edit.validate()?;

        let mut articles = self.articles.write().await;
        let article = articles
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(StoreError::NotFound)?;
        edit.apply(article);
        Ok(article.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let id = parse_id(id)?;
        let mut articles = self.articles.write().await;
        let index = articles
            .iter()
            .position(|a| a.id == id)
            .ok_or(StoreError::NotFound)?;
        articles.remove(index);
        Ok(())
    }

    async fn list_page(&self, window: PageWindow) -> Result<(Vec<ArticleSummary>, u64), StoreError> {
        let articles = self.articles.read().await;
        let items = newest_first(&articles)
            .into_iter()
            .skip(to_usize(window.skip))
            .take(to_usize(window.limit))
            .map(ArticleSummary::from)
            .collect();
        Ok((items, articles.len() as u64))
    }

    async fn list_recent(&self, limit: u64) -> Result<Vec<Article>, StoreError> {
        let articles = self.articles.read().await;
        Ok(newest_first(&articles)
            .into_iter()
            .take(to_usize(limit))
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Article>, StoreError> {
        let articles = self.articles.read().await;
        Ok(newest_first(&articles).into_iter().cloned().collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
