use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::store::StoreError;

/// Full stored article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub hashtags: Vec<String>,
    pub category: String,
    pub content: String,
    pub cover_image: Option<String>,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

/// Page listing projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub cover_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub content: String,
}

impl From<&Article> for ArticleSummary {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id,
            title: article.title.clone(),
            cover_image: article.cover_image.clone(),
            created_at: article.created_at,
            content: article.content.clone(),
        }
    }
}

/// Single article view projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDetail {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub cover_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub content: String,
    pub author: String,
}

impl From<Article> for ArticleDetail {
    fn from(article: Article) -> Self {
        Self {
            id: article.id,
            title: article.title,
            cover_image: article.cover_image,
            created_at: article.created_at,
            content: article.content,
            author: article.author,
        }
    }
}

/// Unvalidated article input as submitted by the upload form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleFields {
    pub title: Option<String>,
    /// Comma separated
    pub hashtags: Option<String>,
    pub category: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub cover_image: Option<String>,
}

/// Article input that passed validation; id and timestamp are still up to the store
#[derive(Debug, Clone, PartialEq)]
pub struct NewArticle {
    pub title: String,
    pub hashtags: Vec<String>,
    pub category: String,
    pub content: String,
    pub author: String,
    pub cover_image: Option<String>,
}

impl ArticleFields {
    pub fn validate(self) -> Result<NewArticle, StoreError> {
        let mut missing = Vec::new();
        let mut take = |name: &str, value: Option<String>| -> String {
            match value.filter(|v| !v.trim().is_empty()) {
                Some(v) => v,
                None => {
                    missing.push(name.to_string());
                    String::new()
                }
            }
        };

        let title = take("title", self.title);
        let category = take("category", self.category);
        let content = take("content", self.content);
        let author = take("author", self.author);

        if !missing.is_empty() {
            return Err(StoreError::Validation(missing));
        }

        Ok(NewArticle {
            title,
            hashtags: parse_hashtags(self.hashtags.as_deref().unwrap_or_default()),
            category,
            content,
            author,
            cover_image: self.cover_image.filter(|c| !c.is_empty()),
        })
    }
}

impl NewArticle {
    pub fn into_article(self, id: Uuid, created_at: DateTime<Utc>) -> Article {
        Article {
            id,
            title: self.title,
            hashtags: self.hashtags,
            category: self.category,
            content: self.content,
            cover_image: self.cover_image,
            author: self.author,
            created_at,
        }
    }
}

/// The only fields an edit may touch; anything else in the request body is dropped
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ArticleEdit {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
}

impl ArticleEdit {
    /// Provided fields must not be blank
    pub fn validate(&self) -> Result<(), StoreError> {
        let blank: Vec<String> = [
            ("title", &self.title),
            ("content", &self.content),
            ("category", &self.category),
        ]
        .into_iter()
        .filter(|(_, v)| v.as_deref().is_some_and(|v| v.trim().is_empty()))
        .map(|(name, _)| name.to_string())
        .collect();

        if blank.is_empty() {
            Ok(())
        } else {
            Err(StoreError::Validation(blank))
        }
    }

    pub fn apply(self, article: &mut Article) {
        if let Some(title) = self.title {
            article.title = title;
        }
        if let Some(content) = self.content {
            article.content = content;
        }
        if let Some(category) = self.category {
            article.category = category;
        }
    }
}

/// Split on commas and trim, dropping empty tags
pub fn parse_hashtags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
