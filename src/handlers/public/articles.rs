// handlers/public/articles.rs - Read-only article endpoints

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Serialize;

use crate::app::AppState;
use crate::database::models::{Article, ArticleDetail, ArticleSummary};
use crate::error::ApiError;
use crate::pagination::{paginate, Page, PageQuery};

/// Articles on the landing page's "recent" strip
pub const RECENT_LIMIT: u64 = 5;
/// Articles on the index page's "recent" strip
pub const RECENT_INDEX_LIMIT: u64 = 3;

#[derive(Debug, Serialize)]
pub struct RecentArticles {
    pub articles: Vec<Article>,
}

/// GET /api/articles?page=N - one page of summaries, newest first
pub async fn list_articles(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<ArticleSummary>>, ApiError> {
    let window = query.window();
    let (articles, total_count) = state.store.list_page(window).await?;
    Ok(Json(paginate(window, articles, total_count)))
}

/// GET /api/articles/{id}
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ArticleDetail>, ApiError> {
    let article = state.store.find_by_id(&id).await?;
    Ok(Json(article.into()))
}

/// GET /api/recent-articles
pub async fn recent_articles(State(state): State<AppState>) -> Result<Json<RecentArticles>, ApiError> {
    recent(&state, RECENT_LIMIT).await
}

/// GET /api/recent-articles/index
pub async fn recent_articles_index(State(state): State<AppState>) -> Result<Json<RecentArticles>, ApiError> {
    recent(&state, RECENT_INDEX_LIMIT).await
}

async fn recent(state: &AppState, limit: u64) -> Result<Json<RecentArticles>, ApiError> {
    let articles = state.store.list_recent(limit).await?;
    Ok(Json(RecentArticles { articles }))
}
