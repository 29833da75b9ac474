// handlers/protected/admin.rs - Admin dashboard and article maintenance

use axum::{
    extract::{FromRequest, Path, Request, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Json, Redirect, Response},
    Form,
};

use crate::app::AppState;
use crate::database::models::{Article, ArticleEdit};
use crate::database::StoreError;
use crate::error::ApiError;
use crate::handlers::{serve_page, server_error};
use crate::middleware::AdminUser;

pub const DASHBOARD_PAGE: &str = "admin.html";

const DASHBOARD_PATH: &str = "/admin";
const NOT_FOUND_PATH: &str = "/admin?error=not_found";
const INVALID_PATH: &str = "/admin?error=true";

/// GET /admin
pub async fn dashboard(_admin: AdminUser, State(state): State<AppState>) -> Response {
    serve_page(&state.pages_dir, DASHBOARD_PAGE).await
}

/// GET /api/admin/articles - every stored article, newest first
pub async fn list_articles(_admin: AdminUser, State(state): State<AppState>) -> Result<Json<Vec<Article>>, ApiError> {
    let articles = state.store.list_all().await?;
    Ok(Json(articles))
}

/// GET /delete/{id}
pub async fn delete_article(admin: AdminUser, State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.store.delete(&id).await {
        Ok(()) => {
            tracing::info!("Article {} deleted by {}", id, admin.identity().display_name);
            Redirect::to(DASHBOARD_PATH).into_response()
        }
        Err(StoreError::NotFound) => Redirect::to(NOT_FOUND_PATH).into_response(),
        Err(e) => {
            tracing::error!("Failed to delete article {}: {}", id, e);
            server_error()
        }
    }
}

/// POST /edit/{id} - title, content and category only
pub async fn edit_article(
    admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    EditBody(edit): EditBody,
) -> Response {
    if let Err(e) = edit.validate() {
        tracing::debug!("Rejected edit of article {}: {}", id, e);
        return Redirect::to(INVALID_PATH).into_response();
    }

    match state.store.update_fields(&id, edit).await {
        Ok(article) => {
            tracing::info!("Article {} edited by {}", article.id, admin.identity().display_name);
            Redirect::to(DASHBOARD_PATH).into_response()
        }
        Err(StoreError::NotFound) => Redirect::to(NOT_FOUND_PATH).into_response(),
        Err(StoreError::Validation(_)) => Redirect::to(INVALID_PATH).into_response(),
        Err(e) => {
            tracing::error!("Failed to edit article {}: {}", id, e);
            server_error()
        }
    }
}

/// Edit payload from either a JSON body or a url-encoded form.
///
/// Fields other than title, content and category are ignored.
#[derive(Debug)]
pub struct EditBody(pub ArticleEdit);

impl<S> FromRequest<S> for EditBody
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        let parsed = if is_json {
            Json::<ArticleEdit>::from_request(req, state)
                .await
                .map(|Json(edit)| edit)
                .map_err(|e| e.body_text())
        } else {
            Form::<ArticleEdit>::from_request(req, state)
                .await
                .map(|Form(edit)| edit)
                .map_err(|e| e.body_text())
        };

        parsed.map(EditBody).map_err(|msg| {
            tracing::debug!("Unreadable edit body: {}", msg);
            Redirect::to(INVALID_PATH)
        })
    }
}
