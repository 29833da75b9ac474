// handlers/protected/upload.rs - Article upload form and submission

use axum::{
    extract::{multipart::Field, Multipart, State},
    response::{Redirect, Response},
};

use crate::app::AppState;
use crate::database::models::ArticleFields;
use crate::handlers::serve_page;
use crate::middleware::AdminUser;
use crate::upload::{UploadError, UploadValidator, UploadedFile};

pub const UPLOAD_PAGE: &str = "uploadArticle.html";
pub const COVER_IMAGE_FIELD: &str = "coverImage";

const SUCCESS_PATH: &str = "/uploadarticle?success=true";
const FAILURE_PATH: &str = "/uploadarticle?error=true";

/// GET /uploadarticle
pub async fn upload_form(_admin: AdminUser, State(state): State<AppState>) -> Response {
    serve_page(&state.pages_dir, UPLOAD_PAGE).await
}

/// POST /upload-article - multipart article fields plus an optional cover image
///
/// The image is written to the upload directory only after every field has
/// been read and validated, and removed again if the store refuses the article.
pub async fn upload_article(admin: AdminUser, State(state): State<AppState>, mut multipart: Multipart) -> Redirect {
    let (mut fields, cover) = match read_submission(&mut multipart, &state.validator).await {
        Ok(submission) => submission,
        Err(e) => {
            tracing::warn!("Upload rejected: {}", e);
            return Redirect::to(FAILURE_PATH);
        }
    };

    if let Err(e) = fields.clone().validate() {
        tracing::debug!("Upload rejected: {}", e);
        return Redirect::to(FAILURE_PATH);
    }

    let stored_name = match &cover {
        Some(file) => match state.uploads.persist(file).await {
            Ok(name) => Some(name),
            Err(e) => {
                tracing::error!("Failed to persist cover image: {}", e);
                return Redirect::to(FAILURE_PATH);
            }
        },
        None => None,
    };
    fields.cover_image = stored_name.clone();

    match state.store.create(fields).await {
        Ok(article) => {
            tracing::info!("Article {} uploaded by {}", article.id, admin.identity().display_name);
            Redirect::to(SUCCESS_PATH)
        }
        Err(e) => {
            tracing::error!("Failed to create article: {}", e);
            if let Some(name) = stored_name {
                state.uploads.discard(&name).await;
            }
            Redirect::to(FAILURE_PATH)
        }
    }
}

async fn read_submission(
    multipart: &mut Multipart,
    validator: &UploadValidator,
) -> Result<(ArticleFields, Option<UploadedFile>), UploadError> {
    let mut fields = ArticleFields::default();
    let mut cover = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == COVER_IMAGE_FIELD {
            let original_name = field.file_name().unwrap_or_default().to_string();
            if original_name.is_empty() {
                continue;
            }
            validator.check_type(&original_name)?;
            let bytes = read_limited(field, validator).await?;
            cover = Some(UploadedFile {
                field_name: name,
                original_name,
                bytes,
            });
            continue;
        }

        let value = field.text().await.map_err(multipart_error)?;
        match name.as_str() {
            "title" => fields.title = Some(value),
            "hashtags" => fields.hashtags = Some(value),
            "category" => fields.category = Some(value),
            "content" => fields.content = Some(value),
            "author" => fields.author = Some(value),
            _ => {}
        }
    }

    Ok((fields, cover))
}

/// Stream a file part, stopping as soon as it goes over the size limit
async fn read_limited(mut field: Field<'_>, validator: &UploadValidator) -> Result<Vec<u8>, UploadError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        validator.check_size((bytes.len() + chunk.len()) as u64)?;
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> UploadError {
    UploadError::Multipart(e.body_text())
}
