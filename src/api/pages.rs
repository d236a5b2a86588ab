use axum::extract::{FromRequest, Path, Request, State};
use axum::http::header;
use axum::Json;
use serde::Deserialize;

use crate::api::envelope::{Empty, Envelope, PageBody, PageList};
use crate::app::AppState;
use crate::error::AppError;
use crate::models::slug::Slug;

/// JSON form of a page write: `{"body": "<text>"}`.
#[derive(Debug, Deserialize)]
pub struct WritePageRequest {
    pub body: String,
}

/// Page text from a write request, sent either as `WritePageRequest` JSON or
/// as a raw `text/plain` body.
#[derive(Debug)]
pub struct PageContent(pub String);

impl<S> FromRequest<S> for PageContent
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/json") {
            let Json(payload) = Json::<WritePageRequest>::from_request(req, state)
                .await
                .map_err(|e| AppError::WriteFailed(format!("Invalid JSON body: {}", e.body_text())))?;
            Ok(Self(payload.body))
        } else if content_type.starts_with("text/plain") {
            let text = String::from_request(req, state)
                .await
                .map_err(|e| AppError::WriteFailed(format!("Invalid text body: {}", e.body_text())))?;
            Ok(Self(text))
        } else {
            Err(AppError::WriteFailed(format!(
                "Unsupported content type '{content_type}'"
            )))
        }
    }
}

/// Axum handler for `GET /api/page/{slug}`.
pub async fn get_page_handler(
    State(state): State<AppState>,
    Path(raw_slug): Path<String>,
) -> Result<Json<Envelope<PageBody>>, AppError> {
    let slug = Slug::parse(&raw_slug).map_err(|e| {
        tracing::debug!("Rejected page read: {e}");
        AppError::PageNotFound(raw_slug.clone())
    })?;

    let body = state.page_store.read_page(&slug).await?;
    Ok(Envelope::ok(PageBody { body }))
}

/// Core write logic, separated from the HTTP layer for testability.
pub async fn process_write(
    state: &AppState,
    raw_slug: &str,
    content: Result<PageContent, AppError>,
) -> Result<(), AppError> {
    let slug = Slug::parse(raw_slug)?;
    let PageContent(body) = content?;
    state.page_store.write_page(&slug, &body).await?;
    tracing::info!("Wrote page '{}' ({} bytes)", slug, body.len());
    Ok(())
}

/// Axum handler for `POST /api/page/{slug}`.
///
/// Creates or overwrites the page. Every failure is reported as
/// "Could not write page.".
pub async fn write_page_handler(
    State(state): State<AppState>,
    Path(raw_slug): Path<String>,
    content: Result<PageContent, AppError>,
) -> Result<Json<Envelope<Empty>>, AppError> {
    match process_write(&state, &raw_slug, content).await {
        Ok(()) => Ok(Envelope::ok(Empty {})),
        Err(AppError::WriteFailed(msg)) => {
            tracing::warn!("Page write failed: {msg}");
            Err(AppError::WriteFailed(msg))
        }
        Err(e) => {
            tracing::warn!("Page write rejected: {e}");
            Err(AppError::WriteFailed(e.to_string()))
        }
    }
}

/// Axum handler for `GET /api/pages/all`.
pub async fn list_pages_handler(
    State(state): State<AppState>,
) -> Result<Json<Envelope<PageList>>, AppError> {
    let slugs = state.page_store.list_slugs().await.inspect_err(log_list_failure)?;
    let pages = slugs.into_iter().map(Slug::into_string).collect();
    Ok(Envelope::ok(PageList { pages }))
}

/// Axum handler for `GET /api/page/all`.
///
/// Reads the directory but reports nothing beyond the status.
pub async fn page_all_handler(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Empty>>, AppError> {
    let slugs = state.page_store.list_slugs().await.inspect_err(log_list_failure)?;
    tracing::debug!("Data directory holds {} pages", slugs.len());
    Ok(Envelope::ok(Empty {}))
}

pub(crate) fn log_list_failure(err: &AppError) {
    tracing::error!("Failed to list pages: {err}");
}
