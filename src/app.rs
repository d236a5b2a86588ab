use std::any::Any;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::config::AppConfig;
use crate::storage::pages::{FsPageStore, PageStore};
use crate::tags::TagMode;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub page_store: Arc<dyn PageStore>,
    pub tag_mode: TagMode,
    pub read_concurrency: usize,
}

impl AppState {
    pub fn new(page_store: Arc<dyn PageStore>, tag_mode: TagMode, read_concurrency: usize) -> Self {
        Self {
            page_store,
            tag_mode,
            read_concurrency: read_concurrency.max(1),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let page_store: Arc<dyn PageStore> = Arc::new(FsPageStore::new(&config.data_dir));
        Self::new(page_store, config.tag_mode, config.read_concurrency)
    }
}

/// Build the API router. Unmatched paths fall through to `static_dir` when it
/// exists.
pub fn build_router(state: AppState, config: &AppConfig) -> Router {
    let mut router = api_routes();

    if let Some(dir) = config.static_dir.as_ref().filter(|dir| dir.is_dir()) {
        tracing::info!("Serving client bundle from {}", dir.display());
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(api::health::root_handler))
        .route("/api/page/all", get(api::pages::page_all_handler))
        .route(
            "/api/page/{slug}",
            get(api::pages::get_page_handler).post(api::pages::write_page_handler),
        )
        .route("/api/pages/all", get(api::pages::list_pages_handler))
        .route("/api/tags/all", get(api::tags::list_tags_handler))
        .route("/api/tags/{tag}", get(api::tags::pages_by_tag_handler))
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("Handler panicked: {detail}");
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}
