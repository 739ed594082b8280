//! HTTP routes over [`ThemeInspector`].
//!
//! Every analysis endpoint answers `{ "success": true, ...report }` or, on failure,
//! status 500 with `{ "success": false, "error": <category>, "details": <message> }`.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

use crate::error::{Failure, FailureKind, Result};
use crate::inspector::ThemeInspector;

#[derive(Serialize)]
struct SuccessBody<T> {
    success: bool,
    #[serde(flatten)]
    data: T,
}

#[derive(Serialize)]
struct FailureBody {
    success: bool,
    #[serde(flatten)]
    failure: Failure,
}

pub fn router(inspector: Arc<ThemeInspector>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/scan", get(scan))
        .route("/api/sections-by-page", get(sections_by_page))
        .route("/api/blocks-by-section", get(blocks_by_section))
        .with_state(inspector)
}

async fn health_check() -> &'static str {
    "OK"
}

/// GET /api/scan - raw template listing
async fn scan(State(inspector): State<Arc<ThemeInspector>>) -> Response {
    run(inspector, FailureKind::Scan, |i| i.scan()).await
}

/// GET /api/sections-by-page - section placement per page type and zone
async fn sections_by_page(State(inspector): State<Arc<ThemeInspector>>) -> Response {
    run(inspector, FailureKind::SectionsByPage, |i| i.sections_by_page()).await
}

/// GET /api/blocks-by-section - block nesting per section
async fn blocks_by_section(State(inspector): State<Arc<ThemeInspector>>) -> Response {
    run(inspector, FailureKind::BlocksBySection, |i| i.blocks_by_section()).await
}

/// Run a blocking analysis off the async workers and wrap the outcome.
async fn run<T, F>(inspector: Arc<ThemeInspector>, kind: FailureKind, analysis: F) -> Response
where
    T: Serialize + Send + 'static,
    F: FnOnce(&ThemeInspector) -> Result<T> + Send + 'static,
{
    let outcome = tokio::task::spawn_blocking(move || analysis(&inspector)).await;

    let failure = match outcome {
        Ok(Ok(data)) => return Json(SuccessBody { success: true, data }).into_response(),
        Ok(Err(e)) => {
            error!("{}: {}", kind.category(), e);
            Failure::from_error(kind, &e)
        }
        Err(e) => {
            error!("{}: analysis task failed: {}", kind.category(), e);
            Failure::new(kind, Some(e.to_string()))
        }
    };

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(FailureBody {
            success: false,
            failure,
        }),
    )
        .into_response()
}
