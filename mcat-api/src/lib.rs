//! mcat-api library - HTTP surface of the music catalog
//!
//! Exposes search, lookup and audio streaming over a read-only catalog
//! loaded once at startup.

use axum::Router;
use mcat_common::Catalog;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;

pub use crate::error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Track catalog (immutable after load)
    pub catalog: Arc<Catalog>,
    /// Directory that `audio_path` values are resolved against
    pub audio_root: Arc<PathBuf>,
}

impl AppState {
    /// Create new application state
    pub fn new(catalog: Catalog, audio_root: impl Into<PathBuf>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            audio_root: Arc::new(audio_root.into()),
        }
    }
}

/// Build application router
///
/// CORS is fully permissive (any origin, method and header). This is meant
/// for local frontend development and is not an access control mechanism.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::catalog_routes())
        .merge(api::stream_routes())
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
