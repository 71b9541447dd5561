//! Catalog search
//!
//! Case-insensitive substring search over title, artist and album.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use mcat_common::Track;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::AppState;

/// Query parameters for search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Free-text query (required, may be empty)
    pub q: String,
}

/// Search response
#[derive(Debug, Serialize)]
pub struct SearchResponse<'a> {
    pub results: Vec<&'a Track>,
}

/// GET /search?q=text
///
/// Returns matching tracks in catalog order. An empty `q` returns the
/// entire catalog; a missing `q` is rejected with 400 by the extractor.
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Response {
    let results = state.catalog.search(&query.q);
    debug!("Search {:?} matched {} tracks", query.q, results.len());

    Json(SearchResponse { results }).into_response()
}
