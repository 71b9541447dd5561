//! HTTP API handlers for mcat-api

pub mod health;
pub mod search;
pub mod stream;
pub mod tracks;

use axum::{routing::get, Router};

use crate::AppState;

pub use health::health_routes;
pub use search::search;
pub use stream::{stream_routes, stream_track};
pub use tracks::get_track;

/// Build catalog query routes (search and lookup)
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(search))
        .route("/tracks/:id", get(get_track))
}
