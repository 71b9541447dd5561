//! Audio streaming
//!
//! Sends a track's audio file as a chunked body. The content type is always
//! `audio/mpeg`; no detection is attempted and byte ranges are not supported.

use axum::{
    body::Body,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use mcat_common::media::{audio_not_found, resolve_audio_file};
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::debug;

use super::tracks::parse_track_id;
use crate::{ApiResult, AppState};

/// Content type declared for every streamed file
pub const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

/// GET /stream/:id
///
/// 404 if the track does not exist or its audio file is missing. The file
/// handle lives inside the body stream and is dropped when the response
/// completes or the client goes away.
pub async fn stream_track(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_track_id(&raw_id)?;
    let track = state.catalog.get(id)?;
    let audio_file = resolve_audio_file(&state.audio_root, track)?;

    match tokio::fs::metadata(&audio_file).await {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => {
            debug!("Audio path for track {} is not a file: {}", track.id, audio_file.display());
            return Err(audio_not_found().into());
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("Audio file missing for track {}: {}", track.id, audio_file.display());
            return Err(audio_not_found().into());
        }
        Err(e) => return Err(e.into()),
    }

    let file = match File::open(&audio_file).await {
        Ok(file) => file,
        // Removed after the metadata check
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(audio_not_found().into());
        }
        Err(e) => return Err(e.into()),
    };

    debug!("Streaming track {} from {}", track.id, audio_file.display());

    let body = Body::from_stream(ReaderStream::new(file));
    Ok(([(header::CONTENT_TYPE, AUDIO_CONTENT_TYPE)], body).into_response())
}

/// Build streaming routes
pub fn stream_routes() -> Router<AppState> {
    Router::new().route("/stream/:id", get(stream_track))
}
