//! Track lookup by id

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};

use crate::{ApiError, ApiResult, AppState};

/// Parse a track id path segment
///
/// Any integer is accepted. Integers too large for `i64` saturate, so they
/// land out of range and become 404 instead of a parse failure. Anything
/// that is not an integer is a 400.
pub fn parse_track_id(raw: &str) -> ApiResult<i64> {
    if let Ok(id) = raw.parse::<i64>() {
        return Ok(id);
    }

    let (negative, digits) = match raw.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };

    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(if negative { i64::MIN } else { i64::MAX });
    }

    Err(ApiError::BadRequest(format!("Invalid track id: {}", raw)))
}

/// GET /tracks/:id
///
/// Returns the track object, or 404 if `id` is negative or past the end of
/// the catalog.
pub async fn get_track(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_track_id(&raw_id)?;
    let track = state.catalog.get(id)?;
    Ok(Json(track).into_response())
}
