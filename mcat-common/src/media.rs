//! Audio file resolution
//!
//! Maps a track's `audio_path` onto the audio root. Only plain relative
//! paths are accepted; anything that would leave the audio root is treated
//! the same as a missing file. No filesystem access happens here; callers
//! check existence with their own (async) I/O.

use crate::catalog::Track;
use crate::{Error, Result};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Error reported for any audio file that cannot be served
pub fn audio_not_found() -> Error {
    Error::NotFound("Audio file not found".to_string())
}

/// Join `audio_path` onto `audio_root`, refusing absolute paths and `..`
fn join_under_root(audio_root: &Path, audio_path: &str) -> Option<PathBuf> {
    let relative = Path::new(audio_path);
    let confined = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));

    if audio_path.is_empty() || !confined {
        return None;
    }

    Some(audio_root.join(relative))
}

/// Compute the audio file path for a track
///
/// Returns [`Error::NotFound`] if the track has no string `audio_path` or if
/// the path escapes the audio root.
pub fn resolve_audio_file(audio_root: &Path, track: &Track) -> Result<PathBuf> {
    let Some(audio_path) = track.record.audio_path() else {
        debug!("Track {} has no audio_path", track.id);
        return Err(audio_not_found());
    };

    join_under_root(audio_root, audio_path).ok_or_else(|| {
        debug!("Track {} audio_path rejected: {:?}", track.id, audio_path);
        audio_not_found()
    })
}
