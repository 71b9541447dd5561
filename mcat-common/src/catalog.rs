//! In-memory track catalog
//!
//! The catalog is loaded once from `music.json` and is read-only afterwards.
//! Handlers share it behind an `Arc` without any locking.
//!
//! Track ids are positional: a record's id is its zero-based index in the
//! source array. Ids are therefore only stable for the lifetime of one
//! process; editing `music.json` and restarting may renumber tracks.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, info};

/// One track as it appears in the source JSON (no id yet)
///
/// Every key is kept exactly as read, including `null` and non-string
/// values, and is emitted back verbatim. The known fields are only
/// interpreted through the accessors below.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackRecord {
    fields: Map<String, Value>,
}

impl TrackRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// All source fields in source order
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// A field's value when it is a JSON string
    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.text("title")
    }

    pub fn artist(&self) -> Option<&str> {
        self.text("artist")
    }

    pub fn album(&self) -> Option<&str> {
        self.text("album")
    }

    /// Audio file location relative to the audio root
    pub fn audio_path(&self) -> Option<&str> {
        self.text("audio_path")
    }
}

impl From<Map<String, Value>> for TrackRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

/// A catalog entry: the source record plus its load-time id
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    pub id: usize,

    #[serde(flatten)]
    pub record: TrackRecord,
}

impl Track {
    /// Case-insensitive substring match over title, artist and album.
    ///
    /// `needle` must already be lowercased. Fields that are missing or not
    /// strings match as "".
    fn matches_lowercase(&self, needle: &str) -> bool {
        [
            self.record.title(),
            self.record.artist(),
            self.record.album(),
        ]
        .into_iter()
        .any(|field| field.unwrap_or_default().to_lowercase().contains(needle))
    }
}

/// Ordered, immutable set of tracks
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    /// Load the catalog from a JSON file
    ///
    /// The file must hold a JSON array of objects; their fields are not
    /// otherwise checked. A missing file is reported as [`Error::NotFound`],
    /// malformed content as [`Error::Json`].
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::NotFound(format!(
                    "music.json not found: {}",
                    path.display()
                )));
            }
            Err(e) => return Err(Error::Io(e)),
        };

        let records: Vec<TrackRecord> = serde_json::from_slice(&bytes)?;
        let catalog = Self::from_records(records);

        info!(
            "Loaded {} tracks from {}",
            catalog.len(),
            path.display()
        );

        Ok(catalog)
    }

    /// Parse a catalog from JSON text (same rules as [`Catalog::load`])
    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<TrackRecord> = serde_json::from_str(json)?;
        Ok(Self::from_records(records))
    }

    /// Build a catalog from already-parsed records, assigning positional ids
    ///
    /// Any `id` key carried in a record is dropped.
    pub fn from_records(records: Vec<TrackRecord>) -> Self {
        let tracks = records
            .into_iter()
            .enumerate()
            .map(|(id, mut record)| {
                if record.fields.remove("id").is_some() {
                    debug!("Overwriting source id for track at position {}", id);
                }
                Track { id, record }
            })
            .collect();

        Self { tracks }
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Iterate tracks in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    /// Case-insensitive substring search over title, artist and album
    ///
    /// Results keep catalog order. An empty query matches every track, so
    /// `search("")` returns the whole catalog.
    pub fn search(&self, query: &str) -> Vec<&Track> {
        let needle = query.to_lowercase();
        self.tracks
            .iter()
            .filter(|track| track.matches_lowercase(&needle))
            .collect()
    }

    /// Look up a track by id
    ///
    /// Negative or out-of-range ids return [`Error::NotFound`].
    pub fn get(&self, id: i64) -> Result<&Track> {
        usize::try_from(id)
            .ok()
            .and_then(|index| self.tracks.get(index))
            .ok_or_else(|| Error::NotFound("Track not found".to_string()))
    }
}
