//! # mcat Common Library
//!
//! Shared code for the mcat catalog service including:
//! - Track records and the in-memory catalog store
//! - Audio file resolution under the audio root
//! - Configuration loading and data directory resolution
//! - Common error types

pub mod catalog;
pub mod config;
pub mod error;
pub mod media;

pub use catalog::{Catalog, Track, TrackRecord};
pub use error::{Error, Result};
