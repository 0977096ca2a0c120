//! Progress record types
//!
//! The record's JSON shape (`{"unlocked": bool, "starsEarned": int}`) is
//! shared with anything else that reads the progress directory, so field
//! names are fixed with serde attributes rather than following Rust naming.

use serde::{Deserialize, Serialize};

/// Highest star rating a level can hold
pub const MAX_STARS: u8 = 3;

/// Current progress file version
pub const CURRENT_PROGRESS_VERSION: u32 = 1;

/// Per-level progress. Absent records read as the default (locked, no stars).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LevelProgressRecord {
    pub unlocked: bool,
    pub stars_earned: u8,
}

impl LevelProgressRecord {
    pub fn unlocked() -> Self {
        Self {
            unlocked: true,
            stars_earned: 0,
        }
    }

    /// Keep the better of the stored rating and `stars`, capped at [`MAX_STARS`].
    pub fn award_stars(&mut self, stars: u8) {
        self.stars_earned = self.stars_earned.max(stars).min(MAX_STARS);
    }
}

/// On-disk envelope around one record
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressFile {
    pub version: u32,
    /// Local time of the write, for humans reading the file
    pub saved_at: String,
    pub record: LevelProgressRecord,
}

impl ProgressFile {
    pub fn new(record: LevelProgressRecord) -> Self {
        Self {
            version: CURRENT_PROGRESS_VERSION,
            saved_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            record,
        }
    }
}

/// Error types for progress load/save
#[derive(Debug)]
pub enum StoreError {
    IoError(std::io::Error),
    SerializationError(serde_json::Error),
    InvalidVersion(u32),
    CorruptedData(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::IoError(e) => write!(f, "IO error: {}", e),
            StoreError::SerializationError(e) => write!(f, "Serialization error: {}", e),
            StoreError::InvalidVersion(v) => write!(f, "Invalid progress version: {}", v),
            StoreError::CorruptedData(msg) => write!(f, "Corrupted progress data: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::IoError(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::SerializationError(err)
    }
}
