use serde::{Deserialize, Serialize};

/// One catalog entry, stored as `<data-dir>/<title>/info.json`.
///
/// The title doubles as the directory name, so it is unique across the
/// catalog and only ever holds sanitized characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub title: String,
    pub description: String,
    /// Unix epoch seconds.
    #[serde(rename = "release-date")]
    pub release_date: i64,
}

/// Optional media payloads written alongside a new track's metadata.
#[derive(Debug, Clone, Default)]
pub struct TrackMedia {
    /// Bytes for `audio/track.mp3`.
    pub audio: Option<Vec<u8>>,
    /// Bytes for `image/cover.png`.
    pub cover: Option<Vec<u8>>,
}

impl TrackMedia {
    pub fn is_empty(&self) -> bool {
        self.audio.is_none() && self.cover.is_none()
    }
}
