use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::model::{Track, TrackMedia};
use super::sanitize::is_allowed_name;

const INFO_FILE: &str = "info.json";
const AUDIO_DIR: &str = "audio";
const AUDIO_FILE: &str = "track.mp3";
const IMAGE_DIR: &str = "image";
const COVER_FILE: &str = "cover.png";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("track name {0:?} is not allowed")]
    InvalidName(String),
    #[error("track {0:?} not found")]
    NotFound(String),
    #[error("track {name:?} has invalid metadata: {reason}")]
    InvalidData { name: String, reason: String },
    #[error("data directory {0:?} is not a directory")]
    NotADirectory(PathBuf),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// On-disk track storage rooted at the data directory.
///
/// Layout, one directory per track keyed by its title:
///
/// ```text
/// <root>/<title>/info.json
/// <root>/<title>/audio/track.mp3
/// <root>/<title>/image/cover.png
/// ```
///
/// Every name is passed through [`is_allowed_name`] before it is joined onto
/// `root`, so nothing outside the data directory is ever touched.
#[derive(Debug, Clone)]
pub struct TrackStore {
    root: PathBuf,
}

impl TrackStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load every readable track directly under the data directory.
    ///
    /// Entries with a missing or malformed `info.json`, a rejected name, or a
    /// title that does not match the directory name are skipped. Only an
    /// unreadable data directory is an error. Results are ordered by
    /// directory name.
    pub fn load_all(&self) -> Result<Vec<Track>, StoreError> {
        if !fs::metadata(&self.root)?.is_dir() {
            return Err(StoreError::NotADirectory(self.root.clone()));
        }

        let mut tracks = Vec::new();

        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                // Depth 0 is the data directory itself.
                Err(e) if e.depth() == 0 => return Err(StoreError::Io(e.into())),
                Err(e) => {
                    debug!(error = %e, "skipping unreadable track entry");
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }

            let Some(name) = entry.file_name().to_str() else {
                debug!(path = %entry.path().display(), "skipping non-utf8 track directory");
                continue;
            };

            match self.load_one(name) {
                Ok(track) => tracks.push(track),
                Err(e) => warn!(track = name, error = %e, "skipping track"),
            }
        }

        Ok(tracks)
    }

    /// Read and parse `<root>/<name>/info.json`.
    pub fn load_one(&self, name: &str) -> Result<Track, StoreError> {
        let path = self.track_dir(name)?.join(INFO_FILE);

        let bytes = fs::read(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(name.to_string()),
            _ => StoreError::Io(e),
        })?;

        let track: Track =
            serde_json::from_slice(&bytes).map_err(|e| StoreError::InvalidData {
                name: name.to_string(),
                reason: e.to_string(),
            })?;

        if track.title != name {
            return Err(StoreError::InvalidData {
                name: name.to_string(),
                reason: format!("stored title {:?} does not match", track.title),
            });
        }

        Ok(track)
    }

    /// Persist a track's metadata, creating its directory tree if needed.
    ///
    /// Audio and cover files are left as they are.
    pub fn create(&self, track: &Track) -> Result<(), StoreError> {
        self.create_with_media(track, &TrackMedia::default())
    }

    /// Persist a track's metadata along with any supplied media payloads.
    ///
    /// Media is written before `info.json`, and each file lands through a
    /// temporary sibling plus rename. A crash part way through leaves a
    /// directory without a readable `info.json`, which [`Self::load_all`]
    /// skips.
    pub fn create_with_media(&self, track: &Track, media: &TrackMedia) -> Result<(), StoreError> {
        let dir = self.track_dir(&track.title)?;
        fs::create_dir_all(&dir)?;

        if let Some(audio) = &media.audio {
            let audio_dir = dir.join(AUDIO_DIR);
            fs::create_dir_all(&audio_dir)?;
            write_atomic(&audio_dir.join(AUDIO_FILE), audio)?;
        }

        if let Some(cover) = &media.cover {
            let image_dir = dir.join(IMAGE_DIR);
            fs::create_dir_all(&image_dir)?;
            write_atomic(&image_dir.join(COVER_FILE), cover)?;
        }

        let bytes = serde_json::to_vec_pretty(track).map_err(|e| StoreError::InvalidData {
            name: track.title.clone(),
            reason: e.to_string(),
        })?;
        write_atomic(&dir.join(INFO_FILE), &bytes)?;

        debug!(track = %track.title, audio = media.audio.is_some(), cover = media.cover.is_some(), "track written");
        Ok(())
    }

    /// Path of a track's audio file. The file may not exist.
    pub fn audio_path(&self, name: &str) -> Result<PathBuf, StoreError> {
        Ok(self.track_dir(name)?.join(AUDIO_DIR).join(AUDIO_FILE))
    }

    /// Path of a track's cover image. The file may not exist.
    pub fn cover_path(&self, name: &str) -> Result<PathBuf, StoreError> {
        Ok(self.track_dir(name)?.join(IMAGE_DIR).join(COVER_FILE))
    }

    fn track_dir(&self, name: &str) -> Result<PathBuf, StoreError> {
        if !is_allowed_name(name) {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

/// Write `bytes` to `path` via a temporary sibling and a rename.
fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let mut file = fs::File::create(&tmp)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&tmp, path)
}
