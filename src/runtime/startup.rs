use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::{LoadError, Settings};
use crate::library::{StoreError, Track, TrackStore};

/// Failures that stop the process before or while serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] LoadError),
    #[error("failed to load track data from {path:?}: {source}")]
    Catalog { path: PathBuf, source: StoreError },
    #[error("failed to bind {addr}: {source}")]
    Bind { addr: String, source: io::Error },
    #[error("server error: {0}")]
    Serve(io::Error),
}

impl StartupError {
    /// Process exit status, one per failure stage.
    pub fn exit_code(&self) -> u8 {
        match self {
            StartupError::Config(LoadError::Open { .. }) => 1,
            StartupError::Config(LoadError::Read { .. }) => 2,
            StartupError::Config(LoadError::Parse(_) | LoadError::Invalid(_)) => 3,
            StartupError::Catalog { .. } => 4,
            StartupError::Bind { .. } | StartupError::Serve(_) => 5,
        }
    }
}

/// Open the track store configured in `settings` and read the full catalog.
pub fn load_catalog(settings: &Settings) -> Result<(TrackStore, Vec<Track>), StartupError> {
    let store = TrackStore::new(&settings.data_dir);
    let tracks = store.load_all().map_err(|source| StartupError::Catalog {
        path: settings.data_dir.clone(),
        source,
    })?;
    Ok((store, tracks))
}
