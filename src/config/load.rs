use std::env;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::schema::Settings;

/// Config file used when `TRACKSHELF_CONFIG_PATH` is not set.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// The stage at which loading the configuration failed.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] ::config::ConfigError),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration loading helpers.
///
/// The file is opened and read by hand so each failure stage can be told
/// apart; the contents are then layered under `TRACKSHELF__` environment
/// variables and deserialized with the `config` crate.
impl Settings {
    /// Load settings from `path` and the environment.
    pub fn load_from(path: &Path) -> Result<Self, LoadError> {
        let mut file = File::open(path).map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let mut raw = String::new();
        file.read_to_string(&mut raw)
            .map_err(|source| LoadError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        Self::parse(&raw)
    }

    /// Parse settings from JSON text, applying environment overrides.
    pub fn parse(raw: &str) -> Result<Self, LoadError> {
        let cfg = ::config::Config::builder()
            .add_source(::config::File::from_str(raw, ::config::FileFormat::Json))
            .add_source(
                ::config::Environment::with_prefix("TRACKSHELF")
                    .separator("__")
                    .convert_case(::config::Case::Kebab)
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = cfg.try_deserialize()?;
        settings.validate().map_err(LoadError::Invalid)?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.admin_username.is_empty() {
            return Err("admin-username must not be empty".to_string());
        }
        if self.admin_password.is_empty() {
            return Err("admin-password must not be empty".to_string());
        }
        if self.max_upload_bytes == 0 {
            return Err("max-upload-bytes must be >= 1".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `TRACKSHELF_CONFIG_PATH`, falling back to
/// [`DEFAULT_CONFIG_FILE`] in the working directory.
pub fn resolve_config_path() -> PathBuf {
    env::var_os("TRACKSHELF_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}
