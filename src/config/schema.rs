use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

/// Process-wide settings loaded once from `config.json`.
///
/// File format: JSON
/// Default path: `config.json` in the working directory, or `TRACKSHELF_CONFIG_PATH`.
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `TRACKSHELF__`, `__` as nested separator)
/// 2) Config file
/// 3) Struct defaults
///
/// The value is never mutated after startup.
#[derive(Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    /// TCP port the HTTP server listens on.
    pub port: u16,
    /// Interface address to bind, e.g. `0.0.0.0` or `127.0.0.1`.
    pub host: String,
    pub admin_username: String,
    pub admin_password: String,
    /// Root directory holding one subdirectory per track.
    pub data_dir: PathBuf,
    /// Directory holding `main.css` and `img/icon.png`.
    pub pages_dir: PathBuf,
    /// Upper bound on a create-track request body, uploads included.
    pub max_upload_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
            admin_username: String::new(),
            admin_password: String::new(),
            data_dir: PathBuf::from("./data"),
            pages_dir: PathBuf::from("./pages"),
            max_upload_bytes: 64 * 1024 * 1024,
        }
    }
}

// Hand-written so the admin password never ends up in a log line.
impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("port", &self.port)
            .field("host", &self.host)
            .field("admin_username", &self.admin_username)
            .field("admin_password", &"<redacted>")
            .field("data_dir", &self.data_dir)
            .field("pages_dir", &self.pages_dir)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}
