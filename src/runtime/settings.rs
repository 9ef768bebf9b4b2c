use tracing::debug;

use super::startup::StartupError;
use crate::config::{self, resolve_config_path};

pub fn load_settings() -> Result<config::Settings, StartupError> {
    let path = resolve_config_path();
    debug!(path = %path.display(), "loading config");

    // Unlike the data directory, a broken config is never papered over with
    // defaults: the admin credentials have none.
    Ok(config::Settings::load_from(&path)?)
}
