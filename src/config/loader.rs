use std::path::Path;

use tracing::debug;

use super::{ConfigError, Settings, parse_settings};

/// Read and parse a settings file.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let yaml = std::fs::read_to_string(path)?;
    let settings = parse_settings(&yaml)?;
    debug!(path = %path.display(), ?settings, "loaded settings");
    Ok(settings)
}
