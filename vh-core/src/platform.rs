//! Platform-specific directories.

use std::path::PathBuf;

use crate::constants::APP_DIR_NAME;
use crate::error::{VhError, VhResult};

/// Application data directory (logs live here).
pub fn data_dir() -> VhResult<PathBuf> {
    let base = dirs::data_dir()
        .ok_or_else(|| VhError::Config("could not determine data directory".into()))?;
    Ok(base.join(APP_DIR_NAME))
}

/// Configuration directory holding `config.toml`.
pub fn config_dir() -> VhResult<PathBuf> {
    let base = dirs::config_dir()
        .ok_or_else(|| VhError::Config("could not determine config directory".into()))?;
    Ok(base.join(APP_DIR_NAME))
}
