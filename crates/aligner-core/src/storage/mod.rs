mod config;

pub use config::{AdvisoryConfig, Config, DisplayConfig};

use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Returns `~/.config/aligner-tracker[-dev]/` based on ALIGNER_ENV.
///
/// Set ALIGNER_ENV=dev to use the development directory, or
/// ALIGNER_CONFIG_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("ALIGNER_CONFIG_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::config_dir()
                .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
                .ok_or_else(|| ConfigError::NoDataDir("no home directory".into()))?;

            let env = std::env::var("ALIGNER_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("aligner-tracker-dev")
            } else {
                base_dir.join("aligner-tracker")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
