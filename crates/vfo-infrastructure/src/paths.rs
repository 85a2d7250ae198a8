//! Path management for vfo configuration and data files.
//!
//! ```text
//! ~/.config/vfo/            # Config directory
//! └── config.toml           # Application configuration
//!
//! ~/.local/share/vfo/       # Data directory
//! └── store.json            # Key-value store (all collections)
//! ```

use std::path::PathBuf;

use vfo_core::error::{Result, VfoError};

const APP_DIR: &str = "vfo";

pub struct VfoPaths;

impl VfoPaths {
    /// Returns the vfo configuration directory (e.g. `~/.config/vfo/`).
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR))
            .ok_or_else(|| VfoError::config("Cannot find config directory"))
    }

    /// Returns the vfo data directory (e.g. `~/.local/share/vfo/`).
    pub fn data_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|d| d.join(APP_DIR))
            .ok_or_else(|| VfoError::config("Cannot find data directory"))
    }

    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn default_store_file() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("store.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_live_under_app_dirs() {
        // Home may be missing in minimal containers; only check shape when present.
        if let Ok(config) = VfoPaths::config_file() {
            assert!(config.ends_with("vfo/config.toml"));
        }
        if let Ok(store) = VfoPaths::default_store_file() {
            assert!(store.ends_with("vfo/store.json"));
        }
    }
}
