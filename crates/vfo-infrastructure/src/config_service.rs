//! Configuration service.
//!
//! Loads [`AppConfig`] from `config.toml` and caches it.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use vfo_core::config::AppConfig;
use vfo_core::error::{Result, VfoError};

use crate::paths::VfoPaths;

/// Loads and caches the application configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    config: Arc<RwLock<Option<AppConfig>>>,
}

impl ConfigService {
    /// Uses the default location (`~/.config/vfo/config.toml`).
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(VfoPaths::config_file()?))
    }

    /// Uses an explicit config file, e.g. from `--config`.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Returns the configuration, reading the file on first access.
    ///
    /// A missing file yields defaults; a malformed one is a config error.
    pub fn get_config(&self) -> Result<AppConfig> {
        {
            let read_lock = self
                .config
                .read()
                .map_err(|_| VfoError::internal("config cache lock poisoned"))?;
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = self.load_config()?;

        let mut write_lock = self
            .config
            .write()
            .map_err(|_| VfoError::internal("config cache lock poisoned"))?;
        *write_lock = Some(loaded.clone());

        Ok(loaded)
    }

    /// Forces a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = None;
        }
    }

    /// Writes `config` to the file and refreshes the cache.
    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, toml::to_string_pretty(config)?)?;
        self.invalidate_cache();
        Ok(())
    }

    /// The JSON store location: `data_file` when set, else the platform
    /// default.
    pub fn store_file(&self) -> Result<PathBuf> {
        match self.get_config()?.data_file {
            Some(path) => Ok(path),
            None => VfoPaths::default_store_file(),
        }
    }

    fn load_config(&self) -> Result<AppConfig> {
        if !self.path.exists() {
            tracing::debug!(
                "[Config] No config file at {}, using defaults",
                self.path.display()
            );
            return Ok(AppConfig::default());
        }
        let content = fs::read_to_string(&self.path)?;
        toml::from_str(&content).map_err(|e| {
            VfoError::config(format!("Invalid config file {}: {}", self.path.display(), e))
        })
    }
}
