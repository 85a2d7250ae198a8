//! Application configuration model (`config.toml`).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Key prefix shared by every persisted collection.
pub const DEFAULT_NAMESPACE: &str = "wyAPT_";
/// How many nested `move_stage` transitions a single transition may cause.
pub const DEFAULT_MAX_RULE_CHAIN_DEPTH: usize = 4;

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_rule_chain_depth() -> usize {
    DEFAULT_MAX_RULE_CHAIN_DEPTH
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// JSON store location. `None` resolves to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_max_rule_chain_depth")]
    pub max_rule_chain_depth: usize,
    /// Seed demo bookings and default content on `init`.
    #[serde(default = "default_true")]
    pub seed_on_init: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: None,
            namespace: default_namespace(),
            log_level: default_log_level(),
            max_rule_chain_depth: default_max_rule_chain_depth(),
            seed_on_init: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str("log_level = \"debug\"\n").unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.namespace, "wyAPT_");
        assert_eq!(config.max_rule_chain_depth, 4);
        assert!(config.seed_on_init);
        assert!(config.data_file.is_none());
    }
}
