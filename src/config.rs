use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ReleaseError, Result};

/// Defaults for release computation, loadable from `gitrelease.toml`.
///
/// Command-line options override whatever the file provides.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
pub struct Config {
    /// Prefix for release tags, e.g. `v`
    #[serde(default)]
    pub tag_prefix: String,

    /// Scope to filter release-note items
    #[serde(default)]
    pub scope: Option<String>,

    /// Keep pre-release tags when resolving the last release
    #[serde(default)]
    pub allow_pre_releases: bool,
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitrelease.toml` in current directory
/// 3. `.gitrelease.toml` in the user config directory
/// 4. Default configuration if no file found
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./gitrelease.toml").exists() {
        fs::read_to_string("./gitrelease.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".gitrelease.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    toml::from_str(&config_str).map_err(|e| ReleaseError::config(format!("invalid config: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.tag_prefix, "");
        assert_eq!(config.scope, None);
        assert!(!config.allow_pre_releases);
    }

    #[test]
    fn test_parse_config() {
        let config: Config =
            toml::from_str("tag_prefix = \"v\"\nscope = \"api\"\nallow_pre_releases = true")
                .unwrap();
        assert_eq!(config.tag_prefix, "v");
        assert_eq!(config.scope.as_deref(), Some("api"));
        assert!(config.allow_pre_releases);
    }

    #[test]
    fn test_parse_partial_config() {
        let config: Config = toml::from_str("tag_prefix = \"release-\"").unwrap();
        assert_eq!(config.tag_prefix, "release-");
        assert_eq!(config.scope, None);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let result = load_config(Some("/nonexistent/gitrelease.toml"));
        assert!(result.is_err());
    }
}
