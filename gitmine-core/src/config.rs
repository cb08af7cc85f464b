//! # Configuration Management
//!
//! Locates gitmine's files and loads the optional `config.toml` settings.
//! Credentials live in the home directory; settings live in the platform
//! config directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{CONFIG_FILE_NAME, DEFAULT_API_BASE_URL, ENV_API_URL};
use crate::creds::CredentialPaths;

/// Represents the configuration directories for the gitmine application
#[derive(Debug, Clone)]
pub struct ConfigDirs {
  pub config_dir: PathBuf,
  pub home_dir: PathBuf,
}

impl ConfigDirs {
  /// Create a new ConfigDirs instance
  pub fn new() -> Result<Self> {
    let proj_dirs = ProjectDirs::from("", "", "gitmine").context("Failed to determine project directories")?;
    let base_dirs = BaseDirs::new().context("Failed to determine home directory")?;

    Ok(Self {
      config_dir: proj_dirs.config_dir().to_path_buf(),
      home_dir: base_dirs.home_dir().to_path_buf(),
    })
  }

  /// Get the config directory
  pub fn config_dir(&self) -> &PathBuf {
    &self.config_dir
  }

  /// Get the path to the settings file
  pub fn config_path(&self) -> PathBuf {
    self.config_dir.join(CONFIG_FILE_NAME)
  }

  /// Get the locations of the credentials file and the key file
  pub fn credential_paths(&self) -> CredentialPaths {
    CredentialPaths::in_home(&self.home_dir)
  }

  /// Load settings from the config directory, falling back to defaults
  pub fn load_config(&self) -> Result<GitmineConfig> {
    let mut config = GitmineConfig::load_from(&self.config_path())?;
    config.apply_env_overrides();
    Ok(config)
  }
}

/// Get the configuration directories
pub fn get_config_dirs() -> Result<ConfigDirs> {
  ConfigDirs::new()
}

/// User settings for report rendering and the GitHub client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitmineConfig {
  /// Root of the GitHub REST API, for GitHub Enterprise installs
  pub api_base_url: String,
  /// Items younger than this many days are shown in green
  pub ok_delta_days: i64,
  /// Items younger than this many days are shown in yellow, older in red
  pub warning_delta_days: i64,
  /// Reports with more rows than this go through the pager
  pub max_rows_before_pager: usize,
  /// Concurrent requests when fetching issues per repository
  pub fetch_concurrency: usize,
}

impl Default for GitmineConfig {
  fn default() -> Self {
    Self {
      api_base_url: DEFAULT_API_BASE_URL.to_string(),
      ok_delta_days: 2,
      warning_delta_days: 5,
      max_rows_before_pager: 20,
      fetch_concurrency: 5,
    }
  }
}

impl GitmineConfig {
  /// Load settings from `path`, or the defaults if it does not exist.
  pub fn load_from(path: &Path) -> Result<Self> {
    if !path.exists() {
      debug!("No config file at {}, using defaults", path.display());
      return Ok(Self::default());
    }

    let content =
      fs::read_to_string(path).with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: GitmineConfig =
      toml::from_str(&content).with_context(|| format!("Failed to parse config from {}", path.display()))?;

    debug!("Loaded config from {}", path.display());
    Ok(config)
  }

  /// Save settings to `path`, creating its directory if needed.
  pub fn save_to(&self, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }

    let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;
    fs::write(path, content).with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
  }

  /// Apply overrides from the environment.
  pub fn apply_env_overrides(&mut self) {
    if let Ok(url) = std::env::var(ENV_API_URL)
      && !url.trim().is_empty()
    {
      debug!("Using GitHub API URL from {ENV_API_URL}");
      self.api_base_url = url.trim().trim_end_matches('/').to_string();
    }
  }
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;

  #[test]
  fn test_defaults() {
    let config = GitmineConfig::default();
    assert_eq!(config.api_base_url, "https://api.github.com");
    assert_eq!(config.ok_delta_days, 2);
    assert_eq!(config.warning_delta_days, 5);
    assert_eq!(config.max_rows_before_pager, 20);
    assert_eq!(config.fetch_concurrency, 5);
  }

  #[test]
  fn test_load_missing_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = GitmineConfig::load_from(&temp_dir.path().join("config.toml")).unwrap();
    assert_eq!(config, GitmineConfig::default());
  }

  #[test]
  fn test_partial_file_keeps_other_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "ok_delta_days = 1\nfetch_concurrency = 10\n").unwrap();

    let config = GitmineConfig::load_from(&path).unwrap();
    assert_eq!(config.ok_delta_days, 1);
    assert_eq!(config.fetch_concurrency, 10);
    assert_eq!(config.warning_delta_days, 5);
    assert_eq!(config.api_base_url, "https://api.github.com");
  }

  #[test]
  fn test_save_then_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("config.toml");
    let config = GitmineConfig {
      api_base_url: "https://github.example.com/api/v3".to_string(),
      max_rows_before_pager: 50,
      ..Default::default()
    };

    config.save_to(&path).unwrap();
    assert_eq!(GitmineConfig::load_from(&path).unwrap(), config);
  }

  #[test]
  fn test_invalid_toml_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "ok_delta_days = \"soon\"\n").unwrap();

    let err = GitmineConfig::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config"));
  }

  #[test]
  fn test_config_dirs_follow_home() {
    let home = gitmine_test_utils::HomeEnvTestGuard::new();
    let config_dirs = get_config_dirs().unwrap();

    assert_eq!(config_dirs.home_dir, home.home_dir());
    assert_eq!(config_dirs.credential_paths().credentials, home.home_path(".gitmine_credentials"));
    assert!(config_dirs.config_path().ends_with("config.toml"));
  }

  #[test]
  fn test_credential_paths_live_in_home() {
    let config_dirs = ConfigDirs {
      config_dir: PathBuf::from("/tmp/config/gitmine"),
      home_dir: PathBuf::from("/tmp/home"),
    };
    let paths = config_dirs.credential_paths();
    assert_eq!(paths.credentials, PathBuf::from("/tmp/home/.gitmine_credentials"));
    assert_eq!(paths.key, PathBuf::from("/tmp/home/.gitmine.key"));
    assert_eq!(config_dirs.config_path(), PathBuf::from("/tmp/config/gitmine/config.toml"));
  }
}
