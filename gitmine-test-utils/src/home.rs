//! HOME directory management for testing
//!
//! This module provides utilities for isolating HOME directory during testing
//! to prevent tests from touching the user's real credentials file.

use std::env;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use tempfile::TempDir;

/// Overrides `HOME` with a temporary directory until dropped.
///
/// This changes process-wide state, so only use it in tests that resolve the
/// home directory themselves and do not run alongside other HOME-sensitive
/// tests.
pub struct HomeEnvTestGuard {
  /// The temporary directory that will be used as HOME
  pub temp_dir: TempDir,
  /// The original HOME value
  original_home: Option<PathBuf>,
}

impl HomeEnvTestGuard {
  /// Create a new guard with a temporary HOME directory
  pub fn new() -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let original_home = BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());

    unsafe {
      env::set_var("HOME", temp_dir.path());
    }

    Self {
      temp_dir,
      original_home,
    }
  }

  /// Get the path to the temporary HOME directory
  pub fn home_dir(&self) -> &Path {
    self.temp_dir.path()
  }

  /// Get the path to a file in the temporary HOME directory
  pub fn home_path(&self, relative_path: &str) -> PathBuf {
    self.temp_dir.path().join(relative_path)
  }
}

impl Default for HomeEnvTestGuard {
  fn default() -> Self {
    Self::new()
  }
}

impl Drop for HomeEnvTestGuard {
  fn drop(&mut self) {
    // Restore original HOME environment variable
    unsafe {
      match &self.original_home {
        Some(home) => env::set_var("HOME", home),
        None => env::remove_var("HOME"),
      }
    }
  }
}
