//! Temporary credential files for tests
//!
//! [`CredentialsGuard`] owns a temporary directory that plays the role of
//! the user's home. Tests that spawn the `gitmine` binary point the child's
//! `HOME` at it; in-process tests build their store paths from
//! [`CredentialsGuard::home_dir`]. Nothing touches the process environment.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

const CREDENTIALS_FILE_NAME: &str = ".gitmine_credentials";
const KEY_FILE_NAME: &str = ".gitmine.key";
const ENVELOPE_MARKER: &[u8] = b"gitmine-enc:v1:";

/// RAII guard for a throwaway home directory holding gitmine's credentials
pub struct CredentialsGuard {
  temp_dir: TempDir,
}

impl CredentialsGuard {
  /// Create an empty home directory
  pub fn new() -> Self {
    Self {
      temp_dir: TempDir::new().expect("Failed to create temp directory"),
    }
  }

  /// Create a home directory with a plaintext credentials file
  pub fn with_plaintext(content: &str) -> Self {
    let guard = Self::new();
    guard.write_credentials(content.as_bytes());
    guard
  }

  /// Get the path to the temporary home directory
  pub fn home_dir(&self) -> &Path {
    self.temp_dir.path()
  }

  /// Get the path to the credentials file
  pub fn credentials_path(&self) -> PathBuf {
    self.home_dir().join(CREDENTIALS_FILE_NAME)
  }

  /// Get the path to the key file
  pub fn key_path(&self) -> PathBuf {
    self.home_dir().join(KEY_FILE_NAME)
  }

  /// Overwrite the credentials file
  pub fn write_credentials(&self, content: &[u8]) {
    fs::write(self.credentials_path(), content).expect("Failed to write test credentials file");
  }

  /// Raw contents of the credentials file
  pub fn read_credentials(&self) -> Vec<u8> {
    fs::read(self.credentials_path()).expect("Failed to read test credentials file")
  }

  /// Contents of the credentials file as text
  pub fn read_credentials_text(&self) -> String {
    String::from_utf8(self.read_credentials()).expect("Credentials file is not UTF-8")
  }

  /// Whether the credentials file holds an encrypted envelope
  pub fn is_encrypted(&self) -> bool {
    self.credentials_path().exists() && self.read_credentials().starts_with(ENVELOPE_MARKER)
  }

  pub fn key_exists(&self) -> bool {
    self.key_path().exists()
  }

  /// Delete the key file, leaving any envelope orphaned
  pub fn remove_key(&self) {
    fs::remove_file(self.key_path()).expect("Failed to remove test key file");
  }
}

impl Default for CredentialsGuard {
  fn default() -> Self {
    Self::new()
  }
}
