//! Error taxonomy for the credential store.
//!
//! Every variant is fatal for the current invocation. Callers propagate them
//! to the CLI boundary, which prints a single line and exits non-zero.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::creds::Property;

/// Errors raised while reading, writing, encrypting or decrypting the
/// credentials file.
#[derive(Debug, Error)]
pub enum CredsError {
  /// A property name other than `username` or `token`.
  #[error("Unknown property specified: {0}")]
  InvalidProperty(String),

  /// A value that cannot be represented in the line-based file format.
  #[error("Invalid value for {property}: values must be non-empty and contain no whitespace")]
  InvalidValue { property: Property },

  /// A line in the credentials file is not `<property> <value>`.
  #[error("Malformed credentials file at line {line}: expected '<property> <value>'")]
  MalformedRecord { line: usize },

  /// The envelope could not be authenticated with the stored key.
  #[error("InvalidKey: could not open your credentials file, please reset your credentials (gitmine config --reset)")]
  InvalidKey,

  /// The credentials file is encrypted but the key file is gone.
  #[error(
    "MissingKey: credentials file is currently encrypted and the key is missing, please reset your credentials file (gitmine config --reset)"
  )]
  MissingKey,

  /// The key file does not hold a usable key.
  #[error("Cannot use encryption key: key is in incorrect format, please reset your credentials (gitmine config --reset)")]
  KeyFormat,

  /// Contradictory or impossible request, e.g. decrypting a plaintext store.
  #[error("{0}")]
  Usage(String),

  /// Filesystem failure on one of the store's files.
  #[error("Failed to access {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

impl CredsError {
  /// Wrap an I/O error with the path it happened on.
  pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
    Self::Io {
      path: path.into(),
      source,
    }
  }

  /// Whether the error stems from user input rather than stored state.
  pub fn is_usage(&self) -> bool {
    matches!(
      self,
      Self::InvalidProperty(_) | Self::InvalidValue { .. } | Self::Usage(_)
    )
  }
}
