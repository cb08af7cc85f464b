//! Authentication helpers for the GitHub client.
//!
//! Builds ready-to-use clients from the credential store so the CLI never
//! handles the token itself.

use anyhow::{Context, Result};
use gitmine_core::creds::{Credentials, Property};
use tokio::runtime::Runtime;
use tracing::debug;

use crate::client::{GitHubClient, create_github_client};

/// Create an authenticated GitHub client from the credential store.
///
/// # Errors
///
/// Fails before any request is made if the store cannot be read or no token
/// is configured.
pub fn create_github_client_from_store(creds: &Credentials, base_url: &str) -> Result<GitHubClient> {
  let token = creds
    .read_property(Property::Token)
    .context("Failed to read GitHub token")?;
  if token.is_empty() {
    anyhow::bail!("No GitHub token configured. Run `gitmine config token <TOKEN>` first.");
  }

  let username = creds
    .read_property(Property::Username)
    .context("Failed to read GitHub username")?;
  debug!("Creating GitHub client for '{}' at {}", username, base_url);

  Ok(create_github_client(&username, &token).with_base_url(base_url))
}

/// Creates a tokio runtime and an authenticated GitHub client.
pub fn create_github_runtime_and_client(creds: &Credentials, base_url: &str) -> Result<(Runtime, GitHubClient)> {
  let client = create_github_client_from_store(creds, base_url)?;
  let rt = Runtime::new().context("Failed to create async runtime")?;
  Ok((rt, client))
}

#[cfg(test)]
mod tests {
  use gitmine_core::creds::{CredentialPaths, CredsError};
  use gitmine_test_utils::CredentialsGuard;

  use super::*;

  fn credentials(guard: &CredentialsGuard) -> Credentials {
    Credentials::new(CredentialPaths::in_home(guard.home_dir()))
  }

  #[test]
  fn test_client_from_plaintext_store() {
    let guard = CredentialsGuard::with_plaintext("username octocat\ntoken gh-token\n");

    let client = create_github_client_from_store(&credentials(&guard), "https://api.github.com").unwrap();
    assert_eq!(client.username(), "octocat");
    assert_eq!(client.auth.token, "gh-token");
  }

  #[test]
  fn test_client_from_encrypted_store() {
    let guard = CredentialsGuard::new();
    let creds = credentials(&guard);
    creds.write_property(Property::Token, "gh-token", Some(true)).unwrap();

    let client = create_github_client_from_store(&creds, "http://localhost:1234/").unwrap();
    assert_eq!(client.auth.token, "gh-token");
    assert_eq!(client.base_url(), "http://localhost:1234");
    assert!(guard.is_encrypted());
  }

  #[test]
  fn test_missing_token_is_reported() {
    let guard = CredentialsGuard::with_plaintext("username octocat\n");

    let err = create_github_client_from_store(&credentials(&guard), "https://api.github.com").unwrap_err();
    assert!(err.to_string().contains("No GitHub token configured"));
  }

  #[test]
  fn test_store_errors_keep_their_type() {
    let guard = CredentialsGuard::new();
    let creds = credentials(&guard);
    creds.write_property(Property::Token, "gh-token", Some(true)).unwrap();
    guard.remove_key();

    let err = create_github_client_from_store(&creds, "https://api.github.com").unwrap_err();
    assert!(matches!(err.downcast_ref::<CredsError>(), Some(CredsError::MissingKey)));
  }
}
