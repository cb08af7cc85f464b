//! # GitHub HTTP Client
//!
//! HTTP client implementation for GitHub API interactions, handling
//! authentication, request building, and response parsing for GitHub REST API
//! operations.

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, StatusCode, header};
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};

use crate::consts::{ACCEPT, API_BASE_URL, AUTH_FAILED, USER_AGENT};
use crate::models::GitHubAuth;

/// Represents a GitHub API client
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct GitHubClient {
  pub(crate) client: Client,
  pub(crate) base_url: String,
  pub(crate) auth: GitHubAuth,
}

impl GitHubClient {
  /// Create a new GitHub client
  pub fn new(auth: GitHubAuth) -> Self {
    let client = Client::new();
    Self {
      client,
      base_url: API_BASE_URL.to_string(),
      auth,
    }
  }

  /// Point the client at another API root, e.g. a GitHub Enterprise server
  pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
    self.base_url = base_url.into().trim_end_matches('/').to_string();
    self
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  pub fn username(&self) -> &str {
    &self.auth.username
  }

  /// Start an authenticated GET request for `path` below the API root
  pub(crate) fn get(&self, path: &str) -> RequestBuilder {
    let url = format!("{}{}", self.base_url, path);
    trace!("GitHub API URL: {}", url);

    self
      .client
      .get(url)
      .header(header::ACCEPT, ACCEPT)
      .header(header::USER_AGENT, USER_AGENT)
      .bearer_auth(&self.auth.token)
  }

  /// Send a request and decode a successful JSON response
  pub(crate) async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<T> {
    let response = request
      .send()
      .await
      .with_context(|| format!("Failed to fetch {what} from GitHub"))?;

    let status = response.status();
    debug!("GitHub API response status: {}", status);

    match status {
      StatusCode::OK => response
        .json::<T>()
        .await
        .with_context(|| format!("Failed to parse GitHub {what} response")),
      StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
        warn!("Authentication failed when accessing GitHub API");
        Err(anyhow::anyhow!(AUTH_FAILED))
      }
      _ => {
        let error_text = response.text().await.unwrap_or_default();
        warn!("Unexpected GitHub API error: HTTP {} - {}", status, error_text);
        Err(anyhow::anyhow!("Unexpected error: HTTP {status} - {error_text}"))
      }
    }
  }

  /// Test the GitHub connection by fetching the current user
  pub async fn test_connection(&self) -> Result<bool> {
    let response = self
      .get("/user")
      .send()
      .await
      .context("Failed to connect to GitHub")?;

    Ok(response.status().is_success())
  }
}

/// Create a GitHub client from credentials
pub fn create_github_client(username: &str, token: &str) -> GitHubClient {
  let auth = GitHubAuth {
    username: username.to_string(),
    token: token.to_string(),
  };

  GitHubClient::new(auth)
}

#[cfg(test)]
mod tests {
  use wiremock::matchers::{header, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::*;

  #[test]
  fn test_github_client_creation() {
    let client = create_github_client("test_user", "test_token");

    assert_eq!(client.base_url(), "https://api.github.com");
    assert_eq!(client.username(), "test_user");
    assert_eq!(client.auth.token, "test_token");
  }

  #[test]
  fn test_with_base_url_trims_slash() {
    let client = create_github_client("test_user", "test_token").with_base_url("https://ghe.example.com/api/v3/");
    assert_eq!(client.base_url(), "https://ghe.example.com/api/v3");
  }

  #[tokio::test]
  async fn test_connection_sends_bearer_token() -> Result<()> {
    let mock_server = MockServer::start().await;
    let client = create_github_client("test_user", "test_token").with_base_url(mock_server.uri());

    Mock::given(method("GET"))
      .and(path("/user"))
      .and(header("Authorization", "Bearer test_token"))
      .and(header("Accept", ACCEPT))
      .and(header("User-Agent", USER_AGENT))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
          "login": "test_user",
          "id": 1234
      })))
      .mount(&mock_server)
      .await;

    assert!(client.test_connection().await?);
    Ok(())
  }

  #[tokio::test]
  async fn test_connection_with_bad_token() -> Result<()> {
    let mock_server = MockServer::start().await;
    let client = create_github_client("test_user", "bad_token").with_base_url(mock_server.uri());

    Mock::given(method("GET"))
      .and(path("/user"))
      .respond_with(ResponseTemplate::new(401))
      .mount(&mock_server)
      .await;

    assert!(!client.test_connection().await?);
    Ok(())
  }
}
