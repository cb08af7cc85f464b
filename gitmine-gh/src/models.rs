use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Represents GitHub authentication credentials
#[derive(Clone)]
pub struct GitHubAuth {
  pub username: String,
  pub token: String,
}

impl fmt::Debug for GitHubAuth {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("GitHubAuth")
      .field("username", &self.username)
      .field("token", &"[REDACTED]")
      .finish()
  }
}

/// Sort order for issue listings, sent as the `direction` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
  Asc,
  #[default]
  Desc,
}

impl SortDirection {
  pub fn as_str(&self) -> &'static str {
    match self {
      SortDirection::Asc => "asc",
      SortDirection::Desc => "desc",
    }
  }
}

impl fmt::Display for SortDirection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Represents a GitHub user
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubUser {
  pub login: String,
  pub id: u64,
  pub name: Option<String>,
}

/// Represents a label attached to an issue or pull request
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubLabel {
  pub name: String,
}

/// The parts of a repository gitmine needs
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubRepository {
  pub full_name: String,
  #[serde(default)]
  pub html_url: Option<String>,
}

/// An issue, or a pull request as returned by the issues and search APIs
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubIssue {
  pub number: u64,
  pub title: String,
  pub html_url: String,
  #[serde(default)]
  pub state: Option<String>,
  pub created_at: DateTime<Utc>,
  #[serde(default)]
  pub labels: Vec<GitHubLabel>,
  /// Present on `/issues` results only
  #[serde(default)]
  pub repository: Option<GitHubRepository>,
  /// Present when the entry is a pull request
  #[serde(default)]
  pub pull_request: Option<serde_json::Value>,
}

impl GitHubIssue {
  pub fn is_pull_request(&self) -> bool {
    self.pull_request.is_some()
  }

  pub fn label_names(&self) -> Vec<String> {
    self.labels.iter().map(|label| label.name.clone()).collect()
  }
}

/// Envelope of the search API
#[derive(Debug, Deserialize)]
pub struct SearchResults<T> {
  pub total_count: u64,
  #[serde(default)]
  pub incomplete_results: bool,
  pub items: Vec<T>,
}
