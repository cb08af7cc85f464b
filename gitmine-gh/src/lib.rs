//! # GitHub API Client
//!
//! Provides the GitHub REST API calls gitmine needs: issues assigned to the
//! user, pull requests awaiting their review, and unassigned issues across
//! the repositories they collaborate on.

pub mod auth;
pub mod client;
pub mod consts;
pub mod endpoints;
pub mod fanout;
pub mod models;
pub mod utils;

// Re-export the client
pub use auth::{create_github_client_from_store, create_github_runtime_and_client};
pub use client::{GitHubClient, create_github_client};
pub use fanout::fetch_unassigned_issues;
// Re-export models
pub use models::{GitHubAuth, GitHubIssue, GitHubLabel, GitHubRepository, GitHubUser, SearchResults, SortDirection};
pub use utils::repo_name_from_html_url;
