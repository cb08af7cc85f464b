//! Constants for the gitmine-gh client

/// Base URL for the official SaaS GitHub API
pub const API_BASE_URL: &str = gitmine_core::consts::DEFAULT_API_BASE_URL;

/// User-Agent header value for the GitHub API client
pub const USER_AGENT: &str = concat!("gitmine/", env!("CARGO_PKG_VERSION"));

/// Accept header value for the GitHub API
pub const ACCEPT: &str = "application/vnd.github.v3+json";

/// Message for 401 and 403 responses
pub const AUTH_FAILED: &str =
  "Authentication failed. Please check your GitHub credentials (gitmine config token <TOKEN>).";
