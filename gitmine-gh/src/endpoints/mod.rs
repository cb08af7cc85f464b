//! # GitHub API Endpoints
//!
//! Endpoint implementations grouped by GitHub API resource type. Each module
//! adds methods to [`crate::GitHubClient`].

pub mod issues;
pub mod repos;
pub mod search;
pub mod users;
