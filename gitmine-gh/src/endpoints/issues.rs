//! GitHub Issues API endpoint implementations.

use anyhow::Result;
use tracing::{info, instrument, trace};

use crate::client::GitHubClient;
use crate::models::{GitHubIssue, SortDirection};

impl GitHubClient {
  /// Open issues assigned to the authenticated user, across all repositories.
  ///
  /// The `/issues` endpoint also returns pull requests assigned to the user;
  /// those are dropped.
  ///
  /// # Errors
  ///
  /// Returns an error if authentication fails, the request cannot be sent,
  /// or the response cannot be parsed.
  #[instrument(skip(self), level = "debug")]
  pub async fn list_assigned_issues(&self, direction: SortDirection) -> Result<Vec<GitHubIssue>> {
    info!("Fetching assigned issues");

    let request = self.get("/issues").query(&[("direction", direction.as_str())]);
    let issues: Vec<GitHubIssue> = self.send_json(request, "issues").await?;

    let issues: Vec<GitHubIssue> = issues.into_iter().filter(|issue| !issue.is_pull_request()).collect();
    trace!("Received {} assigned issues", issues.len());
    Ok(issues)
  }

  /// Open issues without an assignee in one repository.
  #[instrument(skip(self), level = "debug")]
  pub async fn list_unassigned_repo_issues(&self, full_name: &str, direction: SortDirection) -> Result<Vec<GitHubIssue>> {
    info!("Fetching unassigned issues for {}", full_name);

    let request = self
      .get(&format!("/repos/{full_name}/issues"))
      .query(&[("direction", direction.as_str()), ("assignee", "none")]);
    let issues: Vec<GitHubIssue> = self
      .send_json(request, &format!("issues for {full_name}"))
      .await?;

    let issues: Vec<GitHubIssue> = issues.into_iter().filter(|issue| !issue.is_pull_request()).collect();
    trace!("Received {} unassigned issues for {}", issues.len(), full_name);
    Ok(issues)
  }
}
