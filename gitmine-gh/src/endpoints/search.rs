//! GitHub Search API endpoint implementations.

use anyhow::Result;
use tracing::{info, instrument, trace};

use crate::client::GitHubClient;
use crate::models::{GitHubIssue, SearchResults};

impl GitHubClient {
  /// Open pull requests that request a review from the client's user.
  ///
  /// # Errors
  ///
  /// Returns an error if no username is configured, authentication fails,
  /// or the response cannot be parsed.
  #[instrument(skip(self), level = "debug")]
  pub async fn list_review_requested_prs(&self) -> Result<Vec<GitHubIssue>> {
    let username = self.username();
    if username.is_empty() {
      anyhow::bail!("No GitHub username configured. Run `gitmine config username <USERNAME>` first.");
    }
    info!("Fetching pull requests awaiting review from {}", username);

    let query = format!("is:open is:pr review-requested:{username}");
    let request = self.get("/search/issues").query(&[("q", query.as_str())]);
    let results: SearchResults<GitHubIssue> = self.send_json(request, "pull requests").await?;

    trace!(
      "Search returned {} of {} pull requests",
      results.items.len(),
      results.total_count
    );
    Ok(results.items)
  }
}
