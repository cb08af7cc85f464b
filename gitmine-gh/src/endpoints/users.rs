use anyhow::Result;
use tracing::instrument;

use crate::client::GitHubClient;
use crate::models::GitHubUser;

impl GitHubClient {
  /// Get the current authenticated user
  #[instrument(skip(self), level = "debug")]
  pub async fn get_current_user(&self) -> Result<GitHubUser> {
    self.send_json(self.get("/user"), "user").await
  }
}
