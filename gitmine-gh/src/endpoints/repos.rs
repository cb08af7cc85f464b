//! GitHub Repositories API endpoint implementations.

use anyhow::Result;
use tracing::{info, instrument, trace};

use crate::client::GitHubClient;
use crate::models::GitHubRepository;

impl GitHubClient {
  /// Repositories where the authenticated user is a collaborator.
  #[instrument(skip(self), level = "debug")]
  pub async fn list_collaborator_repos(&self) -> Result<Vec<GitHubRepository>> {
    info!("Fetching collaborator repositories");

    let request = self.get("/user/repos").query(&[("affiliation", "collaborator")]);
    let repos: Vec<GitHubRepository> = self.send_json(request, "repositories").await?;

    trace!("Received {} repositories", repos.len());
    Ok(repos)
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;
  use wiremock::matchers::{method, path, query_param};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::*;
  use crate::client::create_github_client;

  #[tokio::test]
  async fn test_list_collaborator_repos() -> Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
      .and(path("/user/repos"))
      .and(query_param("affiliation", "collaborator"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([
        {"id": 1, "full_name": "owner/one", "html_url": "https://github.com/owner/one"},
        {"id": 2, "full_name": "owner/two"}
      ])))
      .mount(&mock_server)
      .await;

    let client = create_github_client("test_user", "test_token").with_base_url(mock_server.uri());
    let repos = client.list_collaborator_repos().await?;

    let names: Vec<&str> = repos.iter().map(|repo| repo.full_name.as_str()).collect();
    assert_eq!(names, vec!["owner/one", "owner/two"]);
    assert_eq!(repos[0].html_url.as_deref(), Some("https://github.com/owner/one"));
    assert!(repos[1].html_url.is_none());

    Ok(())
  }
}
