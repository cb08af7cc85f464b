//! Concurrent per-repository fetches.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::Semaphore;
use tracing::{debug, instrument};

use crate::client::GitHubClient;
use crate::models::{GitHubIssue, GitHubRepository, SortDirection};

/// Fetch unassigned issues for every repository, at most `concurrency`
/// requests at a time.
///
/// Only repositories with at least one issue are returned, in the order they
/// were given. The first failed request fails the whole fetch.
#[instrument(skip(client, repos), fields(repos = repos.len()), level = "debug")]
pub async fn fetch_unassigned_issues(
  client: &GitHubClient,
  repos: &[GitHubRepository],
  direction: SortDirection,
  concurrency: usize,
) -> Result<Vec<(String, Vec<GitHubIssue>)>> {
  let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
  let mut handles = Vec::with_capacity(repos.len());

  for repo in repos {
    let semaphore = semaphore.clone();
    let client = client.clone();
    let full_name = repo.full_name.clone();

    handles.push(tokio::spawn(async move {
      let _permit = semaphore.acquire_owned().await.context("Fetch pool was closed")?;
      let issues = client.list_unassigned_repo_issues(&full_name, direction).await?;
      Ok::<_, anyhow::Error>((full_name, issues))
    }));
  }

  let mut results = Vec::new();
  for handle in handles {
    let (full_name, issues) = handle.await.context("Issue fetch task failed")??;
    if issues.is_empty() {
      debug!("No unassigned issues in {}", full_name);
      continue;
    }
    results.push((full_name, issues));
  }

  Ok(results)
}

#[cfg(test)]
mod tests {
  use serde_json::json;
  use wiremock::matchers::{method, path, query_param};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::*;
  use crate::client::create_github_client;

  fn repo(full_name: &str) -> GitHubRepository {
    GitHubRepository {
      full_name: full_name.to_string(),
      html_url: None,
    }
  }

  fn issue_json(number: u64, repo: &str) -> serde_json::Value {
    json!({
      "number": number,
      "title": format!("Issue {number}"),
      "html_url": format!("https://github.com/{repo}/issues/{number}"),
      "created_at": "2023-01-01T12:00:00Z"
    })
  }

  #[tokio::test]
  async fn test_keeps_repos_with_issues_in_input_order() -> Result<()> {
    let mock_server = MockServer::start().await;

    for (name, body) in [
      ("owner/a", json!([issue_json(1, "owner/a")])),
      ("owner/b", json!([])),
      ("owner/c", json!([issue_json(2, "owner/c"), issue_json(3, "owner/c")])),
    ] {
      Mock::given(method("GET"))
        .and(path(format!("/repos/{name}/issues")))
        .and(query_param("assignee", "none"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&mock_server)
        .await;
    }

    let client = create_github_client("test_user", "test_token").with_base_url(mock_server.uri());
    let repos = vec![repo("owner/a"), repo("owner/b"), repo("owner/c")];
    let results = fetch_unassigned_issues(&client, &repos, SortDirection::Desc, 2).await?;

    let names: Vec<&str> = results.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["owner/a", "owner/c"]);
    assert_eq!(results[1].1.len(), 2);

    Ok(())
  }

  #[tokio::test]
  async fn test_empty_repo_list() -> Result<()> {
    let client = create_github_client("test_user", "test_token");
    let results = fetch_unassigned_issues(&client, &[], SortDirection::Asc, 5).await?;
    assert!(results.is_empty());
    Ok(())
  }

  #[tokio::test]
  async fn test_failure_in_one_repo_fails_fetch() -> Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
      .and(path("/repos/owner/ok/issues"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([issue_json(1, "owner/ok")])))
      .mount(&mock_server)
      .await;
    Mock::given(method("GET"))
      .and(path("/repos/owner/broken/issues"))
      .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
      .mount(&mock_server)
      .await;

    let client = create_github_client("test_user", "test_token").with_base_url(mock_server.uri());
    let repos = vec![repo("owner/ok"), repo("owner/broken")];
    let err = fetch_unassigned_issues(&client, &repos, SortDirection::Desc, 0)
      .await
      .unwrap_err();

    assert!(err.to_string().contains("HTTP 500"));
    Ok(())
  }
}
