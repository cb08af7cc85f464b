//! # GitHub Utility Functions
//!
//! Helper functions for extracting repository information from GitHub URLs.

use std::sync::LazyLock;

use regex::Regex;

static GITHUB_ITEM_REGEX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"github\.com/([^/]+/[^/]+)/(?:pull|issues)/\d+").expect("Failed to compile GitHub item regex")
});

/// Extract `owner/repo` from the web URL of an issue or pull request.
///
/// Matches patterns like:
/// - `https://github.com/owner/repo/pull/123`
/// - `https://github.com/owner/repo/issues/7#issuecomment-1`
pub fn repo_name_from_html_url(url: &str) -> Option<String> {
  GITHUB_ITEM_REGEX
    .captures(url)
    .and_then(|captures| captures.get(1))
    .map(|name| name.as_str().to_string())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_repo_name_from_pull_url() {
    assert_eq!(
      repo_name_from_html_url("https://github.com/joecummings/gitmine/pull/123"),
      Some("joecummings/gitmine".to_string())
    );
  }

  #[test]
  fn test_repo_name_from_issue_url_with_fragment() {
    assert_eq!(
      repo_name_from_html_url("https://github.com/owner/repo/issues/7#issuecomment-1"),
      Some("owner/repo".to_string())
    );
  }

  #[test]
  fn test_repo_name_from_invalid_url() {
    assert_eq!(repo_name_from_html_url("https://github.com/owner/repo"), None);
    assert_eq!(repo_name_from_html_url("https://example.com/owner/repo/pull/1"), None);
    assert_eq!(repo_name_from_html_url("https://github.com/owner/repo/pull/abc"), None);
  }
}
