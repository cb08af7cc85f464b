//! # Utility Functions
//!
//! Helpers for building GitHub web URLs and opening them.

use anyhow::Result;

use crate::output::{print_success, print_warning};

/// Web URL for a repository, or for one of its issues or pull requests.
///
/// GitHub redirects `/issues/<n>` to `/pull/<n>` when the number belongs to a
/// pull request, so one form covers both.
pub fn github_web_url(repo: &str, number: Option<u64>) -> String {
  let repo = repo.trim_matches('/');
  match number {
    Some(number) => format!("https://github.com/{repo}/issues/{number}"),
    None => format!("https://github.com/{repo}"),
  }
}

/// Open a URL in the default browser
pub fn open_url_in_browser(url: &str) -> Result<()> {
  match open::that(url) {
    Ok(()) => {
      print_success(&format!("Opening {url} in browser..."));
      Ok(())
    }
    Err(e) => {
      print_warning(&format!("Failed to open browser to {url}: {e}"));
      Ok(())
    }
  }
}
