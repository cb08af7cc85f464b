//! # Go Command
//!
//! Opens a repository, issue, or pull request on github.com.

use anyhow::Result;
use clap::Args;
use gitmine_core::utils::{github_web_url, open_url_in_browser};

/// Command for opening GitHub pages
#[derive(Args)]
pub struct GoArgs {
  /// Repository full name (owner/name)
  #[arg(value_name = "REPO", value_parser = parse_repo)]
  pub repo: String,

  /// Issue or pull request number
  #[arg(value_name = "NUMBER")]
  pub number: Option<u64>,
}

fn parse_repo(value: &str) -> Result<String, String> {
  match value.split_once('/') {
    Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => Ok(value.to_string()),
    _ => Err(format!("'{value}' is not a repository name of the form owner/name")),
  }
}

/// Handle the go command
pub(crate) fn handle_go_command(args: GoArgs) -> Result<()> {
  open_url_in_browser(&github_web_url(&args.repo, args.number))
}
