//! # Get Command
//!
//! Fetches assigned issues, review requests, or unassigned issues across the
//! user's repositories and prints them grouped by repository.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, ValueEnum};
use gitmine_core::GitmineConfig;
use gitmine_core::creds::Credentials;
use gitmine_core::output::print_info;
use gitmine_gh::{GitHubClient, SortDirection, create_github_runtime_and_client, fetch_unassigned_issues};
use tracing::{debug, info};

use crate::pager::page_or_print;
use crate::report::{AgeThresholds, ElementKind, RenderOptions, RepoMap, SEPARATOR, render};

/// What to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Target {
  /// Issues assigned to you
  Issues,
  /// Pull requests awaiting your review
  Prs,
  /// Both, issues first
  All,
}

/// Command for fetching issues and pull requests
#[derive(Args)]
pub struct GetArgs {
  /// What to fetch
  #[arg(value_enum, value_name = "TARGET")]
  pub target: Target,

  /// Color numbers and ages by how old each item is (default)
  #[arg(long, overrides_with = "no_color")]
  pub color: bool,

  /// Print rows without age colors
  #[arg(long = "no-color", overrides_with = "color")]
  pub no_color: bool,

  /// Oldest first
  #[arg(long, conflicts_with = "desc")]
  pub asc: bool,

  /// Newest first (default)
  #[arg(long)]
  pub desc: bool,

  /// Only show items from this repository (owner/name)
  #[arg(short = 'r', long = "repo", value_name = "REPO")]
  pub repo: Option<String>,

  /// Show unassigned issues from the repositories you collaborate on
  #[arg(short = 'u', long)]
  pub unassigned: bool,
}

impl GetArgs {
  pub fn direction(&self) -> SortDirection {
    if self.asc { SortDirection::Asc } else { SortDirection::Desc }
  }

  pub fn use_color(&self) -> bool {
    !self.no_color
  }
}

/// Handle the get command
pub(crate) fn handle_get_command(args: GetArgs, creds: &Credentials, config: &GitmineConfig) -> Result<()> {
  let (rt, client) = create_github_runtime_and_client(creds, &config.api_base_url)?;

  if args.unassigned && args.target != Target::Prs {
    print_info("Hang on, getting unassigned issues for you...");
  }

  let (mut issues, mut prs) = rt.block_on(fetch(&client, &args, config))?;

  for map in [&mut issues, &mut prs] {
    if let Some(repo) = args.repo.as_deref() {
      map.retain_repo(repo);
    }
    map.sort(args.direction());
  }

  let options = RenderOptions {
    color: args.use_color(),
    thresholds: AgeThresholds::from(config),
    now: Utc::now(),
  };

  let (text, rows) = match args.target {
    Target::Issues => (render(&issues, ElementKind::Issue, &options), issues.total_issues()),
    Target::Prs => (render(&prs, ElementKind::PullRequest, &options), prs.total_prs()),
    Target::All => {
      let text = format!(
        "{}{}\n{}",
        render(&issues, ElementKind::Issue, &options),
        SEPARATOR,
        render(&prs, ElementKind::PullRequest, &options)
      );
      (text, issues.total_issues() + prs.total_prs())
    }
  };

  info!("Rendering {} rows", rows);
  page_or_print(&text, rows, config.max_rows_before_pager)
}

/// Fetch the issue and pull request maps for the requested target. The map not
/// asked for is left empty.
async fn fetch(client: &GitHubClient, args: &GetArgs, config: &GitmineConfig) -> Result<(RepoMap, RepoMap)> {
  match args.target {
    Target::Issues => Ok((fetch_issues(client, args, config).await?, RepoMap::new())),
    Target::Prs => Ok((RepoMap::new(), fetch_prs(client).await?)),
    Target::All => tokio::try_join!(fetch_issues(client, args, config), fetch_prs(client)),
  }
}

async fn fetch_issues(client: &GitHubClient, args: &GetArgs, config: &GitmineConfig) -> Result<RepoMap> {
  let direction = args.direction();

  if !args.unassigned {
    let issues = client
      .list_assigned_issues(direction)
      .await
      .context("Failed to fetch assigned issues")?;
    debug!("Fetched {} assigned issues", issues.len());
    return Ok(RepoMap::from_assigned_issues(&issues));
  }

  let mut repos = client
    .list_collaborator_repos()
    .await
    .context("Failed to fetch repositories")?;
  // Skip requests for repositories the filter would drop anyway
  if let Some(repo) = args.repo.as_deref() {
    repos.retain(|r| r.full_name.eq_ignore_ascii_case(repo));
  }
  debug!("Fetching unassigned issues for {} repositories", repos.len());

  let results = fetch_unassigned_issues(client, &repos, direction, config.fetch_concurrency).await?;
  Ok(RepoMap::from_unassigned(&results))
}

async fn fetch_prs(client: &GitHubClient) -> Result<RepoMap> {
  let prs = client
    .list_review_requested_prs()
    .await
    .context("Failed to fetch review requests")?;
  debug!("Fetched {} pull requests awaiting review", prs.len());
  Ok(RepoMap::from_pull_requests(&prs))
}

#[cfg(test)]
mod tests {
  use clap::Parser;

  use super::*;

  #[derive(Parser)]
  struct TestCli {
    #[command(flatten)]
    args: GetArgs,
  }

  fn parse(args: &[&str]) -> Result<GetArgs, clap::Error> {
    let mut argv = vec!["get"];
    argv.extend_from_slice(args);
    TestCli::try_parse_from(argv).map(|cli| cli.args)
  }

  #[test]
  fn test_defaults() {
    let args = parse(&["issues"]).unwrap();
    assert_eq!(args.target, Target::Issues);
    assert_eq!(args.direction(), SortDirection::Desc);
    assert!(args.use_color());
    assert!(!args.unassigned);
    assert!(args.repo.is_none());
  }

  #[test]
  fn test_color_flags_override_each_other() {
    assert!(!parse(&["prs", "--no-color"]).unwrap().use_color());
    assert!(parse(&["prs", "--no-color", "--color"]).unwrap().use_color());
    assert!(!parse(&["prs", "--color", "--no-color"]).unwrap().use_color());
  }

  #[test]
  fn test_sort_flags() {
    assert_eq!(parse(&["all", "--asc"]).unwrap().direction(), SortDirection::Asc);
    assert_eq!(parse(&["all", "--desc"]).unwrap().direction(), SortDirection::Desc);
    assert!(parse(&["all", "--asc", "--desc"]).is_err());
  }

  #[test]
  fn test_repo_and_unassigned() {
    let args = parse(&["issues", "-u", "-r", "octo/widgets"]).unwrap();
    assert!(args.unassigned);
    assert_eq!(args.repo.as_deref(), Some("octo/widgets"));
  }

  #[test]
  fn test_unknown_target_is_rejected() {
    assert!(parse(&["milestones"]).is_err());
    assert!(parse(&[]).is_err());
  }
}
