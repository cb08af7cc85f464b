//! # Issue and Pull Request Reports
//!
//! Groups fetched issues and pull requests by repository and renders them as
//! aligned, age-colored rows.

use std::fmt;

use chrono::{DateTime, Utc};
use gitmine_core::GitmineConfig;
use gitmine_core::output::format_repo_name;
use gitmine_gh::{GitHubIssue, SortDirection, repo_name_from_html_url};
use owo_colors::{OwoColorize, Stream};
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing::warn;

/// Line printed between the issues and pull requests of `gitmine get all`
pub const SEPARATOR: &str = "* * * * * * * * * * * * * * * * * * * * ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
  Issue,
  PullRequest,
}

impl ElementKind {
  /// Plural name used in messages
  pub fn plural(&self) -> &'static str {
    match self {
      ElementKind::Issue => "issues",
      ElementKind::PullRequest => "prs",
    }
  }
}

impl fmt::Display for ElementKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.plural())
  }
}

/// One issue or pull request row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
  pub number: u64,
  pub title: String,
  pub url: String,
  pub labels: Vec<String>,
  pub created_at: DateTime<Utc>,
}

impl Element {
  /// Whole days between creation and `now`
  pub fn age_days(&self, now: DateTime<Utc>) -> i64 {
    (now - self.created_at).num_days().max(0)
  }
}

impl From<&GitHubIssue> for Element {
  fn from(issue: &GitHubIssue) -> Self {
    Self {
      number: issue.number,
      title: issue.title.clone(),
      url: issue.html_url.clone(),
      labels: issue.label_names(),
      created_at: issue.created_at,
    }
  }
}

/// Issues and pull requests of one repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoGroup {
  pub name: String,
  pub issues: Vec<Element>,
  pub prs: Vec<Element>,
}

impl RepoGroup {
  pub fn new(name: &str) -> Self {
    Self {
      name: name.to_string(),
      issues: Vec::new(),
      prs: Vec::new(),
    }
  }

  pub fn elements(&self, kind: ElementKind) -> &[Element] {
    match kind {
      ElementKind::Issue => &self.issues,
      ElementKind::PullRequest => &self.prs,
    }
  }

  fn elements_mut(&mut self, kind: ElementKind) -> &mut Vec<Element> {
    match kind {
      ElementKind::Issue => &mut self.issues,
      ElementKind::PullRequest => &mut self.prs,
    }
  }
}

/// Repository groups in the order they were first seen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoMap {
  groups: Vec<RepoGroup>,
}

impl RepoMap {
  pub fn new() -> Self {
    Self::default()
  }

  /// Group issues from `/issues` by their repository
  pub fn from_assigned_issues(issues: &[GitHubIssue]) -> Self {
    let mut map = Self::new();
    for issue in issues {
      let repo = issue
        .repository
        .as_ref()
        .map(|repo| repo.full_name.clone())
        .or_else(|| repo_name_from_html_url(&issue.html_url));

      match repo {
        Some(repo) => map.push(&repo, ElementKind::Issue, issue.into()),
        None => warn!("Skipping issue #{} without a repository", issue.number),
      }
    }
    map
  }

  /// Group search results by the repository named in their URL
  pub fn from_pull_requests(prs: &[GitHubIssue]) -> Self {
    let mut map = Self::new();
    for pr in prs {
      match repo_name_from_html_url(&pr.html_url) {
        Some(repo) => map.push(&repo, ElementKind::PullRequest, pr.into()),
        None => warn!("Skipping pull request with unexpected URL {}", pr.html_url),
      }
    }
    map
  }

  /// Build from per-repository fetch results
  pub fn from_unassigned(results: &[(String, Vec<GitHubIssue>)]) -> Self {
    let mut map = Self::new();
    for (repo, issues) in results {
      for issue in issues {
        map.push(repo, ElementKind::Issue, issue.into());
      }
    }
    map
  }

  pub fn push(&mut self, repo: &str, kind: ElementKind, element: Element) {
    self.entry(repo).elements_mut(kind).push(element);
  }

  /// Group for `repo`, created at the end if missing
  pub fn entry(&mut self, repo: &str) -> &mut RepoGroup {
    let index = match self.groups.iter().position(|group| group.name == repo) {
      Some(index) => index,
      None => {
        self.groups.push(RepoGroup::new(repo));
        self.groups.len() - 1
      }
    };
    &mut self.groups[index]
  }

  pub fn groups(&self) -> &[RepoGroup] {
    &self.groups
  }

  /// Keep only the group for `repo`. GitHub names are case-insensitive.
  pub fn retain_repo(&mut self, repo: &str) {
    self.groups.retain(|group| group.name.eq_ignore_ascii_case(repo));
  }

  /// Order elements inside each group by creation time
  pub fn sort(&mut self, direction: SortDirection) {
    for group in &mut self.groups {
      for elements in [&mut group.issues, &mut group.prs] {
        elements.sort_by_key(|element| element.created_at);
        if direction == SortDirection::Desc {
          elements.reverse();
        }
      }
    }
  }

  pub fn total(&self, kind: ElementKind) -> usize {
    self.groups.iter().map(|group| group.elements(kind).len()).sum()
  }

  pub fn total_issues(&self) -> usize {
    self.total(ElementKind::Issue)
  }

  pub fn total_prs(&self) -> usize {
    self.total(ElementKind::PullRequest)
  }
}

/// Day thresholds for age coloring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeThresholds {
  pub ok_days: i64,
  pub warning_days: i64,
}

impl From<&GitmineConfig> for AgeThresholds {
  fn from(config: &GitmineConfig) -> Self {
    Self {
      ok_days: config.ok_delta_days,
      warning_days: config.warning_delta_days,
    }
  }
}

impl Default for AgeThresholds {
  fn default() -> Self {
    Self::from(&GitmineConfig::default())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeColor {
  Green,
  Yellow,
  Red,
}

pub fn age_color(days: i64, thresholds: AgeThresholds) -> AgeColor {
  if days < thresholds.ok_days {
    AgeColor::Green
  } else if days < thresholds.warning_days {
    AgeColor::Yellow
  } else {
    AgeColor::Red
  }
}

fn paint(text: &str, color: AgeColor) -> String {
  match color {
    AgeColor::Green => text.if_supports_color(Stream::Stdout, |t| t.green()).to_string(),
    AgeColor::Yellow => text.if_supports_color(Stream::Stdout, |t| t.yellow()).to_string(),
    AgeColor::Red => text.if_supports_color(Stream::Stdout, |t| t.red()).to_string(),
  }
}

/// How rows are rendered
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
  /// Color-code numbers and ages by how old the element is
  pub color: bool,
  pub thresholds: AgeThresholds,
  pub now: DateTime<Utc>,
}

fn render_row(element: &Element, options: &RenderOptions) -> [String; 4] {
  let number = format!("#{}", element.number);
  let days = element.age_days(options.now);
  let age = format!("{days} days ago");

  let labels = if element.labels.is_empty() {
    String::new()
  } else {
    let joined = format!("({})", element.labels.join(", "));
    joined.if_supports_color(Stream::Stdout, |t| t.dimmed()).to_string()
  };

  if options.color {
    let color = age_color(days, options.thresholds);
    [paint(&number, color), element.title.clone(), labels, paint(&age, color)]
  } else {
    [number, element.title.clone(), labels, age]
  }
}

/// Render every group holding elements of `kind`
pub fn render(map: &RepoMap, kind: ElementKind, options: &RenderOptions) -> String {
  if map.total(kind) == 0 {
    return format!("No {kind} found! Keep up the good work.\n");
  }

  let mut out = String::new();
  for group in map.groups() {
    let elements = group.elements(kind);
    if elements.is_empty() {
      continue;
    }

    let mut builder = Builder::default();
    for element in elements {
      builder.push_record(render_row(element, options));
    }
    let mut table = builder.build();
    table.with(Style::blank());

    out.push_str(&format_repo_name(&group.name));
    out.push('\n');
    out.push_str(&table.to_string());
    out.push_str("\n\n");
  }
  out
}
