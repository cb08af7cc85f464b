//! # Command Line Interface
//!
//! Defines the CLI structure and command handlers for the gitmine tool.

mod config;
mod get;
mod go;

use anyhow::Result;
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{ArgAction, Parser, Subcommand};
use gitmine_core::creds::{Credentials, CredsError};
use gitmine_core::{ColorMode, get_config_dirs};

/// Exit status for usage errors, matching clap's
pub const EXIT_USAGE: u8 = 2;

/// Exit status for every other failure
pub const EXIT_FAILURE: u8 = 1;

/// Top-level CLI command for the gitmine tool
#[derive(Parser)]
#[command(name = "gitmine")]
#[command(display_name = "⛏️ Gitmine")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(about = "Simple CLI for querying assigned Issues and PR reviews from GitHub")]
#[command(
  long_about = "Gitmine lists the GitHub issues assigned to you and the pull requests\n\
        waiting for your review, grouped by repository and colored by age.\n\n\
        Store your credentials first with 'gitmine config username <NAME>' and\n\
        'gitmine config token <TOKEN>'. Add --encrypt to keep them encrypted at rest."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
#[command(subcommand_required(true))]
#[command(disable_help_subcommand = true)]
#[command(max_term_width = 120)]
#[command(styles = Styles::styled()
    .header(AnsiColor::BrightGreen.on_default().bold().underline())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::BrightGreen.on_default().bold())
    .placeholder(AnsiColor::BrightWhite.on_default().italic())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::BrightRed.on_default().bold())
)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    global = true,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages\n\
             -vvv: Show trace level messages"
  )]
  pub verbose: u8,

  /// Controls when colored output is used
  #[arg(
    long,
    value_enum,
    ignore_case = true,
    global = true,
    default_value_t = ColorMode::Auto,
  )]
  pub colors: ColorMode,

  /// Subcommands
  #[command(subcommand)]
  pub command: Commands,
}

/// Subcommands for the gitmine tool
#[derive(Subcommand)]
pub enum Commands {
  /// Set or show the GitHub username and token
  #[command(long_about = "Set or show the GitHub credentials gitmine uses.\n\n\
            With a PROP and VALUE the property is stored; with only a PROP its current\n\
            value is printed. The token of an encrypted store is masked unless --reveal\n\
            is given. --encrypt and --no-encrypt switch encryption at rest on or off,\n\
            either on their own or together with a write.")]
  Config(config::ConfigArgs),

  /// Get assigned issues and/or pull requests awaiting your review
  #[command(long_about = "Fetch GitHub issues assigned to you and/or pull requests that request\n\
            your review, grouped by repository.\n\n\
            Rows are colored by age: green for recent items, yellow for items getting\n\
            stale and red for old ones. Long reports are shown through $PAGER.")]
  Get(get::GetArgs),

  /// Open a repository or issue in the browser
  #[command(long_about = "Open the GitHub page of a repository in your browser.\n\n\
            REPO is the full name of the repository (owner/name). With a NUMBER the\n\
            issue or pull request with that number is opened instead.")]
  Go(go::GoArgs),
}

pub fn handle_cli(cli: Cli) -> Result<()> {
  // Set global color override based on --colors argument
  cli.colors.apply();

  let config_dirs = get_config_dirs()?;
  let creds = Credentials::new(config_dirs.credential_paths());

  match cli.command {
    Commands::Config(config) => config::handle_config_command(config, &creds),
    Commands::Get(get) => {
      let settings = config_dirs.load_config()?;
      get::handle_get_command(get, &creds, &settings)
    }
    Commands::Go(go) => go::handle_go_command(go),
  }
}

/// Process exit status for a failed command
pub fn exit_code(err: &anyhow::Error) -> u8 {
  match err.downcast_ref::<CredsError>() {
    Some(creds_err) if creds_err.is_usage() => EXIT_USAGE,
    _ => EXIT_FAILURE,
  }
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory;

  use super::*;

  #[test]
  fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
  }

  #[test]
  fn test_exit_codes() {
    let usage = anyhow::Error::new(CredsError::InvalidProperty("banana".into()));
    assert_eq!(exit_code(&usage), EXIT_USAGE);

    let wrapped = anyhow::Error::new(CredsError::Usage("nope".into())).context("Failed to update credentials");
    assert_eq!(exit_code(&wrapped), EXIT_USAGE);

    let missing_key = anyhow::Error::new(CredsError::MissingKey);
    assert_eq!(exit_code(&missing_key), EXIT_FAILURE);

    assert_eq!(exit_code(&anyhow::anyhow!("network down")), EXIT_FAILURE);
  }

  #[test]
  fn test_verbose_is_global() {
    let cli = Cli::try_parse_from(["gitmine", "get", "issues", "-vv"]).unwrap();
    assert_eq!(cli.verbose, 2);
  }
}
