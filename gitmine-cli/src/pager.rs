//! Sends long reports through the user's pager.

use std::io::{self, IsTerminal, Write};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use gitmine_core::consts::{DEFAULT_PAGER, ENV_PAGER};
use tracing::{debug, warn};

/// Print `text`, through the pager when it has more than `max_rows` rows and
/// stdout is a terminal.
pub fn page_or_print(text: &str, rows: usize, max_rows: usize) -> Result<()> {
  if rows > max_rows && io::stdout().is_terminal() {
    match run_pager(&pager_command(), text) {
      Ok(()) => return Ok(()),
      Err(e) => warn!("Pager failed, printing directly: {e:#}"),
    }
  }

  let mut stdout = io::stdout().lock();
  stdout.write_all(text.as_bytes()).context("Failed to write to stdout")?;
  stdout.flush().context("Failed to flush stdout")
}

/// Pager command line from `$PAGER`, or the default
pub fn pager_command() -> String {
  std::env::var(ENV_PAGER)
    .ok()
    .filter(|pager| !pager.trim().is_empty())
    .unwrap_or_else(|| DEFAULT_PAGER.to_string())
}

/// Pipe `text` into `pager`, waiting for it to exit
pub fn run_pager(pager: &str, text: &str) -> Result<()> {
  let mut parts = pager.split_whitespace();
  let program = parts.next().context("Pager command is empty")?;
  debug!("Paging output through {}", pager);

  let mut child = Command::new(program)
    .args(parts)
    .stdin(Stdio::piped())
    .spawn()
    .with_context(|| format!("Failed to start pager '{pager}'"))?;

  if let Some(mut stdin) = child.stdin.take() {
    // The user quitting early closes the pipe
    if let Err(e) = stdin.write_all(text.as_bytes())
      && e.kind() != io::ErrorKind::BrokenPipe
    {
      return Err(e).context("Failed to write to pager");
    }
  }

  child.wait().context("Failed to wait for pager")?;
  Ok(())
}
