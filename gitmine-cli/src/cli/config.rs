//! # Config Command
//!
//! Reads and writes the GitHub username and token, and switches encryption
//! of the credentials file on or off.

use anyhow::{Context, Result};
use clap::Args;
use gitmine_core::creds::{Credentials, Property};
use gitmine_core::output::{format_command, format_property, print_info, print_success};
use tracing::info;

/// Command for credential configuration
#[derive(Args)]
pub struct ConfigArgs {
  /// Property to show or set (username or token)
  #[arg(value_name = "PROP")]
  pub prop: Option<String>,

  /// New value for the property
  #[arg(value_name = "VALUE", requires = "prop")]
  pub value: Option<String>,

  /// Encrypt the credentials file
  #[arg(long, conflicts_with = "no_encrypt")]
  pub encrypt: bool,

  /// Decrypt the credentials file and delete the key
  #[arg(long = "no-encrypt", visible_alias = "decrypt")]
  pub no_encrypt: bool,

  /// Print the token even when the store is encrypted
  #[arg(long, requires = "prop")]
  pub reveal: bool,

  /// Delete the credentials file and the key file
  #[arg(long, conflicts_with_all = ["prop", "encrypt", "no_encrypt", "reveal"])]
  pub reset: bool,
}

impl ConfigArgs {
  /// Requested encryption state, if any
  pub fn intent(&self) -> Option<bool> {
    match (self.encrypt, self.no_encrypt) {
      (true, _) => Some(true),
      (_, true) => Some(false),
      _ => None,
    }
  }
}

/// Handle the config command
pub(crate) fn handle_config_command(args: ConfigArgs, creds: &Credentials) -> Result<()> {
  if args.reset {
    creds.reset().context("Failed to reset credentials")?;
    print_success("Credentials reset. Set them again with 'gitmine config <PROP> <VALUE>'.");
    return Ok(());
  }

  let intent = args.intent();
  let Some(prop) = args.prop.as_deref() else {
    return apply_intent_or_show(creds, intent);
  };
  let prop = prop.parse::<Property>()?;

  match args.value.as_deref() {
    Some(value) => {
      creds.write_property(prop, value, intent)?;
      info!("Config {} written to {}", prop, creds.store().paths().credentials.display());
      println!("{}", read_for_display(creds, prop, args.reveal)?);
    }
    None => {
      creds.apply_intent(intent)?;
      println!("{}", read_for_display(creds, prop, args.reveal)?);
    }
  }

  Ok(())
}

fn read_for_display(creds: &Credentials, prop: Property, reveal: bool) -> Result<String> {
  let value = if reveal {
    creds.read_property(prop)?
  } else {
    creds.read_protected(prop)?
  };
  Ok(value)
}

fn apply_intent_or_show(creds: &Credentials, intent: Option<bool>) -> Result<()> {
  if let Some(encrypt) = intent {
    creds.apply_intent(intent)?;
    if encrypt {
      print_success("Credentials are encrypted.");
    } else {
      print_success("Credentials are decrypted and the key has been removed.");
    }
    return Ok(());
  }

  for prop in Property::ALL {
    let value = creds.read_protected(prop)?;
    let shown = if value.is_empty() { "(not set)" } else { value.as_str() };
    println!("{}: {}", format_property(prop.as_str()), shown);
  }

  let state = if creds.is_encrypted()? { "on" } else { "off" };
  println!("{}: {}", format_property("encryption"), state);

  if creds.read_property(Property::Token)?.is_empty() {
    print_info(&format!(
      "Set your GitHub token with {}",
      format_command("gitmine config token <TOKEN>")
    ));
  }

  Ok(())
}
