//! The decrypted credential record and its flat-file text format.
//!
//! One property per line, `"<property> <value>\n"`. Only `username` and
//! `token` are recognised.

use std::fmt;
use std::str::FromStr;

use crate::creds::CredsError;

/// A property that can be stored in the credentials file.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
  /// GitHub login used for review-requested searches
  Username,
  /// Personal access token sent as a bearer token
  Token,
}

impl Property {
  pub const ALL: [Property; 2] = [Property::Username, Property::Token];

  /// Name of the property as written to disk and accepted on the command line.
  pub const fn as_str(&self) -> &'static str {
    match self {
      Property::Username => "username",
      Property::Token => "token",
    }
  }
}

impl fmt::Display for Property {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Property {
  type Err = CredsError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "username" => Ok(Property::Username),
      "token" => Ok(Property::Token),
      other => Err(CredsError::InvalidProperty(other.to_string())),
    }
  }
}

/// In-memory view of the credentials file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialRecord {
  pub username: Option<String>,
  pub token: Option<String>,
}

impl CredentialRecord {
  /// Parse the plaintext file format.
  ///
  /// Blank lines are skipped and a repeated property overrides the earlier
  /// line.
  ///
  /// # Errors
  ///
  /// * [`CredsError::MalformedRecord`] if a line is not exactly two
  ///   whitespace-separated tokens.
  /// * [`CredsError::InvalidProperty`] for an unknown property name.
  pub fn parse(text: &str) -> Result<Self, CredsError> {
    let mut record = Self::default();

    for (index, line) in text.lines().enumerate() {
      let parts: Vec<&str> = line.split_whitespace().collect();
      match parts.as_slice() {
        [] => continue,
        [prop, value] => {
          let prop = prop.parse::<Property>()?;
          *record.slot_mut(prop) = Some((*value).to_string());
        }
        _ => return Err(CredsError::MalformedRecord { line: index + 1 }),
      }
    }

    Ok(record)
  }

  /// Serialize to the plaintext file format. Unset properties are omitted.
  pub fn to_text(&self) -> String {
    let mut out = String::new();
    for prop in Property::ALL {
      if let Some(value) = self.get(prop) {
        out.push_str(prop.as_str());
        out.push(' ');
        out.push_str(value);
        out.push('\n');
      }
    }
    out
  }

  /// Value stored for `prop`, if any.
  pub fn get(&self, prop: Property) -> Option<&str> {
    match prop {
      Property::Username => self.username.as_deref(),
      Property::Token => self.token.as_deref(),
    }
  }

  /// Return a copy of the record with `prop` bound to `value`.
  ///
  /// # Errors
  ///
  /// Returns [`CredsError::InvalidValue`] when the value is empty or contains
  /// whitespace, since it could not be read back from the line format.
  pub fn with(mut self, prop: Property, value: &str) -> Result<Self, CredsError> {
    validate_value(prop, value)?;
    *self.slot_mut(prop) = Some(value.to_string());
    Ok(self)
  }

  pub fn is_empty(&self) -> bool {
    self.username.is_none() && self.token.is_none()
  }

  fn slot_mut(&mut self, prop: Property) -> &mut Option<String> {
    match prop {
      Property::Username => &mut self.username,
      Property::Token => &mut self.token,
    }
  }
}

/// Check that `value` survives a write/parse round trip.
pub fn validate_value(prop: Property, value: &str) -> Result<(), CredsError> {
  if value.is_empty() || value.chars().any(char::is_whitespace) {
    return Err(CredsError::InvalidValue { property: prop });
  }
  Ok(())
}
