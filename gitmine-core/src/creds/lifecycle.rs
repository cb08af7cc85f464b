//! Encryption lifecycle of the credential store.
//!
//! The credentials file is an envelope exactly when the key file exists.
//! Every read and write goes through [`Credentials`], which opens the store
//! into an [`UnlockedStore`] and seals it again when the guard is dropped.

use tracing::{debug, info, instrument, warn};

use crate::creds::cipher::EncryptionKey;
use crate::creds::record::validate_value;
use crate::creds::{CredentialPaths, CredentialRecord, CredentialStore, CredsError, Property};

/// Entry point for reading and writing credentials.
///
/// `intent` arguments are tri-state: `Some(true)` makes sure the store ends up
/// encrypted, `Some(false)` makes sure it ends up in plaintext and `None`
/// leaves the current mode alone.
#[derive(Debug, Clone)]
pub struct Credentials {
  store: CredentialStore,
}

impl Credentials {
  pub fn new(paths: CredentialPaths) -> Self {
    Self {
      store: CredentialStore::new(paths),
    }
  }

  pub fn store(&self) -> &CredentialStore {
    &self.store
  }

  /// Whether the store is currently encrypted.
  pub fn is_encrypted(&self) -> Result<bool, CredsError> {
    self.check_key_present()?;
    Ok(self.store.key_exists())
  }

  /// Open the store for reading and writing.
  ///
  /// # Errors
  ///
  /// * [`CredsError::MissingKey`] if the file is sealed and the key is gone.
  /// * [`CredsError::InvalidKey`] if the key does not open the file. The file
  ///   is left untouched.
  pub fn unlock(&self) -> Result<UnlockedStore<'_>, CredsError> {
    self.check_key_present()?;

    let key = if self.store.key_exists() {
      Some(self.store.read_key()?)
    } else {
      None
    };
    let record = CredentialStore::decode(&self.store.read_raw()?, key.as_ref())?;

    Ok(UnlockedStore {
      store: &self.store,
      key,
      record,
    })
  }

  /// Value of `prop`, or an empty string when unset.
  #[instrument(skip(self), level = "debug")]
  pub fn read_property(&self, prop: Property) -> Result<String, CredsError> {
    let unlocked = self.unlock()?;
    Ok(unlocked.get(prop).unwrap_or_default().to_string())
  }

  /// Like [`Credentials::read_property`], but the token of an encrypted
  /// store comes back masked.
  pub fn read_protected(&self, prop: Property) -> Result<String, CredsError> {
    let value = self.read_property(prop)?;
    if prop == Property::Token && self.store.key_exists() {
      return Ok(mask(&value));
    }
    Ok(value)
  }

  /// Set `prop` to `value`, applying `intent` first.
  #[instrument(skip(self, value), level = "debug")]
  pub fn write_property(&self, prop: Property, value: &str, intent: Option<bool>) -> Result<(), CredsError> {
    validate_value(prop, value)?;
    self.check_key_present()?;

    let set = |record: CredentialRecord| record.with(prop, value);
    match (self.store.key_exists(), intent) {
      (false, Some(false)) => Err(already_decrypted()),
      (false, None) => self.store.update(None, set).map(drop),
      (false, Some(true)) => self.encrypt_with_new_key(set),
      (true, None | Some(true)) => self.unlock()?.update(set),
      (true, Some(false)) => {
        self.unlock()?.decrypt()?;
        self.store.update(None, set).map(drop)
      }
    }
  }

  /// Apply an encryption intent without changing any value.
  #[instrument(skip(self), level = "debug")]
  pub fn apply_intent(&self, intent: Option<bool>) -> Result<(), CredsError> {
    self.check_key_present()?;

    match (self.store.key_exists(), intent) {
      (_, None) => Ok(()),
      (false, Some(false)) => Err(already_decrypted()),
      (false, Some(true)) => self.encrypt_with_new_key(Ok),
      // Opening and dropping the guard seals a file left in plaintext
      (true, Some(true)) => self.unlock().map(drop),
      (true, Some(false)) => self.unlock()?.decrypt().map(drop),
    }
  }

  /// Delete both the credentials file and the key file.
  pub fn reset(&self) -> Result<(), CredsError> {
    self.store.reset()?;
    info!("Credentials have been reset");
    Ok(())
  }

  fn check_key_present(&self) -> Result<(), CredsError> {
    if !self.store.key_exists() && self.store.is_sealed()? {
      return Err(CredsError::MissingKey);
    }
    Ok(())
  }

  fn encrypt_with_new_key<F>(&self, mutate: F) -> Result<(), CredsError>
  where
    F: FnOnce(CredentialRecord) -> Result<CredentialRecord, CredsError>,
  {
    let key = EncryptionKey::generate();
    self.store.write_key(&key)?;

    if let Err(e) = self.store.update(Some(&key), mutate) {
      // The file was not sealed, so the key must not stay behind
      if let Err(cleanup) = self.store.remove_key() {
        warn!("Failed to remove unused encryption key: {cleanup}");
      }
      return Err(e);
    }

    info!("Credentials file is now encrypted");
    Ok(())
  }
}

/// Decrypted view of the store.
///
/// When the store is encrypted, dropping the guard makes sure the file on
/// disk is an envelope again, whatever path the caller left through.
#[derive(Debug)]
pub struct UnlockedStore<'a> {
  store: &'a CredentialStore,
  key: Option<EncryptionKey>,
  record: CredentialRecord,
}

impl UnlockedStore<'_> {
  pub fn record(&self) -> &CredentialRecord {
    &self.record
  }

  pub fn get(&self, prop: Property) -> Option<&str> {
    CredentialStore::get(&self.record, prop)
  }

  pub fn is_encrypted(&self) -> bool {
    self.key.is_some()
  }

  /// Read-modify-write through the store, keeping the current mode.
  pub fn update<F>(&mut self, mutate: F) -> Result<(), CredsError>
  where
    F: FnOnce(CredentialRecord) -> Result<CredentialRecord, CredsError>,
  {
    self.record = self.store.update(self.key.as_ref(), mutate)?;
    Ok(())
  }

  /// Write the record back as plaintext and delete the key file.
  pub fn decrypt(mut self) -> Result<CredentialRecord, CredsError> {
    let key = self.key.take();

    if let Err(e) = self.store.persist(&self.record) {
      // Let the guard seal the file again
      self.key = key;
      return Err(e);
    }
    self.store.remove_key()?;

    info!("Credentials file is now decrypted");
    Ok(std::mem::take(&mut self.record))
  }
}

impl Drop for UnlockedStore<'_> {
  fn drop(&mut self) {
    let Some(key) = self.key.as_ref() else {
      return;
    };

    match self.store.is_sealed() {
      Ok(true) => {}
      Ok(false) => match self.store.persist_sealed(&self.record, key) {
        Ok(()) => debug!("Sealed plaintext credentials file"),
        Err(e) => warn!("Failed to seal credentials file: {e}"),
      },
      Err(e) => warn!("Failed to inspect credentials file: {e}"),
    }
  }
}

fn mask(value: &str) -> String {
  "*".repeat(value.chars().count())
}

fn already_decrypted() -> CredsError {
  CredsError::Usage("Cannot decrypt: credentials are not encrypted (no key file found)".to_string())
}
