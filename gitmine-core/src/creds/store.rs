//! Flat-file storage for the credential record and the key file.
//!
//! [`CredentialStore`] knows where both files live and how to read and write
//! them. It does not decide when to encrypt; that is the job of
//! [`crate::creds::Credentials`].

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::consts::{CREDENTIALS_FILE_NAME, KEY_FILE_NAME};
use crate::creds::cipher::{self, EncryptionKey};
use crate::creds::permissions::{FilePermissions, PlatformPermissions};
use crate::creds::{CredentialRecord, CredsError, Property};

/// Locations of the credentials file and the key file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialPaths {
  pub credentials: PathBuf,
  pub key: PathBuf,
}

impl CredentialPaths {
  /// Default locations inside the given home directory.
  ///
  /// # Examples
  ///
  /// ```
  /// use std::path::Path;
  /// use gitmine_core::creds::CredentialPaths;
  ///
  /// let paths = CredentialPaths::in_home(Path::new("/home/user"));
  /// assert_eq!(paths.credentials, Path::new("/home/user/.gitmine_credentials"));
  /// assert_eq!(paths.key, Path::new("/home/user/.gitmine.key"));
  /// ```
  pub fn in_home(home: &Path) -> Self {
    Self {
      credentials: home.join(CREDENTIALS_FILE_NAME),
      key: home.join(KEY_FILE_NAME),
    }
  }
}

/// Durable storage of the credential record.
///
/// There is no locking: two processes doing read-modify-write at the same
/// time race and the last writer wins. All mutation goes through
/// [`CredentialStore::update`] so that a lock only has to wrap one method.
#[derive(Debug, Clone)]
pub struct CredentialStore {
  paths: CredentialPaths,
}

impl CredentialStore {
  pub fn new(paths: CredentialPaths) -> Self {
    Self { paths }
  }

  pub fn paths(&self) -> &CredentialPaths {
    &self.paths
  }

  /// Load a plaintext store, creating an empty credentials file if there is
  /// none yet.
  ///
  /// # Errors
  ///
  /// * [`CredsError::MissingKey`] if the file is an encrypted envelope.
  /// * [`CredsError::MalformedRecord`] / [`CredsError::InvalidProperty`] if
  ///   the file cannot be parsed.
  pub fn load(&self) -> Result<CredentialRecord, CredsError> {
    let data = self.read_raw()?;
    Self::decode(&data, None)
  }

  /// Turn raw file contents into a record, opening the envelope with `key`
  /// when the contents are encrypted.
  pub fn decode(data: &[u8], key: Option<&EncryptionKey>) -> Result<CredentialRecord, CredsError> {
    if cipher::is_envelope(data) {
      let key = key.ok_or(CredsError::MissingKey)?;
      let plaintext = cipher::open(key, data)?;
      return CredentialRecord::parse(&plaintext);
    }

    let text = std::str::from_utf8(data).map_err(|_| CredsError::MalformedRecord { line: 1 })?;
    CredentialRecord::parse(text)
  }

  /// Value stored for `prop` in `record`.
  pub fn get(record: &CredentialRecord, prop: Property) -> Option<&str> {
    record.get(prop)
  }

  /// Return `record` with `prop` bound to `value`.
  pub fn set(record: CredentialRecord, prop: Property, value: &str) -> Result<CredentialRecord, CredsError> {
    record.with(prop, value)
  }

  /// Rewrite the whole credentials file as plaintext.
  pub fn persist(&self, record: &CredentialRecord) -> Result<(), CredsError> {
    self.write_raw(record.to_text().as_bytes())
  }

  /// Seal the record with `key` and rewrite the whole credentials file.
  pub fn persist_sealed(&self, record: &CredentialRecord, key: &EncryptionKey) -> Result<(), CredsError> {
    let envelope = cipher::seal(key, record.to_text().as_bytes())?;
    self.write_raw(&envelope)
  }

  /// Load, apply `mutate`, and persist the result.
  ///
  /// With a key the file is opened and written back sealed; without one it is
  /// treated as plaintext. Nothing is written when `mutate` fails.
  pub fn update<F>(&self, key: Option<&EncryptionKey>, mutate: F) -> Result<CredentialRecord, CredsError>
  where
    F: FnOnce(CredentialRecord) -> Result<CredentialRecord, CredsError>,
  {
    let current = Self::decode(&self.read_raw()?, key)?;
    let record = mutate(current)?;
    match key {
      Some(key) => self.persist_sealed(&record, key)?,
      None => self.persist(&record)?,
    }
    Ok(record)
  }

  /// Create an empty credentials file if it does not exist.
  pub fn touch(&self) -> Result<(), CredsError> {
    let path = &self.paths.credentials;
    if path.exists() {
      return Ok(());
    }

    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).map_err(|e| CredsError::io(parent, e))?;
    }
    fs::write(path, b"").map_err(|e| CredsError::io(path, e))?;
    PlatformPermissions::set_secure_permissions(path)?;

    debug!("Created empty credentials file at {}", path.display());
    Ok(())
  }

  /// Raw bytes of the credentials file, touching it into existence first.
  pub fn read_raw(&self) -> Result<Vec<u8>, CredsError> {
    self.touch()?;
    let path = &self.paths.credentials;
    let data = fs::read(path).map_err(|e| CredsError::io(path, e))?;
    trace!("Read {} bytes from {}", data.len(), path.display());
    Ok(data)
  }

  /// Truncate and rewrite the credentials file.
  pub fn write_raw(&self, data: &[u8]) -> Result<(), CredsError> {
    let path = &self.paths.credentials;
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).map_err(|e| CredsError::io(parent, e))?;
    }
    fs::write(path, data).map_err(|e| CredsError::io(path, e))?;
    PlatformPermissions::set_secure_permissions(path)?;
    trace!("Wrote {} bytes to {}", data.len(), path.display());
    Ok(())
  }

  /// Whether the credentials file currently holds an encrypted envelope.
  pub fn is_sealed(&self) -> Result<bool, CredsError> {
    let path = &self.paths.credentials;
    match fs::read(path) {
      Ok(data) => Ok(cipher::is_envelope(&data)),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
      Err(e) => Err(CredsError::io(path, e)),
    }
  }

  pub fn key_exists(&self) -> bool {
    self.paths.key.exists()
  }

  /// Read and decode the key file.
  pub fn read_key(&self) -> Result<EncryptionKey, CredsError> {
    let path = &self.paths.key;
    let encoded = zeroize::Zeroizing::new(fs::read(path).map_err(|e| match e.kind() {
      ErrorKind::NotFound => CredsError::MissingKey,
      _ => CredsError::io(path, e),
    })?);
    EncryptionKey::from_encoded(&encoded)
  }

  /// Write the key file, readable by the owner only.
  pub fn write_key(&self, key: &EncryptionKey) -> Result<(), CredsError> {
    let path = &self.paths.key;
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).map_err(|e| CredsError::io(parent, e))?;
    }
    fs::write(path, key.to_encoded().as_bytes()).map_err(|e| CredsError::io(path, e))?;
    PlatformPermissions::set_secure_permissions(path)?;
    debug!("Stored encryption key at {}", path.display());
    Ok(())
  }

  /// Delete the key file. A key that is already gone is not an error.
  pub fn remove_key(&self) -> Result<(), CredsError> {
    remove_if_exists(&self.paths.key)?;
    debug!("Removed encryption key at {}", self.paths.key.display());
    Ok(())
  }

  /// Delete both the credentials file and the key file.
  pub fn reset(&self) -> Result<(), CredsError> {
    remove_if_exists(&self.paths.credentials)?;
    remove_if_exists(&self.paths.key)?;
    debug!("Reset credential store at {}", self.paths.credentials.display());
    Ok(())
  }
}

fn remove_if_exists(path: &Path) -> Result<(), CredsError> {
  match fs::remove_file(path) {
    Ok(()) => Ok(()),
    Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
    Err(e) => Err(CredsError::io(path, e)),
  }
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;

  fn create_test_store() -> (TempDir, CredentialStore) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let store = CredentialStore::new(CredentialPaths::in_home(temp_dir.path()));
    (temp_dir, store)
  }

  #[test]
  fn test_load_creates_empty_file() {
    let (_temp_dir, store) = create_test_store();
    assert!(!store.paths().credentials.exists());

    let record = store.load().unwrap();
    assert!(record.is_empty());
    assert!(store.paths().credentials.exists());
    assert_eq!(fs::read_to_string(&store.paths().credentials).unwrap(), "");
  }

  #[test]
  fn test_persist_writes_flat_format() {
    let (_temp_dir, store) = create_test_store();
    let record = CredentialStore::set(CredentialRecord::default(), Property::Username, "abc").unwrap();
    store.persist(&record).unwrap();

    assert_eq!(
      fs::read_to_string(&store.paths().credentials).unwrap(),
      "username abc\n"
    );
  }

  #[test]
  fn test_update_preserves_other_properties() {
    let (_temp_dir, store) = create_test_store();
    store
      .update(None, |record| CredentialStore::set(record, Property::Username, "abc"))
      .unwrap();
    store
      .update(None, |record| CredentialStore::set(record, Property::Token, "xyz"))
      .unwrap();

    let record = store.load().unwrap();
    assert_eq!(CredentialStore::get(&record, Property::Username), Some("abc"));
    assert_eq!(CredentialStore::get(&record, Property::Token), Some("xyz"));
  }

  #[test]
  fn test_failed_update_leaves_file_untouched() {
    let (_temp_dir, store) = create_test_store();
    store.persist(&CredentialRecord::default().with(Property::Token, "xyz").unwrap()).unwrap();

    let err = store
      .update(None, |record| CredentialStore::set(record, Property::Token, "two words"))
      .unwrap_err();
    assert!(matches!(err, CredsError::InvalidValue { .. }));
    assert_eq!(fs::read_to_string(&store.paths().credentials).unwrap(), "token xyz\n");
  }

  #[test]
  fn test_load_rejects_malformed_file() {
    let (_temp_dir, store) = create_test_store();
    store.write_raw(b"username\n").unwrap();
    assert!(matches!(store.load(), Err(CredsError::MalformedRecord { line: 1 })));
  }

  #[test]
  fn test_load_sealed_without_key_is_missing_key() {
    let (_temp_dir, store) = create_test_store();
    let envelope = cipher::seal(&EncryptionKey::generate(), b"username abc\n").unwrap();
    store.write_raw(&envelope).unwrap();

    assert!(store.is_sealed().unwrap());
    assert!(matches!(store.load(), Err(CredsError::MissingKey)));
  }

  #[test]
  fn test_decode_with_key() {
    let key = EncryptionKey::generate();
    let envelope = cipher::seal(&key, b"token xyz\n").unwrap();

    let record = CredentialStore::decode(&envelope, Some(&key)).unwrap();
    assert_eq!(record.token.as_deref(), Some("xyz"));

    // A key is ignored for plaintext contents
    let record = CredentialStore::decode(b"username abc\n", Some(&key)).unwrap();
    assert_eq!(record.username.as_deref(), Some("abc"));
  }

  #[test]
  fn test_sealed_update_round_trip() {
    let (_temp_dir, store) = create_test_store();
    let key = EncryptionKey::generate();
    store
      .update(Some(&key), |record| CredentialStore::set(record, Property::Token, "xyz"))
      .unwrap();
    assert!(store.is_sealed().unwrap());

    store
      .update(Some(&key), |record| CredentialStore::set(record, Property::Username, "abc"))
      .unwrap();
    let record = CredentialStore::decode(&store.read_raw().unwrap(), Some(&key)).unwrap();
    assert_eq!(record.to_text(), "username abc\ntoken xyz\n");

    // A plaintext update cannot open the sealed file
    let err = store
      .update(None, |record| CredentialStore::set(record, Property::Token, "new"))
      .unwrap_err();
    assert!(matches!(err, CredsError::MissingKey));
  }

  #[test]
  fn test_key_file_lifecycle() {
    let (_temp_dir, store) = create_test_store();
    assert!(!store.key_exists());
    assert!(matches!(store.read_key(), Err(CredsError::MissingKey)));

    let key = EncryptionKey::generate();
    store.write_key(&key).unwrap();
    assert!(store.key_exists());
    assert_eq!(
      store.read_key().unwrap().to_encoded().as_str(),
      key.to_encoded().as_str()
    );

    store.remove_key().unwrap();
    assert!(!store.key_exists());
    // Removing twice is fine
    store.remove_key().unwrap();
  }

  #[test]
  fn test_read_key_with_bad_contents() {
    let (_temp_dir, store) = create_test_store();
    fs::write(&store.paths().key, "definitely-not-a-key").unwrap();
    assert!(matches!(store.read_key(), Err(CredsError::KeyFormat)));
  }

  #[test]
  fn test_reset_removes_both_files() {
    let (_temp_dir, store) = create_test_store();
    store.persist(&CredentialRecord::default().with(Property::Username, "abc").unwrap()).unwrap();
    store.write_key(&EncryptionKey::generate()).unwrap();

    store.reset().unwrap();
    assert!(!store.paths().credentials.exists());
    assert!(!store.key_exists());

    // Resetting an empty store is a no-op
    store.reset().unwrap();
  }

  #[test]
  #[cfg(unix)]
  fn test_files_are_owner_only() {
    let (_temp_dir, store) = create_test_store();
    store.persist(&CredentialRecord::default()).unwrap();
    store.write_key(&EncryptionKey::generate()).unwrap();

    assert!(PlatformPermissions::has_secure_permissions(&store.paths().credentials).unwrap());
    assert!(PlatformPermissions::has_secure_permissions(&store.paths().key).unwrap());
  }
}
