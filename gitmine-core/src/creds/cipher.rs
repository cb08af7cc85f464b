//! Symmetric encryption of the credentials file.
//!
//! The whole file is sealed as a single AES-256-GCM envelope:
//!
//! ```text
//! gitmine-enc:v1:<base64url(nonce ‖ ciphertext ‖ tag)>\n
//! ```
//!
//! The prefix marks the file as encrypted so a missing key can be detected
//! without guessing from the file's shape. Every seal draws a fresh 96-bit
//! nonce, so sealing the same record twice never yields the same bytes.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use tracing::trace;
use zeroize::Zeroizing;

use crate::creds::CredsError;

/// Prefix identifying an encrypted credentials file.
pub const ENVELOPE_MARKER: &[u8] = b"gitmine-enc:v1:";

/// Key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// AES-GCM nonce length in bytes.
const NONCE_LEN: usize = 12;

/// A symmetric key for the credentials envelope.
///
/// Stored on disk as URL-safe base64 text. The raw bytes are wiped when the
/// key is dropped.
pub struct EncryptionKey {
  bytes: Zeroizing<[u8; KEY_LEN]>,
}

impl EncryptionKey {
  /// Generate a new key from the operating system's CSPRNG.
  pub fn generate() -> Self {
    let key = Aes256Gcm::generate_key(&mut OsRng);
    let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
    bytes.copy_from_slice(key.as_slice());
    Self { bytes }
  }

  /// Decode a key from the contents of a key file.
  ///
  /// Surrounding ASCII whitespace is ignored so a trailing newline added by
  /// an editor does not invalidate the key.
  ///
  /// # Errors
  ///
  /// Returns [`CredsError::KeyFormat`] if the text is not base64url or does
  /// not decode to exactly [`KEY_LEN`] bytes.
  pub fn from_encoded(encoded: &[u8]) -> Result<Self, CredsError> {
    let decoded = Zeroizing::new(
      URL_SAFE
        .decode(encoded.trim_ascii())
        .map_err(|_| CredsError::KeyFormat)?,
    );
    if decoded.len() != KEY_LEN {
      return Err(CredsError::KeyFormat);
    }

    let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
    bytes.copy_from_slice(&decoded);
    Ok(Self { bytes })
  }

  /// Encode the key for writing to the key file.
  pub fn to_encoded(&self) -> Zeroizing<String> {
    Zeroizing::new(URL_SAFE.encode(self.bytes.as_slice()))
  }

  fn cipher(&self) -> Result<Aes256Gcm, CredsError> {
    Aes256Gcm::new_from_slice(self.bytes.as_slice()).map_err(|_| CredsError::KeyFormat)
  }
}

impl std::fmt::Debug for EncryptionKey {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("EncryptionKey").field("bytes", &"[REDACTED]").finish()
  }
}

/// Whether `data` is an encrypted envelope.
pub fn is_envelope(data: &[u8]) -> bool {
  data.starts_with(ENVELOPE_MARKER)
}

/// Encrypt `plaintext` into a complete envelope, ready to be written as the
/// credentials file.
pub fn seal(key: &EncryptionKey, plaintext: &[u8]) -> Result<Vec<u8>, CredsError> {
  let cipher = key.cipher()?;
  let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
  let ciphertext = cipher.encrypt(&nonce, plaintext).map_err(|_| CredsError::InvalidKey)?;

  let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
  blob.extend_from_slice(&nonce);
  blob.extend_from_slice(&ciphertext);

  let mut envelope = ENVELOPE_MARKER.to_vec();
  envelope.extend_from_slice(URL_SAFE.encode(&blob).as_bytes());
  envelope.push(b'\n');

  trace!("Sealed {} plaintext bytes into {} envelope bytes", plaintext.len(), envelope.len());
  Ok(envelope)
}

/// Decrypt an envelope produced by [`seal`].
///
/// # Errors
///
/// Returns [`CredsError::InvalidKey`] if the data is not an envelope, is
/// truncated or tampered with, or was sealed under a different key.
pub fn open(key: &EncryptionKey, envelope: &[u8]) -> Result<Zeroizing<String>, CredsError> {
  let body = envelope.strip_prefix(ENVELOPE_MARKER).ok_or(CredsError::InvalidKey)?;
  let blob = URL_SAFE
    .decode(body.trim_ascii())
    .map_err(|_| CredsError::InvalidKey)?;
  if blob.len() <= NONCE_LEN {
    return Err(CredsError::InvalidKey);
  }

  let (nonce, ciphertext) = blob.split_at(NONCE_LEN);
  let plaintext = Zeroizing::new(
    key
      .cipher()?
      .decrypt(Nonce::from_slice(nonce), ciphertext)
      .map_err(|_| CredsError::InvalidKey)?,
  );

  let text = std::str::from_utf8(&plaintext).map_err(|_| CredsError::InvalidKey)?;
  Ok(Zeroizing::new(text.to_string()))
}
