//! Platform-specific file permission handling for the credential files.

use std::path::Path;

use crate::creds::CredsError;

/// Platform-specific permission operations on credential files.
pub trait FilePermissions {
  /// Restrict a credential file to its owner.
  fn set_secure_permissions(path: &Path) -> Result<(), CredsError>;

  /// Check whether a credential file is restricted to its owner.
  fn has_secure_permissions(path: &Path) -> Result<bool, CredsError>;
}

/// Unix implementation using chmod-style permission bits.
#[cfg(unix)]
pub struct UnixFilePermissions;

#[cfg(unix)]
impl FilePermissions for UnixFilePermissions {
  fn set_secure_permissions(path: &Path) -> Result<(), CredsError> {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path).map_err(|e| CredsError::io(path, e))?.permissions();
    perms.set_mode(0o600); // Owner read/write only
    fs::set_permissions(path, perms).map_err(|e| CredsError::io(path, e))
  }

  fn has_secure_permissions(path: &Path) -> Result<bool, CredsError> {
    use std::os::unix::fs::PermissionsExt;

    let mode = std::fs::metadata(path)
      .map_err(|e| CredsError::io(path, e))?
      .permissions()
      .mode();

    // No group/other bits
    Ok(mode & 0o077 == 0)
  }
}

/// Fallback for platforms without Unix permission bits.
#[cfg(not(unix))]
pub struct DefaultFilePermissions;

#[cfg(not(unix))]
impl FilePermissions for DefaultFilePermissions {
  fn set_secure_permissions(_path: &Path) -> Result<(), CredsError> {
    Ok(())
  }

  fn has_secure_permissions(path: &Path) -> Result<bool, CredsError> {
    Ok(path.exists())
  }
}

#[cfg(unix)]
pub type PlatformPermissions = UnixFilePermissions;

#[cfg(not(unix))]
pub type PlatformPermissions = DefaultFilePermissions;
