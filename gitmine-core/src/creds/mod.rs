//! # Credential Management
//!
//! Storage of the GitHub username and token in a flat file in the user's
//! home directory, optionally sealed with a symmetric key kept in a second
//! file. The key file's existence is the encryption on/off switch.
//!
//! Most callers only need [`Credentials`]:
//!
//! ```no_run
//! use gitmine_core::creds::{CredentialPaths, Credentials, Property};
//!
//! # fn main() -> Result<(), gitmine_core::creds::CredsError> {
//! let creds = Credentials::new(CredentialPaths::in_home(std::path::Path::new("/home/user")));
//! creds.write_property(Property::Token, "ghp_example", Some(true))?;
//! assert_eq!(creds.read_property(Property::Token)?, "ghp_example");
//! # Ok(())
//! # }
//! ```

pub mod cipher;
pub mod error;
pub mod lifecycle;
pub mod permissions;
pub mod record;
pub mod store;

pub use cipher::EncryptionKey;
pub use error::CredsError;
pub use lifecycle::{Credentials, UnlockedStore};
pub use record::{CredentialRecord, Property};
pub use store::{CredentialPaths, CredentialStore};
