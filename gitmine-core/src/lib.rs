//! # Gitmine Core Library
//!
//! Credential storage, settings and output helpers shared by the gitmine
//! command-line tool and its GitHub client.

pub mod config;
pub mod consts;
pub mod creds;
pub mod output;
pub mod utils;

pub use config::{ConfigDirs, GitmineConfig, get_config_dirs};
pub use creds::{CredentialPaths, Credentials, CredsError, Property};
pub use output::{ColorMode, print_error, print_info, print_success, print_warning};
