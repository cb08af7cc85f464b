//! Core constants shared across gitmine components.

/// Name of the credentials file inside the home directory.
pub const CREDENTIALS_FILE_NAME: &str = ".gitmine_credentials";

/// Name of the key file inside the home directory.
pub const KEY_FILE_NAME: &str = ".gitmine.key";

/// Name of the settings file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Base URL for the official SaaS GitHub API
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Environment variable overriding the GitHub API base URL.
pub const ENV_API_URL: &str = "GITMINE_API_URL";

/// Environment variable naming the pager used for long reports.
pub const ENV_PAGER: &str = "PAGER";

/// Pager used when `$PAGER` is not set.
pub const DEFAULT_PAGER: &str = "less -R";
