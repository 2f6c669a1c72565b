//! # Provider Configuration
//!
//! Connection settings for the remote store. Every field may be declared
//! explicitly or taken from the environment:
//!
//! | Field | Environment variable | Required |
//! |-------|----------------------|----------|
//! | `client_id` | `SALESFORCE_CLIENT_ID` | yes |
//! | `private_key` | `SALESFORCE_PRIVATE_KEY` | yes |
//! | `api_version` | `SALESFORCE_API_VERSION` | yes, `MAJOR.MINOR` with major ≥ 53 |
//! | `username` | `SALESFORCE_USERNAME` | yes |
//! | `login_url` | `SALESFORCE_LOGIN_URL` | no, defaults to [`DEFAULT_LOGIN_URL`] |
//!
//! An explicitly declared value always wins, even when it is empty.

use serde::Deserialize;
use std::fmt;

pub const DEFAULT_LOGIN_URL: &str = "https://login.salesforce.com";
pub const MIN_API_MAJOR_VERSION: u32 = 53;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid provider config: {0} must be set.")]
    Missing(&'static str),
    #[error(
        "Invalid provider config: api_version must be MAJOR.MINOR with a major version of at least {min}, got {0:?}",
        min = MIN_API_MAJOR_VERSION
    )]
    InvalidApiVersion(String),
}

/// Declared provider settings; unset fields fall back to the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub client_id: Option<String>,
    pub private_key: Option<String>,
    pub api_version: Option<String>,
    pub username: Option<String>,
    pub login_url: Option<String>,
}

/// Fully resolved connection settings.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub private_key: String,
    pub api_version: String,
    pub username: String,
    pub login_url: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("private_key", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("username", &self.username)
            .field("login_url", &self.login_url)
            .finish()
    }
}

impl ProviderConfig {
    /// Resolves against the process environment.
    pub fn resolve_from_env(self) -> Result<Credentials, ConfigError> {
        self.resolve(|name| std::env::var(name).ok())
    }

    /// Resolves with `env` standing in for the environment.
    pub fn resolve(self, env: impl Fn(&str) -> Option<String>) -> Result<Credentials, ConfigError> {
        let pick = |declared: Option<String>, var: &str| declared.or_else(|| env(var)).unwrap_or_default();

        let client_id = pick(self.client_id, "SALESFORCE_CLIENT_ID");
        let private_key = pick(self.private_key, "SALESFORCE_PRIVATE_KEY");
        let api_version = pick(self.api_version, "SALESFORCE_API_VERSION");
        let username = pick(self.username, "SALESFORCE_USERNAME");
        let login_url = pick(self.login_url, "SALESFORCE_LOGIN_URL");

        for (field, value) in [
            ("client_id", &client_id),
            ("private_key", &private_key),
            ("api_version", &api_version),
            ("username", &username),
        ] {
            if value.is_empty() {
                return Err(ConfigError::Missing(field));
            }
        }
        check_api_version(&api_version)?;

        Ok(Credentials {
            client_id,
            private_key,
            api_version,
            username,
            login_url: if login_url.is_empty() {
                DEFAULT_LOGIN_URL.to_string()
            } else {
                login_url
            },
        })
    }
}

fn check_api_version(version: &str) -> Result<(), ConfigError> {
    let invalid = || ConfigError::InvalidApiVersion(version.to_string());
    let (major, minor) = version.split_once('.').ok_or_else(invalid)?;
    let major: u32 = major.parse().map_err(|_| invalid())?;
    minor.parse::<u32>().map_err(|_| invalid())?;
    if major < MIN_API_MAJOR_VERSION {
        return Err(invalid());
    }
    Ok(())
}
