//! Datastore credentials.
//!
//! The datastore authenticates every call with a `userName`/`password`
//! pair. Credentials are supplied by a [`CredentialProvider`] so they can
//! come from the environment in production and from literals in tests.

use std::fmt;

/// Environment variable holding the datastore user name.
pub const USERNAME_VAR: &str = "FIELDTRIP_USERNAME";

/// Environment variable holding the datastore password.
pub const PASSWORD_VAR: &str = "FIELDTRIP_PASSWORD";

/// A user name and password for the datastore.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user_name: String,
    pub password: String,
}

impl Credentials {
    pub fn new(user_name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user_name", &self.user_name)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Error obtaining credentials.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// A required environment variable is unset or empty
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
}

/// Source of datastore credentials.
pub trait CredentialProvider: Send + Sync {
    fn credentials(&self) -> Result<Credentials, CredentialError>;
}

/// Reads credentials from `FIELDTRIP_USERNAME` and `FIELDTRIP_PASSWORD`
/// on every call, so rotated values are picked up without a restart.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl CredentialProvider for EnvCredentials {
    fn credentials(&self) -> Result<Credentials, CredentialError> {
        let read = |var: &'static str| {
            std::env::var(var)
                .ok()
                .filter(|v| !v.is_empty())
                .ok_or(CredentialError::Missing(var))
        };
        Ok(Credentials::new(read(USERNAME_VAR)?, read(PASSWORD_VAR)?))
    }
}

/// Fixed credentials.
#[derive(Debug, Clone)]
pub struct StaticCredentials(Credentials);

impl StaticCredentials {
    pub fn new(user_name: impl Into<String>, password: impl Into<String>) -> Self {
        Self(Credentials::new(user_name, password))
    }
}

impl CredentialProvider for StaticCredentials {
    fn credentials(&self) -> Result<Credentials, CredentialError> {
        Ok(self.0.clone())
    }
}
