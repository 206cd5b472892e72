//! OAuth credentials handed to the worker script.
//!
//! The worker reads a JSON config of the shape
//! `{ "OAuth": { "account_id": ..., "client_id": ..., "client_secret": ... } }`.
//! `CredentialsFile` is that envelope; `Credentials` is the inner object.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Server-to-server OAuth credentials for the recording API.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub account_id: String,
    pub client_id: String,
    pub client_secret: String,
}

/// Rejected credential input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialsError {
    #[error("{0} cannot be empty")]
    MissingField(&'static str),
}

impl Credentials {
    /// Build credentials, trimming surrounding whitespace from the IDs.
    ///
    /// The secret is kept exactly as given.
    pub fn new(
        account_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into().trim().to_string(),
            client_id: client_id.into().trim().to_string(),
            client_secret: client_secret.into(),
        }
    }

    /// Reject blank fields before anything is written to disk.
    pub fn validate(&self) -> Result<(), CredentialsError> {
        let fields = [
            ("account_id", &self.account_id),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(CredentialsError::MissingField(name));
            }
        }
        Ok(())
    }
}

// The secret never reaches logs through `{:?}`.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account_id", &self.account_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// On-disk envelope read by the worker script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialsFile {
    #[serde(rename = "OAuth")]
    pub oauth: Credentials,
}

impl From<Credentials> for CredentialsFile {
    fn from(oauth: Credentials) -> Self {
        Self { oauth }
    }
}
