use thiserror::Error;

use crate::key::KeyError;

/// Errors produced by the encrypted file store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VaultError {
    /// Input had the wrong shape (non-text artifact, bad policy value, unusable key input).
    #[error("validation failed: {reason}")]
    Validation { reason: String },
    /// Ciphertext was altered, malformed, or sealed under a different key.
    #[error("authentication failed: {reason}")]
    Authentication { reason: String },
    /// A path that had to exist does not.
    #[error("file not found: {path}")]
    NotFound { path: String },
    /// Key bytes could not be parsed.
    #[error("invalid key: {0}")]
    InvalidKey(#[from] KeyError),
    /// Token is older than the permitted age.
    #[error("token expired: issued {age_secs}s ago")]
    Expired { age_secs: u64 },
    /// Underlying file-system failure.
    #[error("storage failure: {reason}")]
    Io { reason: String },
}

impl VaultError {
    pub(crate) fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    pub(crate) fn authentication(reason: impl Into<String>) -> Self {
        Self::Authentication {
            reason: reason.into(),
        }
    }
}
