use std::{fmt, path::Path, path::PathBuf};

use aes_gcm::{aead::KeyInit, Aes256Gcm};
use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use rand::{rngs::OsRng, RngCore};
use thiserror::Error;
use tracing::{debug, instrument};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{error::VaultError, files};

const KEY_LEN: usize = 32;

/// 256-bit symmetric key, zeroed on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
struct KeyMaterial {
    bytes: [u8; KEY_LEN],
}

/// Opaque handle able to seal and open artifacts. Never exposes or logs key bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyHandle {
    material: KeyMaterial,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("decode error: {0}")]
    Decode(String),
    #[error("expected {expected} key bytes, got {actual}")]
    Length { expected: usize, actual: usize },
}

/// Where the key for an operation comes from. Resolved once at the top of each call.
#[derive(Clone)]
pub enum KeyInput {
    /// Generate a fresh key (or reuse the one at the key path if policy allows).
    Generate,
    /// Encoded key bytes, exactly as they appear in a key file.
    Inline(Vec<u8>),
    /// Load the key from an existing key file.
    FromFile(PathBuf),
    /// An already loaded key.
    Handle(KeyHandle),
}

impl KeyHandle {
    /// Parse the encoded form stored in key files. Trailing whitespace is ignored.
    pub fn from_encoded(encoded: &[u8]) -> Result<Self, KeyError> {
        let bytes = URL_SAFE
            .decode(encoded.trim_ascii())
            .map_err(|e| KeyError::Decode(e.to_string()))?;

        if bytes.len() != KEY_LEN {
            return Err(KeyError::Length {
                expected: KEY_LEN,
                actual: bytes.len(),
            });
        }

        let mut material = KeyMaterial {
            bytes: [0u8; KEY_LEN],
        };
        material.bytes.copy_from_slice(&bytes);
        Ok(Self { material })
    }

    fn random() -> Self {
        let mut material = KeyMaterial {
            bytes: [0u8; KEY_LEN],
        };
        OsRng.fill_bytes(&mut material.bytes);
        Self { material }
    }

    pub(crate) fn encoded(&self) -> String {
        URL_SAFE.encode(self.material.bytes)
    }

    pub(crate) fn cipher(&self) -> Result<Aes256Gcm, VaultError> {
        Aes256Gcm::new_from_slice(&self.material.bytes).map_err(|e| VaultError::Io {
            reason: format!("cipher init failed: {e}"),
        })
    }
}

impl fmt::Debug for KeyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyHandle").finish_non_exhaustive()
    }
}

impl fmt::Debug for KeyInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generate => f.write_str("Generate"),
            Self::Inline(_) => f.write_str("Inline(..)"),
            Self::FromFile(path) => f.debug_tuple("FromFile").field(path).finish(),
            Self::Handle(handle) => f.debug_tuple("Handle").field(handle).finish(),
        }
    }
}

impl From<KeyHandle> for KeyInput {
    fn from(handle: KeyHandle) -> Self {
        Self::Handle(handle)
    }
}

/// Generate a fresh key, persist it to `path` (overwriting whatever is there), and return it.
///
/// Callers are expected to have settled the collision policy for `path` already.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn generate_key(path: impl AsRef<Path>) -> Result<KeyHandle, VaultError> {
    let handle = KeyHandle::random();
    files::write_file(path.as_ref(), handle.encoded().as_bytes())?;
    debug!("wrote new key file");
    Ok(handle)
}

/// Load and parse a key file.
pub(crate) fn load_key_file(path: &Path) -> Result<KeyHandle, VaultError> {
    let encoded = files::read_file(path)?;
    Ok(KeyHandle::from_encoded(&encoded)?)
}

/// Resolve a key that must already exist (decrypt, explicit keys on encrypt).
pub(crate) fn resolve_existing(input: KeyInput) -> Result<KeyHandle, VaultError> {
    match input {
        KeyInput::Handle(handle) => Ok(handle),
        KeyInput::Inline(encoded) => Ok(KeyHandle::from_encoded(&encoded)?),
        KeyInput::FromFile(path) => load_key_file(&path),
        KeyInput::Generate => Err(VaultError::validation(
            "an existing key is required, not a generated one",
        )),
    }
}
