use std::{fmt, path::PathBuf, time::Duration};

use tracing::{debug, instrument, warn};

use crate::{
    error::VaultError,
    files,
    key::{self, KeyHandle, KeyInput},
    naming::{occupied, resolve_path_collision},
    policy::OverwritePolicy,
    token,
};

pub const DEFAULT_ARTIFACT_PATH: &str = "FILE.txt";
pub const DEFAULT_KEY_PATH: &str = "KEY.key";

/// Data to seal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Bytes(Vec<u8>),
    /// Contents of an existing file. The artifact defaults to this same path.
    File(PathBuf),
}

impl Payload {
    /// Coerce any displayable value to its string form.
    pub fn display(value: &impl fmt::Display) -> Self {
        Self::Text(value.to_string())
    }

    fn into_bytes(self) -> Result<Vec<u8>, VaultError> {
        match self {
            Self::Text(text) => Ok(text.into_bytes()),
            Self::Bytes(bytes) => Ok(bytes),
            Self::File(path) => files::read_file(&path),
        }
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<&[u8]> for Payload {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

/// Ciphertext to open: inline token bytes or an artifact file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactInput {
    Inline(Vec<u8>),
    File(PathBuf),
}

/// Paths actually written by [`encrypt`]; either may be a renumbered variant of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    pub artifact_path: PathBuf,
    pub key_path: PathBuf,
}

/// Arguments for [`encrypt`]. Defaults: generated key, `FILE.txt`, `KEY.key`, overwrite both.
#[derive(Debug, Clone)]
pub struct EncryptRequest {
    payload: Payload,
    key: KeyInput,
    artifact_path: Option<PathBuf>,
    key_path: PathBuf,
    policy: OverwritePolicy,
}

impl EncryptRequest {
    pub fn new(payload: impl Into<Payload>) -> Self {
        Self {
            payload: payload.into(),
            key: KeyInput::Generate,
            artifact_path: None,
            key_path: PathBuf::from(DEFAULT_KEY_PATH),
            policy: OverwritePolicy::default(),
        }
    }

    pub fn key(mut self, key: impl Into<KeyInput>) -> Self {
        self.key = key.into();
        self
    }

    pub fn artifact_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.artifact_path = Some(path.into());
        self
    }

    pub fn key_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.key_path = path.into();
        self
    }

    pub fn policy(mut self, policy: impl Into<OverwritePolicy>) -> Self {
        self.policy = policy.into();
        self
    }
}

/// Seal a payload into an artifact file and make sure its key file exists.
///
/// Existing targets are deleted or renumbered according to the request's
/// [`OverwritePolicy`]. Deletion precedes the write, so the replacement is not atomic.
#[instrument(skip_all, fields(policy = %request.policy))]
pub fn encrypt(request: EncryptRequest) -> Result<Sealed, VaultError> {
    let EncryptRequest {
        payload,
        key,
        artifact_path,
        key_path,
        policy,
    } = request;

    let artifact_path = artifact_path.unwrap_or_else(|| match &payload {
        Payload::File(path) => path.clone(),
        _ => PathBuf::from(DEFAULT_ARTIFACT_PATH),
    });
    let paired_key = match &key {
        KeyInput::FromFile(path) => path,
        _ => &key_path,
    };
    if *paired_key == artifact_path {
        return Err(VaultError::validation(
            "artifact and key file must be different paths",
        ));
    }
    let plaintext = payload.into_bytes()?;

    let (handle, key_path) = resolve_key(key, key_path, policy)?;
    let sealed = token::seal(&handle, &plaintext)?;

    let artifact_path = claim_target(artifact_path, policy.overwrites_artifact())?;
    files::write_file(&artifact_path, sealed.as_bytes())?;
    debug!(artifact = %artifact_path.display(), key = %key_path.display(), "sealed payload");

    Ok(Sealed {
        artifact_path,
        key_path,
    })
}

/// Open an artifact and return its plaintext as UTF-8 text.
#[instrument(skip_all)]
pub fn decrypt(artifact: ArtifactInput, key: KeyInput) -> Result<String, VaultError> {
    into_text(open_artifact(artifact, key)?.plaintext)
}

/// Open an artifact and return the raw plaintext bytes.
#[instrument(skip_all)]
pub fn decrypt_bytes(artifact: ArtifactInput, key: KeyInput) -> Result<Vec<u8>, VaultError> {
    Ok(open_artifact(artifact, key)?.plaintext)
}

/// Like [`decrypt`], but rejects artifacts sealed more than `max_age` ago.
#[instrument(skip_all, fields(max_age_secs = max_age.as_secs()))]
pub fn decrypt_with_ttl(
    artifact: ArtifactInput,
    key: KeyInput,
    max_age: Duration,
) -> Result<String, VaultError> {
    let opened = open_artifact(artifact, key)?;
    let age_secs = token::now_secs().saturating_sub(opened.issued_at);
    if age_secs > max_age.as_secs() {
        return Err(VaultError::Expired { age_secs });
    }
    into_text(opened.plaintext)
}

fn open_artifact(artifact: ArtifactInput, key: KeyInput) -> Result<token::Opened, VaultError> {
    let data = match artifact {
        ArtifactInput::Inline(bytes) => bytes,
        ArtifactInput::File(path) => files::read_file(&path)?,
    };
    let text = std::str::from_utf8(&data)
        .map_err(|_| VaultError::validation("artifact data is not token text"))?;

    let handle = key::resolve_existing(key)?;
    token::open(&handle, text)
}

fn into_text(plaintext: Vec<u8>) -> Result<String, VaultError> {
    String::from_utf8(plaintext)
        .map_err(|_| VaultError::validation("decrypted payload is not UTF-8 text"))
}

/// Settle which key seals the payload and which key file pairs with the artifact.
fn resolve_key(
    input: KeyInput,
    key_path: PathBuf,
    policy: OverwritePolicy,
) -> Result<(KeyHandle, PathBuf), VaultError> {
    match input {
        KeyInput::FromFile(path) => {
            if !path.is_file() {
                return Err(files::not_found(&path));
            }
            let handle = key::load_key_file(&path)?;
            Ok((handle, path))
        }
        explicit @ (KeyInput::Handle(_) | KeyInput::Inline(_)) => {
            let handle = key::resolve_existing(explicit)?;
            let key_path = persist_explicit_key(&handle, key_path, policy)?;
            Ok((handle, key_path))
        }
        KeyInput::Generate => {
            if key_path.is_file() && policy.overwrites_key() {
                match key::load_key_file(&key_path) {
                    Ok(handle) => {
                        debug!(path = %key_path.display(), "reusing existing key file");
                        return Ok((handle, key_path));
                    }
                    Err(err) => {
                        warn!(path = %key_path.display(), "unusable key file, replacing it: {err}");
                        let handle = key::generate_key(&key_path)?;
                        return Ok((handle, key_path));
                    }
                }
            }

            let key_path = claim_target(key_path, policy.overwrites_key())?;
            let handle = key::generate_key(&key_path)?;
            Ok((handle, key_path))
        }
    }
}

/// Write a caller-supplied key to its key file, unless that file already holds it.
fn persist_explicit_key(
    handle: &KeyHandle,
    key_path: PathBuf,
    policy: OverwritePolicy,
) -> Result<PathBuf, VaultError> {
    if key_path.is_file() && matches!(key::load_key_file(&key_path), Ok(existing) if existing == *handle)
    {
        return Ok(key_path);
    }

    let key_path = claim_target(key_path, policy.overwrites_key())?;
    files::write_file(&key_path, handle.encoded().as_bytes())?;
    Ok(key_path)
}

/// Free up `path` for writing: delete it when overwriting is allowed, otherwise renumber.
/// Anything other than a regular file (a directory, say) is always renumbered around.
fn claim_target(path: PathBuf, overwrite: bool) -> Result<PathBuf, VaultError> {
    if !occupied(&path) {
        return Ok(path);
    }

    if overwrite && path.is_file() {
        debug!(path = %path.display(), "removing existing file");
        files::remove_target(&path)?;
        Ok(path)
    } else {
        let renamed = resolve_path_collision(&path);
        debug!(from = %path.display(), to = %renamed.display(), "renumbering to avoid overwrite");
        Ok(renamed)
    }
}
