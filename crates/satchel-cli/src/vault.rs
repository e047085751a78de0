use std::{path::PathBuf, time::Duration};

use color_eyre::{eyre::WrapErr, Result};
use satchel_vault::{ArtifactInput, EncryptRequest, KeyInput, Payload, Sealed};
use tracing::debug;

use crate::{cli::EncryptArgs, config::VaultConfig};

/// Encrypt per CLI flags, falling back to config defaults.
pub fn encrypt(args: EncryptArgs, config: &VaultConfig) -> Result<Sealed> {
    let payload = match (args.text, args.file) {
        (Some(text), _) => Payload::Text(text),
        (None, Some(file)) => Payload::File(file),
        (None, None) => color_eyre::eyre::bail!("pass --text or --file"),
    };

    // file payloads default to encrypting in place
    let artifact_path = match (&args.out, &payload) {
        (Some(out), _) => Some(out.clone()),
        (None, Payload::File(_)) => None,
        (None, _) => Some(config.artifact_path.clone()),
    };

    debug!(artifact = ?artifact_path, "encrypting");
    let mut request = EncryptRequest::new(payload)
        .key_path(args.key_out.unwrap_or_else(|| config.key_path.clone()))
        .policy(args.overwrite.unwrap_or(config.overwrite));
    if let Some(path) = artifact_path {
        request = request.artifact_path(path);
    }
    if let Some(key_file) = args.key_file {
        request = request.key(KeyInput::FromFile(key_file));
    }

    satchel_vault::encrypt(request).wrap_err("encrypt failed")
}

pub fn decrypt(artifact: PathBuf, key: PathBuf, max_age_secs: Option<u64>) -> Result<String> {
    let artifact = ArtifactInput::File(artifact);
    let key = KeyInput::FromFile(key);
    let plaintext = match max_age_secs {
        Some(secs) => satchel_vault::decrypt_with_ttl(artifact, key, Duration::from_secs(secs)),
        None => satchel_vault::decrypt(artifact, key),
    };
    plaintext.wrap_err("decrypt failed")
}

pub fn keygen(path: PathBuf) -> Result<PathBuf> {
    satchel_vault::generate_key(&path).wrap_err("key generation failed")?;
    Ok(path)
}
