//! Artifact token: URL-safe base64 of `version || issued_at || nonce || ciphertext`.
//! The version and timestamp are authenticated as associated data.

use aes_gcm::{
    aead::{Aead, AeadCore, OsRng, Payload},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use chrono::Utc;

use crate::{error::VaultError, key::KeyHandle};

const VERSION: u8 = 0x01;
const HEADER_LEN: usize = 1 + 8;
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Plaintext recovered from a token, with the time it was sealed.
#[derive(Debug)]
pub(crate) struct Opened {
    pub issued_at: u64,
    pub plaintext: Vec<u8>,
}

pub(crate) fn seal(key: &KeyHandle, plaintext: &[u8]) -> Result<String, VaultError> {
    seal_at(key, plaintext, now_secs())
}

fn seal_at(key: &KeyHandle, plaintext: &[u8], issued_at: u64) -> Result<String, VaultError> {
    let cipher = key.cipher()?;
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let mut header = [0u8; HEADER_LEN];
    header[0] = VERSION;
    header[1..].copy_from_slice(&issued_at.to_be_bytes());

    let ciphertext = cipher
        .encrypt(
            &nonce,
            Payload {
                msg: plaintext,
                aad: &header,
            },
        )
        .map_err(|e| VaultError::Io {
            reason: format!("encrypt failed: {e}"),
        })?;

    let mut raw = Vec::with_capacity(HEADER_LEN + NONCE_LEN + ciphertext.len());
    raw.extend_from_slice(&header);
    raw.extend_from_slice(nonce.as_slice());
    raw.extend_from_slice(&ciphertext);
    Ok(URL_SAFE.encode(raw))
}

pub(crate) fn open(key: &KeyHandle, token: &str) -> Result<Opened, VaultError> {
    let raw = URL_SAFE
        .decode(token.trim())
        .map_err(|e| VaultError::authentication(format!("token decode failed: {e}")))?;

    if raw.len() < HEADER_LEN + NONCE_LEN + TAG_LEN {
        return Err(VaultError::authentication("token too short"));
    }
    if raw[0] != VERSION {
        return Err(VaultError::authentication(format!(
            "unsupported token version {:#04x}",
            raw[0]
        )));
    }

    let (header, rest) = raw.split_at(HEADER_LEN);
    let (nonce, ciphertext) = rest.split_at(NONCE_LEN);
    let mut stamp = [0u8; 8];
    stamp.copy_from_slice(&header[1..]);

    let plaintext = key
        .cipher()?
        .decrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: ciphertext,
                aad: header,
            },
        )
        .map_err(|_| VaultError::authentication("ciphertext does not match key"))?;

    Ok(Opened {
        issued_at: u64::from_be_bytes(stamp),
        plaintext,
    })
}

pub(crate) fn now_secs() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or(0)
}
