//! Encrypted file store: seals a payload into an artifact file paired with a key file.
//! Uses AES-256-GCM with keys persisted next to the artifact (URL-safe base64).
//!
//! Every operation is synchronous and self-contained; nothing is cached between calls.

pub mod error;
mod files;
pub mod key;
pub mod naming;
pub mod policy;
pub mod store;
mod token;

pub use error::VaultError;
pub use key::{generate_key, KeyError, KeyHandle, KeyInput};
pub use naming::resolve_path_collision;
pub use policy::OverwritePolicy;
pub use store::{
    decrypt, decrypt_bytes, decrypt_with_ttl, encrypt, ArtifactInput, EncryptRequest, Payload,
    Sealed, DEFAULT_ARTIFACT_PATH, DEFAULT_KEY_PATH,
};
