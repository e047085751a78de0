use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::VaultError;

/// What `encrypt` does when the artifact or key path already exists.
///
/// A target that may not be overwritten is renumbered with
/// [`resolve_path_collision`](crate::naming::resolve_path_collision) instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverwritePolicy {
    /// Replace both files. An existing valid key file is reused.
    #[default]
    #[serde(alias = "all", alias = "true")]
    Both,
    /// Renumber both files; never reuse an existing key file.
    #[serde(alias = "none", alias = "false")]
    Neither,
    /// Key file may be reused or replaced; the artifact is renumbered.
    #[serde(alias = "key")]
    KeyOnly,
    /// Artifact is replaced; a fresh key goes to a renumbered key path.
    #[serde(alias = "obj", alias = "artifact")]
    ArtifactOnly,
}

impl OverwritePolicy {
    /// Whether an existing key file may be deleted, and therefore reused.
    pub fn overwrites_key(self) -> bool {
        matches!(self, Self::Both | Self::KeyOnly)
    }

    pub fn overwrites_artifact(self) -> bool {
        matches!(self, Self::Both | Self::ArtifactOnly)
    }

    pub fn from_flag(overwrite: bool) -> Self {
        if overwrite {
            Self::Both
        } else {
            Self::Neither
        }
    }
}

impl From<bool> for OverwritePolicy {
    fn from(overwrite: bool) -> Self {
        Self::from_flag(overwrite)
    }
}

impl FromStr for OverwritePolicy {
    type Err = VaultError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "both" | "all" | "true" => Ok(Self::Both),
            "neither" | "none" | "false" => Ok(Self::Neither),
            "key-only" | "key" => Ok(Self::KeyOnly),
            "artifact-only" | "artifact" | "obj" => Ok(Self::ArtifactOnly),
            other => Err(VaultError::validation(format!(
                "unknown overwrite policy '{other}' (expected all, none, key, or obj)"
            ))),
        }
    }
}

impl fmt::Display for OverwritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Both => "both",
            Self::Neither => "neither",
            Self::KeyOnly => "key-only",
            Self::ArtifactOnly => "artifact-only",
        };
        f.write_str(name)
    }
}
