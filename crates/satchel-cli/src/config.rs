use std::{
    fs,
    path::{Path, PathBuf},
};

use color_eyre::Result;
use dirs::config_dir;
use satchel_gen::RandomSpec;
use satchel_vault::{OverwritePolicy, DEFAULT_ARTIFACT_PATH, DEFAULT_KEY_PATH};
use serde::{Deserialize, Serialize};

/// User-level configuration loaded from `~/.config/satchel/config.toml` (platform-specific).
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// IANA timezone for `satchel dst` when none is given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Defaults for `encrypt`.
    pub vault: VaultConfig,
    /// Defaults for `random`.
    pub random: RandomSpec,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct VaultConfig {
    pub artifact_path: PathBuf,
    pub key_path: PathBuf,
    pub overwrite: OverwritePolicy,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            artifact_path: PathBuf::from(DEFAULT_ARTIFACT_PATH),
            key_path: PathBuf::from(DEFAULT_KEY_PATH),
            overwrite: OverwritePolicy::default(),
        }
    }
}

/// Load config from the default path; if missing, return defaults.
pub fn load() -> Result<Config> {
    let path = default_path()?;
    load_from_path(path)
}

/// Load config from a given path; if missing or empty, return defaults.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents = fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    let cfg: Config = toml::from_str(&contents)?;
    Ok(cfg)
}

/// Resolve the default config path (platform aware).
pub fn default_path() -> Result<PathBuf> {
    let base = config_dir().ok_or_else(|| color_eyre::eyre::eyre!("no config dir available"))?;
    Ok(base.join("satchel").join("config.toml"))
}

/// Write the given config to disk unless a file is already there, creating parent
/// directories as needed. Returns the path either way.
pub fn write_default_if_missing(config: &Config) -> Result<PathBuf> {
    write_to_path_if_missing(config, &default_path()?)
}

fn write_to_path_if_missing(config: &Config, path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return Ok(path.to_path_buf());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let body = toml::to_string_pretty(config)?;
    fs::write(path, body)?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_default_when_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = load_from_path(dir.path().join("config.toml")).expect("load");
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.vault.key_path, PathBuf::from("KEY.key"));
    }

    #[test]
    fn parses_custom_config() {
        let contents = r##"
            timezone = "Europe/Berlin"
            [vault]
            artifact_path = "/tmp/secrets/creds.txt"
            key_path = "/tmp/secrets/creds.key"
            overwrite = "obj"
            [random]
            length = 12
            special = "#!"
        "##;
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, contents).expect("write temp config");

        let cfg = load_from_path(&path).expect("load");
        assert_eq!(
            cfg,
            Config {
                timezone: Some("Europe/Berlin".into()),
                vault: VaultConfig {
                    artifact_path: PathBuf::from("/tmp/secrets/creds.txt"),
                    key_path: PathBuf::from("/tmp/secrets/creds.key"),
                    overwrite: OverwritePolicy::ArtifactOnly,
                },
                random: RandomSpec {
                    length: 12,
                    special: "#!".into(),
                    ..RandomSpec::default()
                },
            }
        );
    }

    #[test]
    fn rejects_unknown_policy() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[vault]\noverwrite = \"sometimes\"\n").expect("write");
        assert!(load_from_path(&path).is_err());
    }

    #[test]
    fn write_default_creates_file_once() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");
        let cfg = Config {
            timezone: Some("UTC".into()),
            ..Config::default()
        };

        write_to_path_if_missing(&cfg, &path).expect("write should succeed");
        let other = Config::default();
        let second = write_to_path_if_missing(&other, &path).expect("second write ok");
        assert_eq!(second, path);
        let loaded = load_from_path(&path).expect("load");
        assert_eq!(loaded, cfg);
    }
}
