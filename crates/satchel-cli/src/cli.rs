use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};
use satchel_vault::OverwritePolicy;

/// CLI surface definition. Each subcommand is a thin wrapper over one library call.
#[derive(Parser, Debug)]
#[command(
    name = "satchel",
    about = "Grab-bag of file, crypto, and generator helpers",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Encrypt text or a file into an artifact file paired with a key file.
    Encrypt(EncryptArgs),
    /// Decrypt an artifact file with its key file and print the plaintext.
    Decrypt {
        artifact: PathBuf,
        #[arg(long)]
        key: PathBuf,
        /// Reject artifacts sealed longer ago than this.
        #[arg(long)]
        max_age_secs: Option<u64>,
    },
    /// Generate a new key file, replacing any file at PATH.
    Keygen { path: PathBuf },
    /// Print the next free numbered variant of PATH, e.g. `report(1).txt`.
    Collision { path: PathBuf },
    /// Search a directory tree for files (or directories) by name.
    Find {
        dir: PathBuf,
        #[arg(long, default_value = "")]
        keyword: String,
        /// Match directories instead of files.
        #[arg(long, conflicts_with = "latest")]
        dirs: bool,
        /// Print only the most recently created match.
        #[arg(long)]
        latest: bool,
    },
    /// Print how long ago a file was created, counted to the start of today.
    Age { path: PathBuf },
    /// Decompress a .gz file in place.
    Gunzip { source: PathBuf },
    /// Extract a .zip beside itself.
    Unzip { source: PathBuf },
    /// Unpack a .tar.gz or .tgz beside itself.
    Untar { source: PathBuf },
    /// Generate random strings.
    Random(RandomArgs),
    /// Print the next date falling on a weekday.
    Weekday {
        /// Weekday name or index (0 = Monday).
        day: String,
        #[arg(long, default_value_t = 0)]
        weeks_out: u32,
    },
    /// Report whether daylight saving time is in effect in a timezone.
    Dst { timezone: Option<String> },
    /// Print version and exit.
    Version,
    /// Manage CLI configuration.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
#[command(group(ArgGroup::new("payload").required(true).args(["text", "file"])))]
pub struct EncryptArgs {
    /// Text to encrypt.
    #[arg(long)]
    pub text: Option<String>,
    /// File to encrypt; the artifact replaces it unless --out is given.
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// Existing key file to encrypt with.
    #[arg(long)]
    pub key_file: Option<PathBuf>,
    /// Artifact path.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Key file path when a key is generated.
    #[arg(long)]
    pub key_out: Option<PathBuf>,
    /// Collision policy: all, none, key, or obj.
    #[arg(long)]
    pub overwrite: Option<OverwritePolicy>,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct RandomArgs {
    #[arg(long)]
    pub length: Option<usize>,
    #[arg(long, default_value_t = 1)]
    pub count: usize,
    #[arg(long)]
    pub sep: Option<String>,
    #[arg(long)]
    pub special: Option<String>,
    #[arg(long)]
    pub no_alpha: bool,
    #[arg(long)]
    pub no_digits: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Create a default config file if one does not exist.
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_encrypt_with_policy() {
        let cli = Cli::try_parse_from([
            "satchel",
            "encrypt",
            "--text",
            "hi",
            "--overwrite",
            "obj",
        ])
        .expect("parse should succeed");
        let Command::Encrypt(args) = cli.command else {
            panic!("expected encrypt");
        };
        assert_eq!(args.text.as_deref(), Some("hi"));
        assert_eq!(args.overwrite, Some(OverwritePolicy::ArtifactOnly));
    }

    #[test]
    fn encrypt_requires_a_payload() {
        assert!(Cli::try_parse_from(["satchel", "encrypt"]).is_err());
        assert!(
            Cli::try_parse_from(["satchel", "encrypt", "--text", "a", "--file", "b"]).is_err()
        );
    }

    #[test]
    fn rejects_unknown_policy() {
        let parsed = Cli::try_parse_from([
            "satchel",
            "encrypt",
            "--text",
            "hi",
            "--overwrite",
            "maybe",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn parses_decrypt_subcommand() {
        let cli = Cli::try_parse_from(["satchel", "decrypt", "FILE.txt", "--key", "KEY.key"])
            .expect("parse should succeed");
        assert_eq!(
            cli.command,
            Command::Decrypt {
                artifact: PathBuf::from("FILE.txt"),
                key: PathBuf::from("KEY.key"),
                max_age_secs: None,
            }
        );
    }

    #[test]
    fn parses_unzip_subcommand() {
        let cli = Cli::try_parse_from(["satchel", "unzip", "bundle.zip"])
            .expect("parse should succeed");
        assert_eq!(
            cli.command,
            Command::Unzip {
                source: PathBuf::from("bundle.zip"),
            }
        );
    }

    #[test]
    fn find_latest_conflicts_with_dirs() {
        assert!(Cli::try_parse_from(["satchel", "find", ".", "--dirs", "--latest"]).is_err());
    }

    #[test]
    fn parses_config_init_subcommand() {
        let cli =
            Cli::try_parse_from(["satchel", "config", "init"]).expect("parse should succeed");
        assert_eq!(cli.command, Command::Config(ConfigCommand::Init));
    }
}
