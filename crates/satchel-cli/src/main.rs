mod cli;
mod config;
mod files;
mod generate;
mod vault;

use crate::cli::ConfigCommand;
use clap::Parser;
use color_eyre::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cli = cli::Cli::parse();
    let config = config::load()?;
    match cli.command {
        cli::Command::Encrypt(args) => {
            let sealed = vault::encrypt(args, &config.vault)?;
            println!("artifact: {}", sealed.artifact_path.display());
            println!("key:      {}", sealed.key_path.display());
        }
        cli::Command::Decrypt {
            artifact,
            key,
            max_age_secs,
        } => println!("{}", vault::decrypt(artifact, key, max_age_secs)?),
        cli::Command::Keygen { path } => {
            let path = vault::keygen(path)?;
            println!("Key written to {}", path.display());
        }
        cli::Command::Collision { path } => {
            println!("{}", satchel_vault::resolve_path_collision(&path).display())
        }
        cli::Command::Find {
            dir,
            keyword,
            dirs,
            latest,
        } => {
            for path in files::find(&dir, &keyword, dirs, latest)? {
                println!("{}", path.display());
            }
        }
        cli::Command::Age { path } => println!("{}", files::age(&path)?),
        cli::Command::Gunzip { source } => {
            println!("{}", satchel_fs::gunzip(&source)?.display())
        }
        cli::Command::Unzip { source } => {
            for path in files::unzip(&source)? {
                println!("{}", path.display());
            }
        }
        cli::Command::Untar { source } => {
            for path in files::untar(&source)? {
                println!("{}", path.display());
            }
        }
        cli::Command::Random(args) => {
            for value in generate::random(&args, &config.random)? {
                println!("{value}");
            }
        }
        cli::Command::Weekday { day, weeks_out } => {
            println!("{}", generate::weekday(&day, weeks_out)?)
        }
        cli::Command::Dst { timezone } => {
            let zone = timezone.or(config.timezone);
            let in_dst = generate::dst(zone.as_deref())?;
            println!("{}", if in_dst { "DST" } else { "standard time" });
        }
        cli::Command::Version => print_version(),
        cli::Command::Config(ConfigCommand::Init) => init_config(&config)?,
    }

    Ok(())
}

fn init_tracing() {
    // Respect user-provided filters, default to info to avoid noisy stdout.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn print_version() {
    println!("satchel {}", env!("CARGO_PKG_VERSION"));
}

fn init_config(config: &config::Config) -> Result<()> {
    let path = config::write_default_if_missing(config)?;
    println!("Config initialized at {}", path.display());
    Ok(())
}
