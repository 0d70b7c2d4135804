//! Developer CLI for inspecting a legacy `AsyncStorage` store on disk.
//!
//! Point `--root` at a copy of an app's private storage (the `databases`
//! directory of an Android app, or the Application Support directory of an
//! iOS app) and query it the same way the migration code does.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use eyre::WrapErr;
use legacy_storage::{LegacyStorage, LegacyStoragePaths, Platform};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Inspect legacy React Native `AsyncStorage` data.
#[derive(Parser, Debug)]
#[command(name = "legacy-storage", version)]
struct Cli {
    /// App private storage root containing the legacy store.
    #[arg(long, env = "LEGACY_STORAGE_ROOT")]
    root: PathBuf,

    /// Bundle identifier the iOS store is nested under.
    #[arg(long, env = "LEGACY_STORAGE_BUNDLE_ID")]
    bundle_id: Option<String>,

    /// Platform convention to read (`android`, `ios` or `test`). Defaults to
    /// the platform this binary was built for.
    #[arg(long, env = "LEGACY_STORAGE_PLATFORM", value_parser = parse_platform)]
    platform: Option<Platform>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report whether a legacy store is present.
    Exists,
    /// Print the raw value stored under a key.
    Get {
        /// Storage key.
        key: String,
    },
    /// Delete the whole legacy store.
    Clear {
        /// Confirm deletion.
        #[arg(long)]
        yes: bool,
    },
    /// Print the resolved legacy storage locations.
    Paths,
}

fn parse_platform(identifier: &str) -> Result<Platform, String> {
    Platform::from_identifier(identifier).map_err(|err| err.to_string())
}

fn init_tracing() -> eyre::Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .wrap_err("failed to install tracing subscriber")?;
    tracing_log::LogTracer::init().wrap_err("failed to forward log records")?;
    Ok(())
}

#[tokio::main]
async fn main() -> eyre::Result<ExitCode> {
    init_tracing()?;
    let cli = Cli::parse();

    let paths = LegacyStoragePaths::new(&cli.root, cli.bundle_id.as_deref());
    let platform = cli.platform.unwrap_or_else(Platform::current);
    let storage = LegacyStorage::for_platform(platform, &paths);
    info!(%platform, root = %cli.root.display(), "opened legacy storage");

    let code = match cli.command {
        Command::Exists => {
            let exists = storage.exists().await?;
            println!("{exists}");
            if exists {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Command::Get { key } => match storage.data(key.clone()).await? {
            Some(value) => {
                println!("{value}");
                ExitCode::SUCCESS
            }
            None => {
                eprintln!("no legacy store; {key:?} not found");
                ExitCode::FAILURE
            }
        },
        Command::Clear { yes } => {
            if !yes {
                eyre::bail!("refusing to delete legacy data without --yes");
            }
            storage
                .clear()
                .await
                .wrap_err("failed to clear legacy storage")?;
            info!(%platform, "cleared legacy storage");
            ExitCode::SUCCESS
        }
        Command::Paths => {
            print_paths(platform, &paths);
            ExitCode::SUCCESS
        }
    };

    storage.dispose().await?;
    Ok(code)
}

fn print_paths(platform: Platform, paths: &LegacyStoragePaths) {
    println!("platform: {platform}");
    println!("root: {}", paths.root().display());
    println!("database: {}", paths.database_path().display());
    println!("storage dir: {}", paths.async_storage_dir().display());
    println!("manifest: {}", paths.manifest_path().display());
}
