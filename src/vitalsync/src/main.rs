#[macro_use]
extern crate log;

use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono::{DateTime, Local};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use vitalsync::{
    DatabaseHandler, RecordProvider, SyncOrchestrator,
    provider::{ExportDirProvider, HttpRecordProvider},
    types::{SyncMode, required_permissions},
};

#[derive(Parser)]
pub struct VitalSyncCli {
    #[arg(env, long, default_value = "sqlite://vitalsync.db?mode=rwc")]
    pub database_url: String,
    /// Directory holding `heart_rate.json` and `sleep_sessions.json` exports
    #[arg(env, long, conflicts_with = "provider_url")]
    pub export_dir: Option<PathBuf>,
    /// Base URL of the health data REST API
    #[arg(env, long)]
    pub provider_url: Option<String>,
    #[arg(env, long, hide_env_values = true)]
    pub provider_token: Option<String>,
    #[clap(subcommand)]
    pub subcommand: VitalSyncCommand,
}

#[derive(Subcommand)]
pub enum VitalSyncCommand {
    ///
    /// Sync heart rate and sleep data since the last checkpoint
    ///
    Sync {
        /// Read the last N hours instead of resuming from the checkpoint
        #[arg(long)]
        hours: Option<u32>,
        /// Write merged points to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    ///
    /// Print the last successful sync time
    ///
    Checkpoint,
    ///
    /// Forget the last sync so the next one starts from scratch
    ///
    ResetCheckpoint,
    ///
    /// List the read permissions a provider must grant
    ///
    Permissions,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(error) = dotenv() {
        println!("{}", error);
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("sqlx::query", log::LevelFilter::Off)
        .filter_module("sea_orm_migration::migrator", log::LevelFilter::Off)
        .init();

    let cli = VitalSyncCli::parse();

    match cli.subcommand {
        VitalSyncCommand::Sync { hours, output } => {
            let db_handler = DatabaseHandler::new(cli.database_url).await?;
            let mode = match hours {
                Some(hours) => SyncMode::ExplicitHours(hours),
                None => SyncMode::SinceCheckpoint,
            };

            match (cli.export_dir, cli.provider_url) {
                (Some(dir), _) => {
                    let provider = ExportDirProvider::new(dir);
                    run_sync(provider, db_handler, mode, output).await
                }
                (None, Some(url)) => {
                    let token = cli
                        .provider_token
                        .context("PROVIDER_TOKEN is required with PROVIDER_URL")?;
                    let provider = HttpRecordProvider::new(url, token)?;
                    run_sync(provider, db_handler, mode, output).await
                }
                (None, None) => bail!("Set either EXPORT_DIR or PROVIDER_URL"),
            }
        }
        VitalSyncCommand::Checkpoint => {
            let db_handler = DatabaseHandler::new(cli.database_url).await?;
            let last_sync = db_handler.get_last_sync().await?;
            match DateTime::from_timestamp_millis(last_sync).filter(|_| last_sync > 0) {
                Some(time) => println!("Last sync: {}", time.with_timezone(&Local)),
                None => println!("Never synced"),
            }
            Ok(())
        }
        VitalSyncCommand::ResetCheckpoint => {
            let db_handler = DatabaseHandler::new(cli.database_url).await?;
            db_handler.clear_last_sync().await?;
            info!("Sync checkpoint cleared");
            Ok(())
        }
        VitalSyncCommand::Permissions => {
            for permission in required_permissions() {
                println!("{}", permission);
            }
            Ok(())
        }
    }
}

async fn run_sync<P>(
    provider: P,
    db_handler: DatabaseHandler,
    mode: SyncMode,
    output: Option<PathBuf>,
) -> anyhow::Result<()>
where
    P: RecordProvider,
{
    let orchestrator = SyncOrchestrator::new(provider, db_handler);
    let outcome = orchestrator.sync_with_report(mode).await?;

    let json = serde_json::to_string_pretty(&outcome.points)?;
    match output {
        Some(path) => {
            tokio::fs::write(&path, json)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("{}", outcome.report);
            println!("Points written to {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
