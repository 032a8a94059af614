pub mod commands;
pub mod utils;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::auth::secret::random_token;
use crate::config::AppConfig;
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "funeralctl")]
#[command(about = "Operator CLI for the funeral platform data directory")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "Data directory (defaults to DATA_DIR or ./data)")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Tenant provisioning and billing status")]
    Tenant {
        #[command(subcommand)]
        cmd: commands::tenant::TenantCommands,
    },

    #[command(about = "Superadmin account management")]
    Superadmin {
        #[command(subcommand)]
        cmd: commands::superadmin::SuperadminCommands,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Services over the same data directory the server uses.
///
/// The CLI never hands out tokens, so a missing signing secret is replaced
/// with a throwaway one.
pub fn local_state(data_dir: Option<PathBuf>) -> anyhow::Result<AppState> {
    let mut config = AppConfig::from_env();
    if let Some(dir) = data_dir {
        config.storage.data_dir = dir;
    }
    if config.security.jwt_secret.is_empty() {
        config.security.jwt_secret = random_token();
    }
    Ok(AppState::new(config)?)
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let state = local_state(cli.data_dir)?;

    match cli.command {
        Commands::Tenant { cmd } => commands::tenant::handle(&state, cmd, output_format).await,
        Commands::Superadmin { cmd } => commands::superadmin::handle(&state, cmd, output_format).await,
    }
}
