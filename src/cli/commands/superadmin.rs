use chrono::Utc;
use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::state::AppState;

#[derive(Subcommand)]
pub enum SuperadminCommands {
    #[command(about = "Create or replace a superadmin account")]
    Add {
        #[arg(help = "Account email")]
        email: String,

        #[arg(long, env = "SUPERADMIN_PASSWORD", help = "Account password")]
        password: String,
    },

    #[command(about = "List superadmin accounts")]
    List,
}

pub async fn handle(state: &AppState, cmd: SuperadminCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        SuperadminCommands::Add { email, password } => {
            let account = state.sessions.add_account(&email, &password, Utc::now()).await?;
            output_success(
                &output_format,
                &format!("Superadmin '{}' saved", account.email),
                Some(json!({ "email": account.email })),
            )
        }
        SuperadminCommands::List => {
            let accounts = state.sessions.accounts().await;
            if accounts.is_empty() {
                return output_empty_collection(&output_format, "superadmins", "No superadmin accounts");
            }
            match output_format {
                OutputFormat::Json => {
                    let emails: Vec<_> = accounts.iter().map(|a| a.email.as_str()).collect();
                    output_json(&json!({ "superadmins": emails }))
                }
                OutputFormat::Text => {
                    for account in &accounts {
                        println!("{:<40} {}", account.email, format_millis(Some(account.created_at)));
                    }
                    Ok(())
                }
            }
        }
    }
}
