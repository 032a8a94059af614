use chrono::Utc;
use clap::Subcommand;
use serde_json::json;

use crate::auth::secret::generate_admin_key;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::services::tenant_service::compute_status;
use crate::services::NewTenant;
use crate::state::AppState;

#[derive(Subcommand)]
pub enum TenantCommands {
    #[command(about = "List all tenants")]
    List,

    #[command(about = "Show tenant details and trial status")]
    Show {
        #[arg(help = "Tenant slug")]
        slug: String,
    },

    #[command(about = "Create new tenant and print its admin key")]
    Create {
        #[arg(help = "Funeral home name")]
        name: String,

        #[arg(long, help = "Owner email address")]
        email: String,

        #[arg(long, help = "Explicit slug (derived from the name otherwise)")]
        slug: Option<String>,

        #[arg(long, help = "Admin key (generated otherwise)")]
        key: Option<String>,
    },

    #[command(about = "Delete tenant, its admin key and its data")]
    Delete {
        #[arg(help = "Tenant slug")]
        slug: String,
    },

    #[command(about = "Mark tenant as paid (status active)")]
    MarkPaid {
        #[arg(help = "Tenant slug")]
        slug: String,
    },
}

pub async fn handle(state: &AppState, cmd: TenantCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TenantCommands::List => {
            let tenants = state.tenants.list().await;
            if tenants.is_empty() {
                return output_empty_collection(&output_format, "tenants", "No tenants registered");
            }

            match output_format {
                OutputFormat::Json => {
                    let views: Vec<_> = tenants.iter().map(|t| t.to_view()).collect();
                    output_json(&json!({ "tenants": views }))?;
                }
                OutputFormat::Text => {
                    let now = Utc::now();
                    println!("{:<28} {:<32} {:<10} {:<18} {}", "SLUG", "NAME", "STATUS", "TRIAL ENDS", "EMAIL");
                    println!("{}", "-".repeat(110));

                    for tenant in &tenants {
                        let report = compute_status(tenant, now);
                        let status = if report.trial_expired {
                            "expired".to_string()
                        } else {
                            format!("{:?}", tenant.status).to_lowercase()
                        };
                        println!(
                            "{:<28} {:<32} {:<10} {:<18} {}",
                            tenant.slug,
                            tenant.funeral_home_name,
                            status,
                            format_millis(Some(tenant.trial_ends_at)),
                            tenant.email
                        );
                    }
                }
            }
            Ok(())
        }
        TenantCommands::Show { slug } => {
            let tenant = state.tenants.find_by_slug(&slug).await?;
            let report = compute_status(&tenant, Utc::now());

            match output_format {
                OutputFormat::Json => output_json(&json!({ "tenant": tenant.to_view(), "status": report }))?,
                OutputFormat::Text => {
                    println!("Slug:        {}", tenant.slug);
                    println!("Name:        {}", tenant.funeral_home_name);
                    println!("Email:       {}", tenant.email);
                    println!("Status:      {:?}", tenant.status);
                    println!("Created:     {}", format_millis(Some(tenant.created_at)));
                    println!("Trial ends:  {}", format_millis(Some(tenant.trial_ends_at)));
                    println!("Expired:     {}", report.trial_expired);
                    println!("Days left:   {}", report.days_remaining);
                    println!("Paid:        {}", format_millis(tenant.paid_at));
                }
            }
            Ok(())
        }
        TenantCommands::Create { name, email, slug, key } => {
            let key = match key {
                Some(key) => {
                    state.admin_auth.validate_new_key(&key)?;
                    key
                }
                None => generate_admin_key(),
            };

            let now = Utc::now();
            let tenant = state
                .tenants
                .create(
                    NewTenant {
                        funeral_home_name: name,
                        email,
                        slug,
                        unique_email: false,
                    },
                    now,
                )
                .await?;
            state.credentials.set_key(&tenant.slug, &key, now).await?;

            output_success(
                &output_format,
                &format!("Tenant '{}' created", tenant.slug),
                Some(json!({ "slug": tenant.slug, "adminKey": key })),
            )?;
            if matches!(output_format, OutputFormat::Text) {
                println!("Admin key: {}", key);
            }
            Ok(())
        }
        TenantCommands::Delete { slug } => {
            if !state.tenants.delete(&slug).await? {
                return Err(anyhow::anyhow!("Tenant '{}' not found", slug));
            }
            state.credentials.remove(&slug).await?;
            state.store.remove_dir(format!("tenants/{slug}")).await?;

            output_success(&output_format, &format!("Tenant '{}' deleted successfully", slug), None)
        }
        TenantCommands::MarkPaid { slug } => {
            let tenant = state.tenants.mark_paid(&slug, Utc::now()).await?;
            output_success(
                &output_format,
                &format!("Tenant '{}' is now active", tenant.slug),
                Some(json!({ "slug": tenant.slug, "paidAt": tenant.paid_at })),
            )
        }
    }
}
