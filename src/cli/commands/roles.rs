use clap::Subcommand;
use serde_json::json;
use sqlx::PgPool;

use crate::cli::utils::{output_empty_collection, output_success};
use crate::cli::OutputFormat;
use crate::database::roles;

#[derive(Subcommand)]
pub enum RoleCommands {
    #[command(about = "Create or refresh the built-in roles")]
    Seed,

    #[command(about = "List roles and their permissions")]
    List,
}

pub async fn handle(cmd: RoleCommands, pool: &PgPool, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        RoleCommands::Seed => {
            let definitions = roles::definitions()?;
            let seeded = roles::seed_roles(pool, &definitions).await?;
            output_success(
                output_format,
                &format!("{} roles created/updated", seeded.len()),
                Some(json!({ "roles": seeded })),
            )
        }
        RoleCommands::List => {
            let all = roles::list(pool).await?;
            if all.is_empty() {
                return output_empty_collection(output_format, "roles", "No roles found; run `moviestream roles seed`");
            }

            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({ "roles": all }))?);
                }
                OutputFormat::Text => {
                    println!("{:<18} {:<40} {}", "NAME", "DESCRIPTION", "PERMISSIONS");
                    println!("{}", "-".repeat(90));
                    for role in &all {
                        println!("{:<18} {:<40} {}", role.name, role.description, role.permissions.join(", "));
                    }
                }
            }
            Ok(())
        }
    }
}
