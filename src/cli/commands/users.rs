use clap::Subcommand;
use serde_json::json;
use sqlx::PgPool;

use crate::api::validate::normalize_email;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::database::users;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Allow a user to log in again")]
    Activate {
        #[arg(help = "User email")]
        email: String,
    },

    #[command(about = "Block a user from logging in")]
    Deactivate {
        #[arg(help = "User email")]
        email: String,
    },
}

pub async fn handle(cmd: UserCommands, pool: &PgPool, output_format: OutputFormat) -> anyhow::Result<()> {
    let (email, active) = match cmd {
        UserCommands::Activate { email } => (email, true),
        UserCommands::Deactivate { email } => (email, false),
    };
    let email = normalize_email(&email);

    let user = users::set_active(pool, &email, active)
        .await?
        .ok_or_else(|| anyhow::anyhow!("No user with email '{}'", email))?;

    let verb = if active { "activated" } else { "deactivated" };
    output_success(
        output_format,
        &format!("User {} {}", user.username, verb),
        Some(json!({ "user": user })),
    )
}
