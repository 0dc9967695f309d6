pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::config::DatabaseConfig;
use crate::database::DatabaseManager;

#[derive(Parser)]
#[command(name = "moviestream")]
#[command(about = "MovieStream admin CLI - migrations, role registry and user administration")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply pending database migrations")]
    Migrate,

    #[command(about = "Role registry management")]
    Roles {
        #[command(subcommand)]
        cmd: commands::roles::RoleCommands,
    },

    #[command(about = "User account administration")]
    Users {
        #[command(subcommand)]
        cmd: commands::users::UserCommands,
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

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let pool = connect().await?;

    let result = match cli.command {
        Commands::Migrate => commands::migrate::handle(&pool, output_format).await,
        Commands::Roles { cmd } => commands::roles::handle(cmd, &pool, output_format).await,
        Commands::Users { cmd } => commands::users::handle(cmd, &pool, output_format).await,
    };

    pool.close().await;
    result
}

async fn connect() -> anyhow::Result<PgPool> {
    let config = DatabaseConfig::from_env()?;
    Ok(DatabaseManager::connect(&config).await?)
}
