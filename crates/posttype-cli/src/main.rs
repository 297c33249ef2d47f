//! Posttype CLI
//!
//! Command-line interface over a SQLite-backed post type store

use clap::{Parser, Subcommand};
use posttype_core::logging_facility;
use std::path::PathBuf;

mod commands;
mod config;
mod session;

use commands::CliResult;
use config::AppConfig;
use session::Session;

#[derive(Debug, Parser)]
#[command(name = "posttype")]
#[command(about = "Posttype - moderated records with field-level access control", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Act as this account
    #[arg(long = "as", global = true, value_name = "ACCOUNT_ID")]
    caller: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(flatten)]
    Records(commands::records::RecordCommand),
    /// Print the status name and applicable moderation actions of a record
    Status(commands::records::TargetArgs),
    /// Account bootstrap operations
    Account(commands::account::AccountArgs),
    /// Validate the configuration file and print the registered post types
    CheckConfig,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> CliResult {
    let config = AppConfig::load(&cli.config)?;
    logging_facility::init(config.log_profile);

    if let Commands::CheckConfig = cli.command {
        return commands::check::execute(&config);
    }

    let session = Session::open(&config, cli.caller.as_deref()).await?;
    match cli.command {
        Commands::Records(command) => commands::records::execute(&session, command).await,
        Commands::Status(args) => commands::records::status(&session, args).await,
        Commands::Account(args) => commands::account::execute(&session, args).await,
        Commands::CheckConfig => commands::check::execute(&config),
    }
}
