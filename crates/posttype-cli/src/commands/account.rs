//! Account bootstrap
//!
//! Usage: posttype account add <ID> [--status <N>] [--data <JSON>]
//!
//! Writes straight to the store without operation checks, so the first
//! admin can exist before anyone is allowed to create records.

use clap::{Args, Subcommand};
use posttype_core::store::memory::seed;
use serde_json::{json, Value};

use super::{parse_data, print_json, CliResult};
use crate::session::Session;

#[derive(Debug, Args)]
pub struct AccountArgs {
    #[command(subcommand)]
    pub command: AccountCommand,
}

#[derive(Debug, Subcommand)]
pub enum AccountCommand {
    /// Store an account record as-is
    Add(AddArgs),
}

#[derive(Debug, Args)]
pub struct AddArgs {
    pub id: String,

    /// Raw status value; defaults to the account type's data-complete level
    #[arg(long)]
    pub status: Option<i64>,

    /// Further account fields as a JSON object
    #[arg(long)]
    pub data: Option<String>,
}

pub async fn execute(session: &Session, args: AccountArgs) -> CliResult {
    match args.command {
        AccountCommand::Add(add) => add_account(session, add).await,
    }
}

async fn add_account(session: &Session, args: AddArgs) -> CliResult {
    let account_type = session.account_type()?;
    let accounts = session.ops.registry().get(account_type)?;
    let status = accounts.status();

    let mut fields = match args.data.as_deref().map(parse_data).transpose()? {
        Some(Value::Object(map)) => map,
        Some(_) => return Err("--data must be a JSON object".into()),
        None => serde_json::Map::new(),
    };
    fields.insert("_id".to_string(), json!(args.id));
    fields.insert(
        status.status_field().to_string(),
        json!(args.status.unwrap_or(status.values().data_complete)),
    );

    let saved = seed(session.store(), account_type, Value::Object(fields)).await?;
    tracing::info!(post_type = account_type, record_id = saved.id(), "account added");
    print_json(&saved.to_value())
}
