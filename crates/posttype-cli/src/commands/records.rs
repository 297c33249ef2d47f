//! Record operations
//!
//! Usage: posttype [--as <ACCOUNT_ID>] <OPERATION> <POST_TYPE> [ID] [OPTIONS]

use clap::{Args, Subcommand};
use posttype_core::{Command, ListRequest, ListScope};
use posttype_core_types::Sensitive;
use posttype_engine::{CommandResult, MutationResponse};

use super::{parse_data, print_json, CliResult};
use crate::session::Session;

#[derive(Debug, Subcommand)]
pub enum RecordCommand {
    /// Create a record authored by the caller
    Create(DataArgs),
    /// Replace the writable fields of a record
    Update(UpdateArgs),
    /// Soft-delete a record
    Delete(TargetArgs),
    /// Approve a record (admins)
    Approve(TargetArgs),
    /// Feature an approved record (admins, needs the master code)
    Feature(FeatureArgs),
    /// Return a featured record to approved (admins, needs the master code)
    Unfeature(FeatureArgs),
    /// Ban a record (admins)
    Ban(TargetArgs),
    /// Print one record as the caller sees it
    Get(TargetArgs),
    /// Print one page of records as the caller sees them
    List(ListArgs),
}

#[derive(Debug, Args)]
pub struct TargetArgs {
    pub post_type: String,
    pub id: String,
}

#[derive(Debug, Args)]
pub struct DataArgs {
    pub post_type: String,

    /// Record fields as a JSON object
    #[arg(long)]
    pub data: String,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    pub post_type: String,
    pub id: String,

    /// Record fields as a JSON object
    #[arg(long)]
    pub data: String,
}

#[derive(Debug, Args)]
pub struct FeatureArgs {
    pub post_type: String,
    pub id: String,

    #[arg(long)]
    pub code: Option<String>,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    pub post_type: String,

    /// Only records of this author
    #[arg(long)]
    pub author: Option<String>,

    /// featured, approved, validated, notDeleted, deleted, banned or all
    #[arg(long)]
    pub scope: Option<ListScope>,

    #[arg(long)]
    pub page: Option<u32>,

    #[arg(long)]
    pub per_page: Option<u32>,
}

impl RecordCommand {
    fn into_command(self) -> Result<Command, serde_json::Error> {
        let cmd = match self {
            RecordCommand::Create(args) => Command::Create {
                post_type: args.post_type,
                record: Some(parse_data(&args.data)?),
            },
            RecordCommand::Update(args) => Command::Update {
                post_type: args.post_type,
                id: args.id,
                record: Some(parse_data(&args.data)?),
            },
            RecordCommand::Delete(t) => Command::Delete {
                post_type: t.post_type,
                id: t.id,
            },
            RecordCommand::Approve(t) => Command::Approve {
                post_type: t.post_type,
                id: t.id,
            },
            RecordCommand::Feature(args) => Command::Feature {
                post_type: args.post_type,
                id: args.id,
                master_code: args.code.map(Sensitive::new),
            },
            RecordCommand::Unfeature(args) => Command::Unfeature {
                post_type: args.post_type,
                id: args.id,
                master_code: args.code.map(Sensitive::new),
            },
            RecordCommand::Ban(t) => Command::Ban {
                post_type: t.post_type,
                id: t.id,
            },
            RecordCommand::Get(t) => Command::ReadOne {
                post_type: t.post_type,
                id: t.id,
            },
            RecordCommand::List(args) => Command::ReadMany {
                post_type: args.post_type,
                request: ListRequest {
                    author: args.author,
                    scope: args.scope,
                    page: args.page,
                    per_page: args.per_page,
                },
            },
        };
        Ok(cmd)
    }
}

/// Run a record operation and print its JSON result
///
/// Mutation failures print the error envelope and still fail the process.
pub async fn execute(session: &Session, command: RecordCommand) -> CliResult {
    let cmd = command.into_command()?;
    let missing = match &cmd {
        Command::ReadOne { post_type, id } => Some(format!("no {} '{}'", post_type, id)),
        _ => None,
    };

    let result = session.apply(cmd).await?;
    print_json(&result)?;
    match result {
        CommandResult::Mutation(MutationResponse::Error(error)) => Err(error.message.into()),
        CommandResult::One(None) => Err(missing.unwrap_or_default().into()),
        _ => Ok(()),
    }
}

/// Print the status name and applicable moderation actions of a record
pub async fn status(session: &Session, args: TargetArgs) -> CliResult {
    let summary = session
        .ops
        .status_summary(&session.ctx, &args.post_type, &args.id)
        .await?;
    print_json(&summary)
}
