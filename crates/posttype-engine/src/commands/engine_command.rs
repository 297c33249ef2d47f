//! Dispatch of `Command` values onto the operations.

use posttype_core::errors::PtError;
use posttype_core::model::Record;
use posttype_core::store::Page;
use posttype_core::Command;
use posttype_core_types::RequestContext;
use serde::Serialize;
use serde_json::Value;

use super::operations::Operations;
use super::response::MutationResponse;

/// Result of applying a command
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CommandResult {
    /// Envelope returned by every mutation
    Mutation(MutationResponse),
    One(Option<Value>),
    Many(Page<Value>),
}

impl CommandResult {
    pub fn into_value(self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Apply a command on behalf of `caller`
///
/// Mutations always succeed at this level: their failures are carried in
/// the envelope.
///
/// # Errors
///
/// Read failures (unknown post type, disallowed list scope, store errors).
pub async fn apply_command(
    ops: &Operations,
    ctx: &RequestContext,
    caller: Option<&Record>,
    cmd: Command,
) -> Result<CommandResult, PtError> {
    let result = match cmd {
        Command::Create { post_type, record } => CommandResult::Mutation(
            ops.create(ctx, &post_type, caller, record.as_ref()).await,
        ),
        Command::Update {
            post_type,
            id,
            record,
        } => CommandResult::Mutation(
            ops.update(ctx, &post_type, caller, &id, record.as_ref())
                .await,
        ),
        Command::Delete { post_type, id } => {
            CommandResult::Mutation(ops.delete(ctx, &post_type, caller, &id).await)
        }
        Command::Approve { post_type, id } => {
            CommandResult::Mutation(ops.approve(ctx, &post_type, caller, &id).await)
        }
        Command::Feature {
            post_type,
            id,
            master_code,
        } => {
            let code = master_code.as_ref().map(|c| c.expose().as_str());
            CommandResult::Mutation(ops.feature(ctx, &post_type, caller, &id, code).await)
        }
        Command::Unfeature {
            post_type,
            id,
            master_code,
        } => {
            let code = master_code.as_ref().map(|c| c.expose().as_str());
            CommandResult::Mutation(ops.unfeature(ctx, &post_type, caller, &id, code).await)
        }
        Command::Ban { post_type, id } => {
            CommandResult::Mutation(ops.ban(ctx, &post_type, caller, &id).await)
        }
        Command::ReadOne { post_type, id } => {
            CommandResult::One(ops.read_one(ctx, &post_type, caller, &id).await?)
        }
        Command::ReadMany { post_type, request } => {
            CommandResult::Many(ops.read_many(ctx, &post_type, caller, &request).await?)
        }
    };
    Ok(result)
}

impl Operations {
    /// Method form of [`apply_command`]
    ///
    /// # Errors
    ///
    /// See [`apply_command`].
    pub async fn apply(
        &self,
        ctx: &RequestContext,
        caller: Option<&Record>,
        cmd: Command,
    ) -> Result<CommandResult, PtError> {
        apply_command(self, ctx, caller, cmd).await
    }
}
