//! Posttype Engine - Operation layer
//!
//! Composes the lifecycle and filtering engines of `posttype-core` with a
//! `RecordStore` into the guarded operations callers invoke: create,
//! update, delete, approve, feature, unfeature, ban, read-one and
//! read-many.

pub mod commands;

pub use commands::engine_command::{apply_command, CommandResult};
pub use commands::operations::Operations;
pub use commands::response::{MutationResponse, ResponseError};
