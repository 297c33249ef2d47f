//! Command orchestration layer.
//!
//! Each operation looks up its target, builds the authorization context,
//! consults both engines, and persists through the store.

pub mod engine_command;
pub mod moderation;
pub mod operations;
pub mod read_tools;
pub mod response;
pub mod write;
