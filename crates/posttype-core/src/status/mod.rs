//! Status lifecycle engine
//!
//! Pure functions over the integer status of a record. Nothing here reads
//! or writes storage.

pub mod manager;
pub mod required;
pub mod values;

pub use manager::{DeleteOrRestore, StatusManager, StatusSummary, Transition};
pub use required::{PrimitiveType, RequiredShape};
pub use values::{StatusLevel, StatusValues};
