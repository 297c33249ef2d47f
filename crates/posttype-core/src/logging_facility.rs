//! Structured logging for post-type operations
//!
//! - `init(profile)` installs the process subscriber exactly once
//! - `log_op_start!`, `log_op_end!`, `log_op_error!` emit boundary events
//!   with the canonical field names from `posttype_core_types::schema`
//! - `test_capture` records events in memory for assertions
//!
//! Boundary events belong to the operation layer. Engines below it only
//! emit `tracing::debug!` detail.
//!
//! ```rust
//! use posttype_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
