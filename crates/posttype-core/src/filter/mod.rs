//! Field authorization and filtering engine
//!
//! Two walks over one schema: `filter_input` decides what a caller may
//! write, `filter_output` decides what a caller may read.

pub mod input;
pub mod output;
pub mod path;
pub mod result;

pub use input::{filter_input, DENIED_MESSAGE, MISSING_MESSAGE};
pub use output::filter_output;
pub use path::FieldPath;
pub use result::InputFilterResult;
