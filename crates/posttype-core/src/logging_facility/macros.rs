//! Boundary logging macros

/// Log the start of an operation
///
/// ```
/// # use posttype_core::log_op_start;
/// log_op_start!("create");
/// log_op_start!("create", post_type = "post");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = posttype_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = posttype_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// ```
/// # use posttype_core::log_op_end;
/// log_op_end!("create", duration_ms = 3);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = posttype_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = posttype_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation that ended in an error
///
/// The error is converted into `PtError` so the event always carries the
/// stable kind and code.
///
/// ```
/// # use posttype_core::log_op_error;
/// # use posttype_core::errors::{PtError, PtErrorKind};
/// let err = PtError::new(PtErrorKind::NotFound);
/// log_op_error!("update", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let pt_err: $crate::errors::PtError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = posttype_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?pt_err.kind(),
            err.code = pt_err.code(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let pt_err: $crate::errors::PtError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = posttype_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?pt_err.kind(),
            err.code = pt_err.code(),
            $($field)*
        );
    }};
}
