//! Canonical field keys and event names for structured logging

pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";
pub const FIELD_CALLER_ID: &str = "caller_id";

// Entity identifiers
pub const FIELD_POST_TYPE: &str = "post_type";
pub const FIELD_RECORD_ID: &str = "record_id";

// Lifecycle
pub const FIELD_STATUS_FROM: &str = "status_from";
pub const FIELD_STATUS_TO: &str = "status_to";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
