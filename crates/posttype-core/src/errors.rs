use posttype_core_types::{RequestId, TraceId};
use serde::Serialize;
use thiserror::Error;

/// Result type alias using PostTypeError
pub type Result<T> = std::result::Result<T, PostTypeError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every error leaving the core maps onto one of these kinds. Each kind has
/// a stable code that transport layers and tests can match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PtErrorKind {
    // Field-level validation
    MissingField,
    InvalidField,

    // Authorization / lookup
    AccessDenied,
    NotFound,

    // Registration
    ConfigurationInvariant,
    AlreadyExists,

    // Integration/IO
    InvalidInput,
    Persistence,
    Serialization,
    Io,

    // Internal
    Internal,
}

impl PtErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            PtErrorKind::MissingField => "ERR_MISSING_FIELD",
            PtErrorKind::InvalidField => "ERR_INVALID_FIELD",
            PtErrorKind::AccessDenied => "ERR_ACCESS_DENIED",
            PtErrorKind::NotFound => "ERR_NOT_FOUND",
            PtErrorKind::ConfigurationInvariant => "ERR_CONFIGURATION_INVARIANT",
            PtErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            PtErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            PtErrorKind::Persistence => "ERR_PERSISTENCE",
            PtErrorKind::Serialization => "ERR_SERIALIZATION",
            PtErrorKind::Io => "ERR_IO",
            PtErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// One field-level problem, addressed by its dotted path (`record.title`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub path: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification plus enough context (operation, post type,
/// record, request) to be logged and mapped into a response envelope.
#[derive(Debug, Clone)]
pub struct PtError {
    kind: PtErrorKind,
    op: Option<String>,
    post_type: Option<String>,
    record_id: Option<String>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
    errors: Vec<FieldViolation>,
}

impl PtError {
    pub fn new(kind: PtErrorKind) -> Self {
        Self {
            kind,
            op: None,
            post_type: None,
            record_id: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    pub fn with_post_type(mut self, post_type: impl Into<String>) -> Self {
        self.post_type = Some(post_type.into());
        self
    }

    pub fn with_record_id(mut self, id: impl Into<String>) -> Self {
        self.record_id = Some(id.into());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attach per-path field violations (validation or store constraint failures)
    pub fn with_errors(mut self, errors: Vec<FieldViolation>) -> Self {
        self.errors = errors;
        self
    }

    pub fn kind(&self) -> PtErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn post_type(&self) -> Option<&str> {
        self.post_type.as_deref()
    }

    pub fn record_id(&self) -> Option<&str> {
        self.record_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn errors(&self) -> &[FieldViolation] {
        &self.errors
    }
}

impl std::fmt::Display for PtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(post_type) = &self.post_type {
            write!(f, " (post_type: {})", post_type)?;
        }
        if let Some(record_id) = &self.record_id {
            write!(f, " (record_id: {})", record_id)?;
        }
        if !self.errors.is_empty() {
            let paths: Vec<&str> = self.errors.iter().map(|e| e.path.as_str()).collect();
            write!(f, " [{}]", paths.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for PtError {}

// ========== End Error Facility ==========

/// Domain error taxonomy for registration and record handling
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PostTypeError {
    /// Target record does not exist
    #[error("{post_type} record not found: {record_id}")]
    RecordNotFound {
        post_type: String,
        record_id: String,
    },

    /// Caller may not perform the operation
    #[error("Access denied for operation {op}")]
    AccessDenied { op: String },

    /// Configured status thresholds are not strictly increasing
    #[error("Status thresholds must be strictly increasing: {lower}={lower_value} is not below {upper}={upper_value}")]
    StatusOrderViolation {
        lower: String,
        lower_value: i64,
        upper: String,
        upper_value: i64,
    },

    /// A field pattern failed to compile
    #[error("Invalid pattern for field {path}: {reason}")]
    InvalidPattern { path: String, reason: String },

    /// Schema definition nests deeper than the supported limit
    #[error("Schema for field {path} exceeds the maximum depth of {max_depth}")]
    SchemaTooDeep { path: String, max_depth: usize },

    /// Schema definition is structurally invalid
    #[error("Invalid schema at {path}: {reason}")]
    InvalidSchema { path: String, reason: String },

    /// No post type registered under this name
    #[error("Unknown post type: {name}")]
    UnknownPostType { name: String },

    /// A post type with this name is already registered
    #[error("Post type already registered: {name}")]
    DuplicatePostType { name: String },

    /// A message override names a key that does not exist
    #[error("Unknown message key: {key}")]
    UnknownMessageKey { key: String },

    /// A stored or supplied value is not a usable record
    #[error("Invalid record: {reason}")]
    InvalidRecord { reason: String },

    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<PostTypeError> for PtError {
    fn from(err: PostTypeError) -> Self {
        let message = err.to_string();
        match err {
            PostTypeError::RecordNotFound {
                post_type,
                record_id,
            } => PtError::new(PtErrorKind::NotFound)
                .with_post_type(post_type)
                .with_record_id(record_id)
                .with_message(message),

            PostTypeError::AccessDenied { op } => PtError::new(PtErrorKind::AccessDenied)
                .with_op(op)
                .with_message(message),

            PostTypeError::StatusOrderViolation { .. }
            | PostTypeError::InvalidPattern { .. }
            | PostTypeError::SchemaTooDeep { .. }
            | PostTypeError::InvalidSchema { .. }
            | PostTypeError::UnknownMessageKey { .. } => {
                PtError::new(PtErrorKind::ConfigurationInvariant)
                    .with_op("register_post_type")
                    .with_message(message)
            }

            PostTypeError::UnknownPostType { name } => PtError::new(PtErrorKind::NotFound)
                .with_post_type(name)
                .with_message(message),

            PostTypeError::DuplicatePostType { name } => {
                PtError::new(PtErrorKind::AlreadyExists)
                    .with_op("register_post_type")
                    .with_post_type(name)
                    .with_message(message)
            }

            PostTypeError::InvalidRecord { .. } => {
                PtError::new(PtErrorKind::InvalidInput).with_message(message)
            }

            PostTypeError::Serialization { .. } => {
                PtError::new(PtErrorKind::Serialization).with_message(message)
            }

            PostTypeError::Internal { .. } => {
                PtError::new(PtErrorKind::Internal).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for PostTypeError {
    fn from(err: serde_json::Error) -> Self {
        PostTypeError::Serialization {
            message: err.to_string(),
        }
    }
}
