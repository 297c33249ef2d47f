//! The `Operations` facade and the steps every operation shares.

use posttype_core::errors::{PtError, PtErrorKind};
use posttype_core::filter::{filter_output, InputFilterResult};
use posttype_core::model::Record;
use posttype_core::policy::{DefaultListPolicy, ListPolicy};
use posttype_core::status::StatusManager;
use posttype_core::store::{FindFilter, RecordStore};
use posttype_core::{log_op_end, log_op_error, log_op_start, AuthContext, PostType, PostTypeRegistry};
use posttype_core_types::RequestContext;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

/// Entry point for every operation on every registered post type
///
/// Holds no mutable state; clone the `Arc`s freely and share one instance
/// across tasks.
#[derive(Clone)]
pub struct Operations {
    pub(crate) registry: Arc<PostTypeRegistry>,
    pub(crate) store: Arc<dyn RecordStore>,
    pub(crate) policy: Arc<dyn ListPolicy>,
}

impl std::fmt::Debug for Operations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operations")
            .field("post_types", &self.registry.names())
            .finish_non_exhaustive()
    }
}

impl Operations {
    /// Operations with the default read-many whitelist
    pub fn new(registry: Arc<PostTypeRegistry>, store: Arc<dyn RecordStore>) -> Self {
        Self {
            registry,
            store,
            policy: Arc::new(DefaultListPolicy),
        }
    }

    pub fn with_policy(mut self, policy: Arc<dyn ListPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn registry(&self) -> &PostTypeRegistry {
        &self.registry
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    pub(crate) fn post_type(&self, name: &str) -> Result<Arc<PostType>, PtError> {
        self.registry.get(name).map_err(PtError::from)
    }

    /// Fetch the target record or fail with the post type's not-found text
    pub(crate) async fn load_target(
        &self,
        post_type: &PostType,
        id: &str,
    ) -> Result<Record, PtError> {
        self.store
            .find_one(post_type.name(), &FindFilter::by_id(id))
            .await?
            .ok_or_else(|| {
                PtError::new(PtErrorKind::NotFound)
                    .with_record_id(id)
                    .with_message(post_type.messages().not_found.clone())
            })
    }

    /// Status of the account that authored `record`
    ///
    /// The caller's own account when they wrote it, otherwise the account
    /// looked up in the store, otherwise the `_authorStatus` snapshot taken
    /// at creation. `None` when there is no author to gate on.
    pub(crate) async fn author_status(
        &self,
        post_type: &PostType,
        caller: Option<&Record>,
        record: &Record,
    ) -> Result<Option<i64>, PtError> {
        let Some(author) = record.author() else {
            return Ok(None);
        };
        if let Some(caller) = caller.filter(|c| c.id() == author) {
            return Ok(Some(self.account_status(post_type, caller)));
        }
        if let Some(account_type) = self.registry.account_type() {
            let account = self
                .store
                .find_one(account_type, &FindFilter::by_id(author))
                .await?;
            if let Some(account) = account {
                return Ok(Some(self.account_status(post_type, &account)));
            }
        }
        Ok(record.author_status())
    }

    /// The registered account type, if any
    pub(crate) fn account_type(&self) -> Option<Arc<PostType>> {
        self.registry
            .account_type()
            .and_then(|name| self.registry.get(name).ok())
    }

    /// Status of an account record, read with the account type's status
    /// field when one is registered
    pub(crate) fn account_status(&self, post_type: &PostType, account: &Record) -> i64 {
        let accounts = self.account_type();
        account_manager(accounts.as_deref(), post_type).current_status(account)
    }

    /// Authorization context judged by the account type's thresholds
    pub(crate) fn auth_context(
        &self,
        post_type: &PostType,
        caller: Option<&Record>,
        record: Option<&Record>,
        author_status: Option<i64>,
    ) -> AuthContext {
        let accounts = self.account_type();
        AuthContext::build(
            account_manager(accounts.as_deref(), post_type),
            caller,
            record,
            author_status,
        )
    }

    pub(crate) async fn auth_for(
        &self,
        post_type: &PostType,
        caller: Option<&Record>,
        record: &Record,
    ) -> Result<AuthContext, PtError> {
        let author_status = self.author_status(post_type, caller, record).await?;
        Ok(self.auth_context(post_type, caller, Some(record), author_status))
    }

    /// Redact `record` for `caller`
    pub(crate) async fn render(
        &self,
        post_type: &PostType,
        caller: Option<&Record>,
        record: &Record,
    ) -> Result<Value, PtError> {
        let auth = self.auth_for(post_type, caller, record).await?;
        Ok(redact(post_type, &auth, record))
    }

    /// Save and redact with the context the operation already computed,
    /// mapping store failures onto the save-failed text
    ///
    /// The status field is written back as an integer so that stored
    /// records always match status-range listings.
    pub(crate) async fn persist(
        &self,
        post_type: &PostType,
        auth: &AuthContext,
        record: &mut Record,
    ) -> Result<Value, PtError> {
        let status = post_type.status();
        let current = status.current_status(record);
        record.set(status.status_field(), json!(current));

        let saved = self
            .store
            .save(post_type.name(), record)
            .await
            .map_err(|err| {
                tracing::debug!(
                    post_type = post_type.name(),
                    record_id = record.id(),
                    error = %err,
                    "save rejected by store"
                );
                PtError::new(PtErrorKind::Persistence)
                    .with_record_id(record.id())
                    .with_message(post_type.messages().save_default_fail.clone())
                    .with_errors(err.errors().to_vec())
            })?;
        Ok(redact(post_type, auth, &saved))
    }

    /// Run `work` between a start event and an end or error event
    pub(crate) async fn boundary<T, F>(
        &self,
        ctx: &RequestContext,
        op: &'static str,
        post_type: &str,
        record_id: Option<&str>,
        work: F,
    ) -> Result<T, PtError>
    where
        F: Future<Output = Result<T, PtError>>,
    {
        let start = Instant::now();
        log_op_start!(
            op,
            post_type = post_type,
            record_id = record_id,
            request_id = ctx.request_id.as_str(),
            caller_id = ctx.caller_label()
        );

        let result = work.await.map_err(|err| {
            let mut err = err
                .with_op(op)
                .with_post_type(post_type)
                .with_request_id(ctx.request_id.clone());
            if let Some(trace_id) = &ctx.trace_id {
                err = err.with_trace_id(trace_id.clone());
            }
            if let Some(id) = record_id {
                err = err.with_record_id(id);
            }
            err
        });

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => {
                log_op_end!(
                    op,
                    duration_ms = duration_ms,
                    post_type = post_type,
                    record_id = record_id
                );
            }
            Err(err) => {
                log_op_error!(
                    op,
                    err.clone(),
                    duration_ms = duration_ms,
                    post_type = post_type,
                    record_id = record_id
                );
            }
        }
        result
    }
}

fn account_manager<'a>(accounts: Option<&'a PostType>, post_type: &'a PostType) -> &'a StatusManager {
    accounts.unwrap_or(post_type).status()
}

fn redact(post_type: &PostType, auth: &AuthContext, record: &Record) -> Value {
    Value::Object(filter_output(
        auth,
        record,
        post_type.schema(),
        post_type.status(),
    ))
}

/// Turn a filtered input into the sanitized fields or the error envelope
///
/// Denied writes fail first, then invalid values, then missing ones. A path
/// that is both missing and invalid counts as missing only.
pub(crate) fn accept_input(
    post_type: &PostType,
    result: InputFilterResult,
) -> Result<serde_json::Map<String, Value>, PtError> {
    let messages = post_type.messages();
    if result.is_denied() {
        return Err(PtError::new(PtErrorKind::AccessDenied)
            .with_message(messages.access_denied.clone())
            .with_errors(result.denied));
    }

    let errors = result.errors();
    let missing: HashSet<&str> = result.missing.iter().map(|v| v.path.as_str()).collect();
    let invalid_paths: Vec<&str> = result
        .invalid
        .iter()
        .map(|v| v.path.as_str())
        .filter(|path| !missing.contains(path))
        .collect();

    if !invalid_paths.is_empty() {
        return Err(PtError::new(PtErrorKind::InvalidField)
            .with_message(format!(
                "{} [{}]",
                messages.invalid_data,
                invalid_paths.join(", ")
            ))
            .with_errors(errors));
    }
    if !result.missing.is_empty() {
        let missing_paths: Vec<&str> = result.missing.iter().map(|v| v.path.as_str()).collect();
        return Err(PtError::new(PtErrorKind::MissingField)
            .with_message(format!(
                "{} [{}]",
                messages.missing_data,
                missing_paths.join(", ")
            ))
            .with_errors(errors));
    }

    Ok(result.record.unwrap_or_default())
}

/// AccessDenied with the post type's text
pub(crate) fn access_denied(post_type: &PostType) -> PtError {
    PtError::new(PtErrorKind::AccessDenied).with_message(post_type.messages().access_denied.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use posttype_core::errors::FieldViolation;
    use posttype_core::{FieldSchema, PostTypeConfig};

    fn post_type() -> PostType {
        PostType::new("post", PostTypeConfig::default(), FieldSchema::object(), None).unwrap()
    }

    #[test]
    fn test_accept_input_prefers_denied() {
        let result = InputFilterResult {
            record: Some(serde_json::Map::new()),
            missing: vec![FieldViolation::new("record.title", "required")],
            invalid: vec![],
            denied: vec![FieldViolation::new("record.audit", "access denied")],
        };
        let err = accept_input(&post_type(), result).unwrap_err();
        assert_eq!(err.kind(), PtErrorKind::AccessDenied);
        assert_eq!(err.errors()[0].path, "record.audit");
    }

    #[test]
    fn test_accept_input_invalid_before_missing() {
        let result = InputFilterResult {
            record: Some(serde_json::Map::new()),
            missing: vec![FieldViolation::new("record.title", "required")],
            invalid: vec![FieldViolation::new("record.age", "must be an integer")],
            denied: vec![],
        };
        let err = accept_input(&post_type(), result).unwrap_err();
        assert_eq!(err.kind(), PtErrorKind::InvalidField);
        assert_eq!(err.message(), "Invalid data [record.age]");
        assert_eq!(err.errors().len(), 2);
    }

    #[test]
    fn test_accept_input_missing_wins_on_same_path() {
        let result = InputFilterResult {
            record: Some(serde_json::Map::new()),
            missing: vec![FieldViolation::new("record.code", "required")],
            invalid: vec![FieldViolation::new("record.code", "must be a number")],
            denied: vec![],
        };
        let err = accept_input(&post_type(), result).unwrap_err();
        assert_eq!(err.kind(), PtErrorKind::MissingField);
        assert_eq!(err.message(), "Missing data [record.code]");
        assert_eq!(err.errors(), &[FieldViolation::new("record.code", "required")]);
    }
}
