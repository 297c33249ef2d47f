//! Create and update

use chrono::{SecondsFormat, Utc};
use posttype_core::errors::{PtError, PtErrorKind};
use posttype_core::filter::filter_input;
use posttype_core::model::record::{AUTHOR_FIELD, AUTHOR_STATUS_FIELD, CREATED_DATE_FIELD};
use posttype_core::model::Record;
use posttype_core::{PostType, Transition};
use posttype_core_types::RequestContext;
use serde_json::{json, Value};
use uuid::Uuid;

use super::operations::{accept_input, access_denied, Operations};
use super::response::MutationResponse;

impl Operations {
    /// Create a record authored by `caller`
    ///
    /// Only validated callers may create. The new record gets a fresh id,
    /// its creation date, the author's id and a snapshot of the author's
    /// status; its own status follows the `New` transition.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        post_type: &str,
        caller: Option<&Record>,
        input: Option<&Value>,
    ) -> MutationResponse {
        self.boundary(ctx, "create", post_type, None, async {
            let post_type = self.post_type(post_type)?;
            self.create_record(&post_type, caller, input).await
        })
        .await
        .into()
    }

    async fn create_record(
        &self,
        post_type: &PostType,
        caller: Option<&Record>,
        input: Option<&Value>,
    ) -> Result<Value, PtError> {
        let status = post_type.status();
        let validated = self
            .auth_context(post_type, caller, None, None)
            .editor_is_validated;
        let editor = match caller {
            Some(editor) if validated => editor,
            _ => {
                return Err(PtError::new(PtErrorKind::AccessDenied)
                    .with_message(post_type.messages().low_status_level.clone()))
            }
        };

        let author_status = self.account_status(post_type, editor);
        let mut record = Record::new(Uuid::now_v7().to_string());
        record.set(
            CREATED_DATE_FIELD,
            json!(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        record.set(AUTHOR_FIELD, json!(editor.id()));
        record.set(AUTHOR_STATUS_FIELD, json!(author_status));

        let auth = self.auth_context(
            post_type,
            Some(editor),
            Some(&record),
            Some(author_status),
        );
        let fields = accept_input(post_type, filter_input(&auth, input, post_type.schema()))?;
        record.merge(&fields);

        let next = status.next_status(Transition::New, &record);
        record.set(status.status_field(), json!(next));
        tracing::debug!(
            post_type = post_type.name(),
            record_id = record.id(),
            status_to = next,
            "status assigned"
        );

        self.persist(post_type, &auth, &mut record).await
    }

    /// Replace the writable fields of record `id`
    ///
    /// Authors may edit their own records unless banned or featured; admins
    /// may edit anything not featured by someone else. Editing a banned
    /// record as admin, or a deleted one, restores it. Featured records
    /// keep their status.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        post_type: &str,
        caller: Option<&Record>,
        id: &str,
        input: Option<&Value>,
    ) -> MutationResponse {
        self.boundary(ctx, "update", post_type, Some(id), async {
            let post_type = self.post_type(post_type)?;
            self.update_record(&post_type, caller, id, input).await
        })
        .await
        .into()
    }

    async fn update_record(
        &self,
        post_type: &PostType,
        caller: Option<&Record>,
        id: &str,
        input: Option<&Value>,
    ) -> Result<Value, PtError> {
        let target = self.load_target(post_type, id).await?;
        let auth = self.auth_for(post_type, caller, &target).await?;
        let status = post_type.status();
        let current = status.current_status(&target);
        let banned = status.is_banned(current);
        let featured = status.is_featured(current);

        let allowed = auth.editor_is_author_or_admin
            && (auth.editor_is_admin || !banned)
            && (!featured || auth.editor_is_author);
        if !allowed {
            return Err(access_denied(post_type));
        }

        let fields = accept_input(post_type, filter_input(&auth, input, post_type.schema()))?;
        let mut record = target;
        record.merge(&fields);

        let transition = if auth.editor_is_admin && banned {
            Some(Transition::RestoreByAdmin)
        } else if status.is_deleted(current) {
            Some(Transition::RestoreByAuthor)
        } else if !featured {
            Some(Transition::New)
        } else {
            None
        };
        if let Some(transition) = transition {
            let next = status.next_status(transition, &record);
            record.set(status.status_field(), json!(next));
            tracing::debug!(
                post_type = post_type.name(),
                record_id = id,
                transition = transition.name(),
                status_from = current,
                status_to = next,
                "status changed"
            );
        }

        self.persist(post_type, &auth, &mut record).await
    }
}
