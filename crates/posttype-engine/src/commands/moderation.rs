//! Delete, approve, feature, unfeature and ban
//!
//! Each operation loads the target, checks its precondition against the
//! caller's roles and the current status, applies one transition and saves
//! the record without re-validating its other fields.

use posttype_core::errors::PtError;
use posttype_core::model::Record;
use posttype_core::{AuthContext, PostType, Transition};
use posttype_core_types::RequestContext;
use serde_json::{json, Value};

use super::operations::{access_denied, Operations};
use super::response::MutationResponse;

impl Operations {
    /// Soft-delete; authors and admins, never on featured records
    pub async fn delete(
        &self,
        ctx: &RequestContext,
        post_type: &str,
        caller: Option<&Record>,
        id: &str,
    ) -> MutationResponse {
        self.moderate(ctx, "delete", post_type, caller, id, Transition::Delete, |pt, auth, cur| {
            let status = pt.status();
            auth.editor_is_author_or_admin
                && (auth.editor_is_admin || !status.is_banned(cur))
                && !status.is_featured(cur)
        })
        .await
    }

    pub async fn approve(
        &self,
        ctx: &RequestContext,
        post_type: &str,
        caller: Option<&Record>,
        id: &str,
    ) -> MutationResponse {
        self.moderate(ctx, "approve", post_type, caller, id, Transition::Approve, |pt, auth, cur| {
            auth.editor_is_admin && !pt.status().is_featured(cur)
        })
        .await
    }

    /// Promote an approved record; needs the post type's master code
    pub async fn feature(
        &self,
        ctx: &RequestContext,
        post_type: &str,
        caller: Option<&Record>,
        id: &str,
        master_code: Option<&str>,
    ) -> MutationResponse {
        self.moderate(ctx, "feature", post_type, caller, id, Transition::Feature, |pt, auth, cur| {
            auth.editor_is_admin
                && pt.status().is_approved(cur)
                && pt.config().master_code_matches(master_code)
        })
        .await
    }

    pub async fn unfeature(
        &self,
        ctx: &RequestContext,
        post_type: &str,
        caller: Option<&Record>,
        id: &str,
        master_code: Option<&str>,
    ) -> MutationResponse {
        self.moderate(
            ctx,
            "unfeature",
            post_type,
            caller,
            id,
            Transition::RemoveFeatured,
            |pt, auth, cur| {
                auth.editor_is_admin
                    && pt.status().is_featured(cur)
                    && pt.config().master_code_matches(master_code)
            },
        )
        .await
    }

    pub async fn ban(
        &self,
        ctx: &RequestContext,
        post_type: &str,
        caller: Option<&Record>,
        id: &str,
    ) -> MutationResponse {
        self.moderate(ctx, "ban", post_type, caller, id, Transition::Ban, |pt, auth, cur| {
            auth.editor_is_admin && !pt.status().is_featured(cur)
        })
        .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn moderate<G>(
        &self,
        ctx: &RequestContext,
        op: &'static str,
        post_type: &str,
        caller: Option<&Record>,
        id: &str,
        transition: Transition,
        guard: G,
    ) -> MutationResponse
    where
        G: Fn(&PostType, &AuthContext, i64) -> bool,
    {
        self.boundary(ctx, op, post_type, Some(id), async {
            let post_type = self.post_type(post_type)?;
            self.transition_record(&post_type, caller, id, transition, guard)
                .await
        })
        .await
        .into()
    }

    async fn transition_record<G>(
        &self,
        post_type: &PostType,
        caller: Option<&Record>,
        id: &str,
        transition: Transition,
        guard: G,
    ) -> Result<Value, PtError>
    where
        G: Fn(&PostType, &AuthContext, i64) -> bool,
    {
        let mut record = self.load_target(post_type, id).await?;
        let auth = self.auth_for(post_type, caller, &record).await?;
        let status = post_type.status();
        let current = status.current_status(&record);

        if !guard(post_type, &auth, current) {
            return Err(access_denied(post_type));
        }

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

        self.persist(post_type, &auth, &mut record).await
    }
}
