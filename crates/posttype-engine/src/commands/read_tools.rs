//! Read-one, read-many and status summaries
//!
//! Reads never fail on visibility: records the caller may not see in full
//! come back redacted. Read-many additionally restricts which status
//! ranges a caller may list.

use posttype_core::errors::{FieldViolation, PtError};
use posttype_core::model::Record;
use posttype_core::policy::ListAccess;
use posttype_core::status::StatusSummary;
use posttype_core::store::{FindFilter, Page, PageRequest};
use posttype_core::{ListRequest, PostType};
use posttype_core_types::RequestContext;
use serde_json::Value;

use super::operations::{access_denied, Operations};

impl Operations {
    /// Fetch one record, redacted for `caller`
    ///
    /// # Errors
    ///
    /// Unknown post type or a store failure. A missing record is `Ok(None)`.
    pub async fn read_one(
        &self,
        ctx: &RequestContext,
        post_type: &str,
        caller: Option<&Record>,
        id: &str,
    ) -> Result<Option<Value>, PtError> {
        self.boundary(ctx, "read_one", post_type, Some(id), async {
            let post_type = self.post_type(post_type)?;
            let found = self
                .store
                .find_one(post_type.name(), &FindFilter::by_id(id))
                .await?;
            match found {
                Some(record) => Ok(Some(self.render(&post_type, caller, &record).await?)),
                None => Ok(None),
            }
        })
        .await
    }

    /// List one page of records, each redacted for `caller`
    ///
    /// # Errors
    ///
    /// `AccessDenied` when the requested scope is outside what the list
    /// policy grants the caller.
    pub async fn read_many(
        &self,
        ctx: &RequestContext,
        post_type: &str,
        caller: Option<&Record>,
        request: &ListRequest,
    ) -> Result<Page<Value>, PtError> {
        self.boundary(ctx, "read_many", post_type, None, async {
            let post_type = self.post_type(post_type)?;
            self.list(&post_type, caller, request).await
        })
        .await
    }

    async fn list(
        &self,
        post_type: &PostType,
        caller: Option<&Record>,
        request: &ListRequest,
    ) -> Result<Page<Value>, PtError> {
        let status = post_type.status();
        let access = ListAccess {
            is_admin: self
                .auth_context(post_type, caller, None, None)
                .editor_is_admin,
            is_own: matches!(
                (caller, request.author.as_deref()),
                (Some(c), Some(author)) if c.id() == author
            ),
        };

        let scope = request
            .scope
            .unwrap_or_else(|| self.policy.default_scope(&access));
        if !self.policy.allows(&access, scope) {
            return Err(access_denied(post_type)
                .with_errors(vec![FieldViolation::new(
                    "scope",
                    format!("{} not permitted", scope.as_str()),
                )]));
        }

        let mut filter = FindFilter::default();
        if let Some(author) = &request.author {
            filter = filter.with_author(author.clone());
        }
        if let Some(range) = scope.range(status.values()) {
            filter = filter.with_status(status.status_field(), range);
        }
        let page = PageRequest::new(
            request.page.unwrap_or(1),
            post_type.config().per_page.resolve(request.per_page),
        );

        let found = self
            .store
            .find_many(post_type.name(), &filter, &page)
            .await?;
        tracing::debug!(
            post_type = post_type.name(),
            scope = scope.as_str(),
            item_count = found.page_info.item_count,
            "records listed"
        );

        let mut items = Vec::with_capacity(found.items.len());
        for record in &found.items {
            items.push(self.render(post_type, caller, record).await?);
        }
        Ok(Page {
            items,
            page_info: found.page_info,
        })
    }

    /// Status name and the moderation actions that apply to record `id`
    ///
    /// # Errors
    ///
    /// `NotFound` with the post type's text when there is no such record.
    pub async fn status_summary(
        &self,
        ctx: &RequestContext,
        post_type: &str,
        id: &str,
    ) -> Result<StatusSummary, PtError> {
        self.boundary(ctx, "status_summary", post_type, Some(id), async {
            let post_type = self.post_type(post_type)?;
            let record = self.load_target(&post_type, id).await?;
            Ok(post_type.summary(Some(&record)))
        })
        .await
    }
}
