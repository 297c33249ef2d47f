//! Per-operation authorization context
//!
//! Derived from the caller account, the target record and the author's
//! status. Kept apart from `Record`; nothing here is written back.

use crate::model::Record;
use crate::status::StatusManager;

/// Relationship of the caller to one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub editor_is_author: bool,
    pub editor_is_admin: bool,
    pub editor_is_author_or_admin: bool,
    pub editor_is_not_deleted: bool,
    pub editor_is_validated: bool,
    pub author_is_not_deleted: bool,
}

impl AuthContext {
    /// Compute the context for `editor` acting on `record`
    ///
    /// `accounts` is the status manager of the account type: the editor's
    /// status is read from its status field, and both editor and author
    /// statuses are judged by its thresholds. `author_status` is the status
    /// of the record's author account, or `None` when there is no author to
    /// gate on.
    pub fn build(
        accounts: &StatusManager,
        editor: Option<&Record>,
        record: Option<&Record>,
        author_status: Option<i64>,
    ) -> Self {
        let editor_status = editor.map(|e| accounts.current_status(e));
        let editor_is_author = match (editor, record.and_then(Record::author)) {
            (Some(editor), Some(author)) => editor.id() == author,
            _ => false,
        };
        let editor_is_admin = editor_status.is_some_and(|s| accounts.is_featured(s));

        Self {
            editor_is_author,
            editor_is_admin,
            editor_is_author_or_admin: editor_is_author || editor_is_admin,
            editor_is_not_deleted: editor_status.is_some_and(|s| accounts.is_not_deleted(s)),
            editor_is_validated: editor_status.is_some_and(|s| accounts.is_validated(s)),
            author_is_not_deleted: author_status.map_or(true, |s| accounts.is_not_deleted(s)),
        }
    }

    /// Anonymous caller, record author in good standing
    pub fn anonymous() -> Self {
        Self {
            editor_is_author: false,
            editor_is_admin: false,
            editor_is_author_or_admin: false,
            editor_is_not_deleted: false,
            editor_is_validated: false,
            author_is_not_deleted: true,
        }
    }
}
