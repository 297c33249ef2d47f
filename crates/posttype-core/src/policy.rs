//! Read-many scope policy
//!
//! Non-admin callers may only list records within whitelisted status
//! ranges. The policy is injected into the operation layer so embedders
//! can widen or narrow the whitelist.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::status::StatusValues;
use crate::store::StatusRange;

/// Named status range for read-many
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListScope {
    Featured,
    Approved,
    Validated,
    NotDeleted,
    Deleted,
    Banned,
    All,
}

impl ListScope {
    pub fn range(&self, values: &StatusValues) -> Option<StatusRange> {
        match self {
            ListScope::Featured => Some(StatusRange::at_least(values.featured)),
            ListScope::Approved => Some(StatusRange::at_least(values.approved)),
            ListScope::Validated => Some(StatusRange::at_least(values.data_complete)),
            ListScope::NotDeleted => Some(StatusRange::at_least(values.created)),
            ListScope::Deleted => Some(StatusRange::between(values.deleted, values.created)),
            ListScope::Banned => Some(StatusRange::below(values.deleted)),
            ListScope::All => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ListScope::Featured => "featured",
            ListScope::Approved => "approved",
            ListScope::Validated => "validated",
            ListScope::NotDeleted => "notDeleted",
            ListScope::Deleted => "deleted",
            ListScope::Banned => "banned",
            ListScope::All => "all",
        }
    }
}

impl FromStr for ListScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "featured" => Ok(ListScope::Featured),
            "approved" => Ok(ListScope::Approved),
            "validated" => Ok(ListScope::Validated),
            "notDeleted" | "not-deleted" => Ok(ListScope::NotDeleted),
            "deleted" => Ok(ListScope::Deleted),
            "banned" => Ok(ListScope::Banned),
            "all" => Ok(ListScope::All),
            other => Err(format!("unknown list scope: {}", other)),
        }
    }
}

/// Who is listing, relative to the requested records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListAccess {
    pub is_admin: bool,
    /// The caller restricted the listing to their own records
    pub is_own: bool,
}

/// Decides which scopes a caller may list
pub trait ListPolicy: Send + Sync {
    fn allows(&self, access: &ListAccess, scope: ListScope) -> bool;

    /// Scope used when the request names none
    fn default_scope(&self, access: &ListAccess) -> ListScope;
}

/// Anonymous and other callers: featured and approved. Own records add
/// validated, not-deleted and deleted. Admins: everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultListPolicy;

impl DefaultListPolicy {
    const PUBLIC: [ListScope; 2] = [ListScope::Featured, ListScope::Approved];
    const OWN: [ListScope; 3] = [
        ListScope::Validated,
        ListScope::NotDeleted,
        ListScope::Deleted,
    ];
}

impl ListPolicy for DefaultListPolicy {
    fn allows(&self, access: &ListAccess, scope: ListScope) -> bool {
        access.is_admin
            || Self::PUBLIC.contains(&scope)
            || (access.is_own && Self::OWN.contains(&scope))
    }

    fn default_scope(&self, access: &ListAccess) -> ListScope {
        if access.is_admin {
            ListScope::All
        } else {
            ListScope::Approved
        }
    }
}

/// Lets everyone list everything (trusted tooling and tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAllListPolicy;

impl ListPolicy for AllowAllListPolicy {
    fn allows(&self, _: &ListAccess, _: ListScope) -> bool {
        true
    }

    fn default_scope(&self, _: &ListAccess) -> ListScope {
        ListScope::All
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANON: ListAccess = ListAccess {
        is_admin: false,
        is_own: false,
    };
    const OWNER: ListAccess = ListAccess {
        is_admin: false,
        is_own: true,
    };
    const ADMIN: ListAccess = ListAccess {
        is_admin: true,
        is_own: false,
    };

    #[test]
    fn test_default_policy_whitelists() {
        let policy = DefaultListPolicy;
        assert!(policy.allows(&ANON, ListScope::Approved));
        assert!(policy.allows(&ANON, ListScope::Featured));
        assert!(!policy.allows(&ANON, ListScope::Deleted));
        assert!(!policy.allows(&ANON, ListScope::All));

        assert!(policy.allows(&OWNER, ListScope::Deleted));
        assert!(policy.allows(&OWNER, ListScope::Validated));
        assert!(!policy.allows(&OWNER, ListScope::Banned));
        assert!(!policy.allows(&OWNER, ListScope::All));

        assert!(policy.allows(&ADMIN, ListScope::Banned));
        assert!(policy.allows(&ADMIN, ListScope::All));
    }

    #[test]
    fn test_default_scopes() {
        assert_eq!(DefaultListPolicy.default_scope(&ANON), ListScope::Approved);
        assert_eq!(DefaultListPolicy.default_scope(&ADMIN), ListScope::All);
    }

    #[test]
    fn test_ranges() {
        let values = StatusValues::default();
        let deleted = ListScope::Deleted.range(&values).unwrap();
        assert!(deleted.contains(30));
        assert!(!deleted.contains(40));
        assert!(ListScope::Banned.range(&values).unwrap().contains(20));
        assert!(ListScope::All.range(&values).is_none());
    }

    #[test]
    fn test_parse_round_trips_names() {
        for scope in [
            ListScope::Featured,
            ListScope::Approved,
            ListScope::Validated,
            ListScope::NotDeleted,
            ListScope::Deleted,
            ListScope::Banned,
            ListScope::All,
        ] {
            assert_eq!(scope.as_str().parse::<ListScope>(), Ok(scope));
        }
        assert!("everything".parse::<ListScope>().is_err());
    }
}
