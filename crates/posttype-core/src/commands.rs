//! Operation inventory
//!
//! One variant per supported operation. The operation layer dispatches on
//! this enum; transports build it from their own argument shapes.

use posttype_core_types::Sensitive;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::policy::ListScope;

/// Arguments of read-many
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListRequest {
    /// Only records of this author
    pub author: Option<String>,
    pub scope: Option<ListScope>,
    /// 1-based page number
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone)]
pub enum Command {
    Create {
        post_type: String,
        record: Option<Value>,
    },
    Update {
        post_type: String,
        id: String,
        record: Option<Value>,
    },
    Delete {
        post_type: String,
        id: String,
    },
    Approve {
        post_type: String,
        id: String,
    },
    Feature {
        post_type: String,
        id: String,
        master_code: Option<Sensitive<String>>,
    },
    Unfeature {
        post_type: String,
        id: String,
        master_code: Option<Sensitive<String>>,
    },
    Ban {
        post_type: String,
        id: String,
    },
    ReadOne {
        post_type: String,
        id: String,
    },
    ReadMany {
        post_type: String,
        request: ListRequest,
    },
}

impl Command {
    /// Operation name used in log events
    pub fn op(&self) -> &'static str {
        match self {
            Command::Create { .. } => "create",
            Command::Update { .. } => "update",
            Command::Delete { .. } => "delete",
            Command::Approve { .. } => "approve",
            Command::Feature { .. } => "feature",
            Command::Unfeature { .. } => "unfeature",
            Command::Ban { .. } => "ban",
            Command::ReadOne { .. } => "read_one",
            Command::ReadMany { .. } => "read_many",
        }
    }

    pub fn post_type(&self) -> &str {
        match self {
            Command::Create { post_type, .. }
            | Command::Update { post_type, .. }
            | Command::Delete { post_type, .. }
            | Command::Approve { post_type, .. }
            | Command::Feature { post_type, .. }
            | Command::Unfeature { post_type, .. }
            | Command::Ban { post_type, .. }
            | Command::ReadOne { post_type, .. }
            | Command::ReadMany { post_type, .. } => post_type,
        }
    }

    pub fn is_mutation(&self) -> bool {
        !matches!(self, Command::ReadOne { .. } | Command::ReadMany { .. })
    }
}
