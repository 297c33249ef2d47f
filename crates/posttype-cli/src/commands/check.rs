//! Configuration check
//!
//! Usage: posttype check-config
//!
//! Registers every configured post type without touching the database and
//! prints what was understood.

use serde_json::{json, Map};

use super::{print_json, CliResult};
use crate::config::AppConfig;

pub fn execute(config: &AppConfig) -> CliResult {
    let registry = config.registry()?;

    let mut post_types = Map::new();
    for name in registry.names() {
        let post_type = registry.get(name)?;
        let per_page = post_type.config().per_page;
        post_types.insert(
            name.to_string(),
            json!({
                "statusField": post_type.status().status_field(),
                "statuses": post_type.status().values(),
                "perPage": {"default": per_page.default, "limit": per_page.limit},
                "masterCode": post_type.config().master_code.is_some(),
                "messages": post_type.messages(),
            }),
        );
    }

    print_json(&json!({
        "database": config.database.display().to_string(),
        "accountType": registry.account_type(),
        "postTypes": post_types,
    }))
}
