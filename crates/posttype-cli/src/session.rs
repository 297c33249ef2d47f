//! Opened store, operations and resolved caller for one invocation

use posttype_core::errors::{PtError, PtErrorKind};
use posttype_core::{Command, FindFilter, PostTypeRegistry, Record, RecordStore};
use posttype_core_types::RequestContext;
use posttype_engine::{CommandResult, Operations};
use posttype_store::SqliteRecordStore;
use std::sync::Arc;

use crate::config::AppConfig;

pub struct Session {
    pub ops: Operations,
    pub ctx: RequestContext,
    pub caller: Option<Record>,
}

impl Session {
    /// Open the configured database and resolve `caller_id` to its account
    ///
    /// # Errors
    ///
    /// Registry or store failures, `ConfigurationInvariant` when a caller is
    /// given without an account type, `NotFound` for an unknown caller.
    pub async fn open(config: &AppConfig, caller_id: Option<&str>) -> Result<Self, PtError> {
        let registry = Arc::new(config.registry()?);

        let mut store = SqliteRecordStore::open(&config.database)?;
        for (name, entry) in &config.post_types {
            for field in &entry.unique {
                store = store.with_unique(name, field);
            }
        }
        let store: Arc<dyn RecordStore> = Arc::new(store);

        let mut ctx = RequestContext::new();
        let caller = match caller_id {
            Some(id) => {
                ctx = ctx.with_caller_id(id);
                Some(resolve_caller(&registry, store.as_ref(), id).await?)
            }
            None => None,
        };
        tracing::debug!(
            database = %config.database.display(),
            caller_id = ctx.caller_label(),
            "session opened"
        );

        Ok(Self {
            ops: Operations::new(registry, store),
            ctx,
            caller,
        })
    }

    /// # Errors
    ///
    /// See [`Operations::apply`].
    pub async fn apply(&self, cmd: Command) -> Result<CommandResult, PtError> {
        self.ops.apply(&self.ctx, self.caller.as_ref(), cmd).await
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.ops.store()
    }

    /// # Errors
    ///
    /// `ConfigurationInvariant` when no account type is configured.
    pub fn account_type(&self) -> Result<&str, PtError> {
        self.ops.registry().account_type().ok_or_else(no_account_type)
    }
}

async fn resolve_caller(
    registry: &PostTypeRegistry,
    store: &dyn RecordStore,
    id: &str,
) -> Result<Record, PtError> {
    let account_type = registry.account_type().ok_or_else(no_account_type)?;
    store
        .find_one(account_type, &FindFilter::by_id(id))
        .await?
        .ok_or_else(|| {
            PtError::new(PtErrorKind::NotFound)
                .with_post_type(account_type)
                .with_record_id(id)
                .with_message(format!("no {} account '{}'", account_type, id))
        })
}

fn no_account_type() -> PtError {
    PtError::new(PtErrorKind::ConfigurationInvariant)
        .with_message("account_type must be configured to act as a caller")
}
