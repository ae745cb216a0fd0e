use std::sync::Arc;

use crate::config::custody::custody_config;
use crate::config::store::{redis_url, store_backend, StoreBackend};
use crate::config::tunables::Tunables;
use crate::custody::{HttpCustodyClient, SharedCustody};
use crate::error::AppError;
use crate::services::questions::{SharedQuestionSource, StaticQuestionBank};
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;
use crate::store::memory::MemoryStore;
use crate::store::redis::RedisStore;
use crate::store::SharedStore;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    security_config: SecurityConfig,
    from_env: bool,
    store: Option<SharedStore>,
    tunables: Option<Tunables>,
    custody: Option<SharedCustody>,
    default_collection: Option<String>,
    questions: Option<SharedQuestionSource>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security_config: SecurityConfig::default(),
            from_env: false,
            store: None,
            tunables: None,
            custody: None,
            default_collection: None,
            questions: None,
        }
    }

    /// Resolve store backend, tunables and custody from the environment.
    /// Explicit `with_*` values still win over what the environment says.
    pub fn with_env(mut self) -> Self {
        self.from_env = true;
        self
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = security_config;
        self
    }

    pub fn with_store(mut self, store: SharedStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_tunables(mut self, tunables: Tunables) -> Self {
        self.tunables = Some(tunables);
        self
    }

    pub fn with_custody(mut self, custody: SharedCustody) -> Self {
        self.custody = Some(custody);
        self
    }

    pub fn with_default_collection(mut self, collection: impl Into<String>) -> Self {
        self.default_collection = Some(collection.into());
        self
    }

    pub fn with_questions(mut self, questions: SharedQuestionSource) -> Self {
        self.questions = Some(questions);
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let store = match self.store {
            Some(store) => store,
            None if self.from_env => match store_backend()? {
                StoreBackend::Redis => {
                    let url = redis_url()?;
                    Arc::new(RedisStore::connect(&url).await?) as SharedStore
                }
                StoreBackend::Memory => Arc::new(MemoryStore::new()) as SharedStore,
            },
            None => Arc::new(MemoryStore::new()) as SharedStore,
        };

        let tunables = match self.tunables {
            Some(tunables) => tunables,
            None if self.from_env => Tunables::from_env()?,
            None => Tunables::default(),
        };

        let (custody, default_collection) = match (self.custody, self.default_collection) {
            (Some(custody), collection) => (Some(custody), collection),
            (None, collection) if self.from_env => match custody_config()? {
                Some(config) => {
                    let client: SharedCustody =
                        Arc::new(HttpCustodyClient::new(config.api_url, config.api_key)?);
                    (Some(client), collection.or(config.collection_id))
                }
                None => (None, collection),
            },
            (None, collection) => (None, collection),
        };

        let questions = self
            .questions
            .unwrap_or_else(|| Arc::new(StaticQuestionBank::builtin()) as SharedQuestionSource);

        Ok(AppState::new(
            store,
            self.security_config,
            tunables,
            custody,
            default_collection,
            questions,
        ))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
