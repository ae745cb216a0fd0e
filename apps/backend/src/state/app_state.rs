use super::security_config::SecurityConfig;
use crate::config::tunables::Tunables;
use crate::custody::SharedCustody;
use crate::domain::now_unix_ms;
use crate::realtime::StreamRegistry;
use crate::services::questions::SharedQuestionSource;
use crate::store::SharedStore;

/// Application state containing shared resources.
///
/// Cloned per worker by actix; every field is either `Copy`-cheap or an
/// `Arc` handle, so clones are shallow.
#[derive(Clone)]
pub struct AppState {
    /// State store holding matches, queues and transfer panels
    pub store: SharedStore,
    /// Security configuration including JWT settings
    pub security: SecurityConfig,
    /// Timing knobs for match flow and streams
    pub tunables: Tunables,
    /// Custody client for stake settlement (absent when not configured)
    pub custody: Option<SharedCustody>,
    /// Collection assumed for staked assets that do not name one
    pub default_collection: Option<String>,
    /// Source of trivia questions for new matches
    pub questions: SharedQuestionSource,
    /// Live SSE channels, cancelled together on shutdown
    pub streams: StreamRegistry,
    /// Unix millis at process start, reported by the health endpoint
    pub started_at: i64,
}

impl AppState {
    pub fn new(
        store: SharedStore,
        security: SecurityConfig,
        tunables: Tunables,
        custody: Option<SharedCustody>,
        default_collection: Option<String>,
        questions: SharedQuestionSource,
    ) -> Self {
        Self {
            store,
            security,
            tunables,
            custody,
            default_collection,
            questions,
            streams: StreamRegistry::new(),
            started_at: now_unix_ms(),
        }
    }
}
