//! Registry of live SSE channels.
//!
//! Every open channel registers a [`CancellationToken`] here under a fresh
//! id. Teardown is exactly-once by construction: cancelling a token is
//! idempotent, and the `DashMap::remove` inside [`StreamRegistry::deregister`]
//! has a single winner no matter how many paths race to clean up.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

use crate::domain::Rarity;

/// What a channel is watching, kept for shutdown logging.
#[derive(Debug, Clone)]
pub enum ChannelKind {
    Match { match_id: String, user_id: String },
    Automatch { rarity: Rarity, user_id: String },
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Match { match_id, user_id } => write!(f, "match {match_id} for {user_id}"),
            Self::Automatch { rarity, user_id } => write!(f, "automatch {rarity} for {user_id}"),
        }
    }
}

struct ChannelHandle {
    kind: ChannelKind,
    token: CancellationToken,
}

/// Shared, clonable handle map. Owned by `AppState`; dropped with it.
#[derive(Clone, Default)]
pub struct StreamRegistry {
    channels: Arc<DashMap<Uuid, ChannelHandle>>,
}

impl StreamRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new channel and hand back its id and cancel token.
    pub fn register(&self, kind: ChannelKind) -> (Uuid, CancellationToken) {
        let id = Uuid::new_v4();
        let token = CancellationToken::new();
        debug!(channel = %id, kind = %kind, "stream channel registered");
        self.channels.insert(
            id,
            ChannelHandle {
                kind,
                token: token.clone(),
            },
        );
        (id, token)
    }

    /// Cancel and forget a channel. True only for the caller that actually
    /// removed it; later calls see nothing and do nothing.
    pub fn deregister(&self, id: Uuid) -> bool {
        match self.channels.remove(&id) {
            Some((_, handle)) => {
                handle.token.cancel();
                debug!(channel = %id, kind = %handle.kind, "stream channel deregistered");
                true
            }
            None => false,
        }
    }

    /// Cancel every live channel. Each poll task then deregisters itself.
    pub fn cancel_all(&self) {
        for entry in self.channels.iter() {
            entry.value().token.cancel();
        }
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}
