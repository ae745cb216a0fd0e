//! Wire events pushed over SSE channels.
//!
//! Every frame carries a `type` discriminator and a unix-ms `timestamp`;
//! match-bearing events embed the full record under `match` so clients
//! never have to re-fetch after a push.

use serde::Serialize;

use crate::domain::{now_unix_ms, MatchRecord};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    Connected {
        timestamp: i64,
    },
    /// Full snapshot, sent once right after `connected` on match channels.
    MatchState {
        #[serde(rename = "match")]
        record: Box<MatchRecord>,
        timestamp: i64,
    },
    MatchUpdate {
        #[serde(rename = "match")]
        record: Box<MatchRecord>,
        timestamp: i64,
    },
    /// The record just reached FINISHED; the channel closes after a grace
    /// window so late transfer-panel updates still arrive.
    MatchFinished {
        #[serde(rename = "match")]
        record: Box<MatchRecord>,
        timestamp: i64,
    },
    MatchDeleted {
        timestamp: i64,
    },
    Queued {
        #[serde(rename = "queueSize")]
        queue_size: usize,
        timestamp: i64,
    },
    QueueUpdate {
        #[serde(rename = "queueSize")]
        queue_size: usize,
        timestamp: i64,
    },
    MatchFound {
        #[serde(rename = "match")]
        record: Box<MatchRecord>,
        timestamp: i64,
    },
    Timeout {
        message: String,
        timestamp: i64,
    },
    Error {
        message: String,
        timestamp: i64,
    },
}

impl StreamEvent {
    pub fn connected() -> Self {
        Self::Connected {
            timestamp: now_unix_ms(),
        }
    }

    pub fn match_state(record: MatchRecord) -> Self {
        Self::MatchState {
            record: Box::new(record),
            timestamp: now_unix_ms(),
        }
    }

    pub fn match_update(record: MatchRecord) -> Self {
        Self::MatchUpdate {
            record: Box::new(record),
            timestamp: now_unix_ms(),
        }
    }

    pub fn match_finished(record: MatchRecord) -> Self {
        Self::MatchFinished {
            record: Box::new(record),
            timestamp: now_unix_ms(),
        }
    }

    pub fn match_deleted() -> Self {
        Self::MatchDeleted {
            timestamp: now_unix_ms(),
        }
    }

    pub fn queued(queue_size: usize) -> Self {
        Self::Queued {
            queue_size,
            timestamp: now_unix_ms(),
        }
    }

    pub fn queue_update(queue_size: usize) -> Self {
        Self::QueueUpdate {
            queue_size,
            timestamp: now_unix_ms(),
        }
    }

    pub fn match_found(record: MatchRecord) -> Self {
        Self::MatchFound {
            record: Box::new(record),
            timestamp: now_unix_ms(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
            timestamp: now_unix_ms(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
            timestamp: now_unix_ms(),
        }
    }

    /// The wire value of the `type` discriminator.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connected { .. } => "connected",
            Self::MatchState { .. } => "match_state",
            Self::MatchUpdate { .. } => "match_update",
            Self::MatchFinished { .. } => "match_finished",
            Self::MatchDeleted { .. } => "match_deleted",
            Self::Queued { .. } => "queued",
            Self::QueueUpdate { .. } => "queue_update",
            Self::MatchFound { .. } => "match_found",
            Self::Timeout { .. } => "timeout",
            Self::Error { .. } => "error",
        }
    }
}
