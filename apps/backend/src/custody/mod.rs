//! Custody integration for stake settlement.
//!
//! Transfers of staked tokens are executed by an external custody service
//! that holds the wallets. The orchestration layer talks to it through
//! [`CustodyClient`], so tests can substitute a scripted client and the
//! HTTP transport stays in one place.

pub mod client;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use client::HttpCustodyClient;

/// One token movement between two wallets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub from_wallet: String,
    pub to_wallet: String,
    pub collection: String,
    pub token_id: u64,
}

/// Acknowledgement from the custody service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferReceipt {
    /// Custody-side identifier for the submitted transfer, when provided.
    pub submission_id: Option<String>,
}

/// Failure modes of a custody call, split by whether retrying can help.
#[derive(Debug, Error)]
pub enum CustodyError {
    /// The request never completed (connect failure, timeout, bad response
    /// framing).
    #[error("custody transport error: {0}")]
    Transport(String),
    /// The service answered but is temporarily unable to act (429, 5xx).
    #[error("custody service unavailable: {0}")]
    Unavailable(String),
    /// The service rejected the transfer outright. Retrying the same
    /// request will not change the outcome.
    #[error("custody rejected transfer: {0}")]
    Rejected(String),
}

impl CustodyError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Unavailable(_))
    }
}

#[async_trait]
pub trait CustodyClient: Send + Sync {
    /// Submit one transfer for execution. Implementations must not retry
    /// internally; the orchestrator owns the retry budget.
    async fn transfer(&self, request: &TransferRequest) -> Result<TransferReceipt, CustodyError>;
}

pub type SharedCustody = Arc<dyn CustodyClient>;
