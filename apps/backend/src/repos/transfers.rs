//! Transfer operation records over the state store.
//!
//! One record per executed transfer leg, stored under
//! `transfer:{matchId}:{slot}`. The per-player panels on the match record
//! are the authoritative gate; these records carry the durable execution
//! trail (addresses, custody submission id, last error).

use serde::{Deserialize, Serialize};

use crate::domain::{PlayerSlot, TransferState};
use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::store::{keys, SharedStore};

/// Durable record of one transfer leg's execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferOperation {
    pub id: String,
    pub match_id: String,
    pub from_slot: PlayerSlot,
    pub to_slot: PlayerSlot,
    pub token_id: String,
    pub from_address: String,
    pub to_address: String,
    pub status: TransferState,
    pub attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

pub async fn save(store: &SharedStore, op: &TransferOperation) -> Result<(), DomainError> {
    let payload = serde_json::to_string(op).map_err(|e| {
        DomainError::infra(
            InfraErrorKind::Other("encode".into()),
            format!("failed to encode transfer operation {}: {e}", op.id),
        )
    })?;
    store
        .set(&keys::transfer_operation(&op.match_id, op.from_slot), &payload)
        .await
}

pub async fn find(
    store: &SharedStore,
    match_id: &str,
    from_slot: PlayerSlot,
) -> Result<Option<TransferOperation>, DomainError> {
    match store
        .get(&keys::transfer_operation(match_id, from_slot))
        .await?
    {
        None => Ok(None),
        Some(raw) => Ok(Some(serde_json::from_str(&raw).map_err(|e| {
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("malformed transfer operation for match {match_id}: {e}"),
            )
        })?)),
    }
}

/// All operation records of a match, in slot order.
pub async fn find_for_match(
    store: &SharedStore,
    match_id: &str,
) -> Result<Vec<TransferOperation>, DomainError> {
    let mut operations = Vec::new();
    for slot in [PlayerSlot::A, PlayerSlot::B] {
        if let Some(op) = find(store, match_id, slot).await? {
            operations.push(op);
        }
    }
    Ok(operations)
}
