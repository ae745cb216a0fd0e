//! Automatch queue repository over the state store.
//!
//! Each rarity tier keeps a set of waiting user ids (`automatch:queue:{r}`)
//! plus one JSON entry per waiter (`automatch:entry:{r}:{user}`). Membership
//! in the set is the source of truth: a waiter is claimable exactly while
//! their id is in the set, and the atomic `SREM`-style removal is the claim
//! itself. Once a claim lands, the claimer leaves a pairing pointer
//! (`automatch:paired:{r}:{user}`) holding the new match id for the waiter's
//! stream to pick up.

use serde::{Deserialize, Serialize};

use crate::domain::{Rarity, StakedAsset};
use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::store::{keys, SharedStore};

/// A waiting player's queue entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomatchEntry {
    pub user_id: String,
    pub display_name: String,
    pub asset: StakedAsset,
    pub wallet_address: String,
    pub rarity: Rarity,
    pub joined_at: i64,
}

fn decode_entry(user_id: &str, raw: &str) -> Result<AutomatchEntry, DomainError> {
    serde_json::from_str(raw).map_err(|e| {
        DomainError::infra(
            InfraErrorKind::DataCorruption,
            format!("malformed automatch entry for {user_id}: {e}"),
        )
    })
}

pub async fn queue_size(store: &SharedStore, rarity: Rarity) -> Result<usize, DomainError> {
    store.set_len(&keys::automatch_bucket(rarity)).await
}

pub async fn find_entry(
    store: &SharedStore,
    rarity: Rarity,
    user_id: &str,
) -> Result<Option<AutomatchEntry>, DomainError> {
    match store.get(&keys::automatch_entry(rarity, user_id)).await? {
        None => Ok(None),
        Some(raw) => Ok(Some(decode_entry(user_id, &raw)?)),
    }
}

/// Enqueue a waiter. Re-joining refreshes the stored entry in place.
/// Returns the resulting queue size.
pub async fn enqueue(store: &SharedStore, entry: &AutomatchEntry) -> Result<usize, DomainError> {
    let payload = serde_json::to_string(entry).map_err(|e| {
        DomainError::infra(
            InfraErrorKind::Other("encode".into()),
            format!("failed to encode automatch entry for {}: {e}", entry.user_id),
        )
    })?;

    store
        .set(&keys::automatch_entry(entry.rarity, &entry.user_id), &payload)
        .await?;
    store
        .set_add(&keys::automatch_bucket(entry.rarity), &entry.user_id)
        .await?;
    queue_size(store, entry.rarity).await
}

/// Remove a waiter from the queue. Idempotent: returns true when either the
/// set membership or the entry record was actually removed.
pub async fn remove(
    store: &SharedStore,
    rarity: Rarity,
    user_id: &str,
) -> Result<bool, DomainError> {
    let was_member = store
        .set_remove(&keys::automatch_bucket(rarity), user_id)
        .await?;
    let had_entry = store.del(&keys::automatch_entry(rarity, user_id)).await?;
    Ok(was_member || had_entry)
}

/// Claim the longest-waiting opponent in a rarity bucket.
///
/// The atomic set removal is the claim: of all concurrent claimers (and the
/// waiter's own cancel), exactly one wins each member. Candidates are tried
/// oldest first; stale members whose entry record is gone are skipped.
/// Returns `None` when nobody (other than the caller) is waiting.
pub async fn claim_opponent(
    store: &SharedStore,
    rarity: Rarity,
    user_id: &str,
) -> Result<Option<AutomatchEntry>, DomainError> {
    let bucket = keys::automatch_bucket(rarity);
    let members = store.set_members(&bucket).await?;

    // Set members come back unordered; join timestamps restore FIFO.
    let mut candidates = Vec::new();
    for member in members {
        if member == user_id {
            continue;
        }
        if let Some(entry) = find_entry(store, rarity, &member).await? {
            candidates.push(entry);
        }
    }
    candidates.sort_by_key(|entry| entry.joined_at);

    for entry in candidates {
        if !store.set_remove(&bucket, &entry.user_id).await? {
            // Raced: someone else claimed (or cancelled) this waiter first.
            continue;
        }
        store
            .del(&keys::automatch_entry(rarity, &entry.user_id))
            .await?;
        return Ok(Some(entry));
    }

    Ok(None)
}

/// Leave the match id for a claimed waiter to discover.
pub async fn write_pairing(
    store: &SharedStore,
    rarity: Rarity,
    user_id: &str,
    match_id: &str,
) -> Result<(), DomainError> {
    store
        .set(&keys::automatch_pairing(rarity, user_id), match_id)
        .await
}

/// Consume the pairing pointer for a waiter, if one has been left.
pub async fn take_pairing(
    store: &SharedStore,
    rarity: Rarity,
    user_id: &str,
) -> Result<Option<String>, DomainError> {
    let key = keys::automatch_pairing(rarity, user_id);
    match store.get(&key).await? {
        None => Ok(None),
        Some(match_id) => {
            store.del(&key).await?;
            Ok(Some(match_id))
        }
    }
}
