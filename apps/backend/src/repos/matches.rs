//! Match record repository over the state store.
//!
//! Records are stored as JSON under `match:{id}`. All mutations go through
//! [`update`], which provides optimistic concurrency: mutate a fresh copy,
//! bump its version, and swap it in only if the stored bytes are unchanged.

use crate::domain::MatchRecord;
use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::store::{keys, SharedStore};

/// Reload-and-retry budget for contended updates.
const CAS_RETRIES: usize = 4;

fn encode(record: &MatchRecord) -> Result<String, DomainError> {
    serde_json::to_string(record).map_err(|e| {
        DomainError::infra(
            InfraErrorKind::Other("encode".into()),
            format!("failed to encode match {}: {e}", record.id),
        )
    })
}

fn decode(match_id: &str, raw: &str) -> Result<MatchRecord, DomainError> {
    serde_json::from_str(raw).map_err(|e| {
        DomainError::infra(
            InfraErrorKind::DataCorruption,
            format!("malformed match record {match_id}: {e}"),
        )
    })
}

async fn load_with_raw(
    store: &SharedStore,
    match_id: &str,
) -> Result<Option<(String, MatchRecord)>, DomainError> {
    match store.get(&keys::match_record(match_id)).await? {
        None => Ok(None),
        Some(raw) => {
            let record = decode(match_id, &raw)?;
            Ok(Some((raw, record)))
        }
    }
}

pub async fn find_by_id(
    store: &SharedStore,
    match_id: &str,
) -> Result<Option<MatchRecord>, DomainError> {
    Ok(load_with_raw(store, match_id).await?.map(|(_, record)| record))
}

/// Find match by ID or return error if not found.
///
/// This is a convenience helper that converts `None` into a DomainError,
/// eliminating the repetitive `ok_or_else` pattern when a match must exist.
pub async fn require_match(
    store: &SharedStore,
    match_id: &str,
) -> Result<MatchRecord, DomainError> {
    find_by_id(store, match_id).await?.ok_or_else(|| {
        DomainError::not_found(NotFoundKind::Match, format!("match {match_id} not found"))
    })
}

/// Insert a new match record. The id must be unused.
pub async fn insert(store: &SharedStore, record: &MatchRecord) -> Result<(), DomainError> {
    let payload = encode(record)?;
    let created = store
        .set_cas(&keys::match_record(&record.id), None, &payload)
        .await?;
    if !created {
        return Err(DomainError::conflict(
            ConflictKind::Other("MATCH_ID_TAKEN".into()),
            format!("match id {} already exists", record.id),
        ));
    }
    Ok(())
}

/// Delete a match record. Returns true when the record existed.
pub async fn delete(store: &SharedStore, match_id: &str) -> Result<bool, DomainError> {
    store.del(&keys::match_record(match_id)).await
}

/// Update a match record with optimistic locking.
///
/// Loads the current record, applies `mutate` to a copy, bumps the version
/// and compare-and-swaps the result against the exact bytes that were read.
/// On contention the cycle repeats with a fresh copy, so `mutate` may run
/// more than once and must stay pure. Errors from `mutate` abort the update
/// and propagate unchanged.
///
/// Returns the updated record as persisted.
pub async fn update<F>(
    store: &SharedStore,
    match_id: &str,
    mutate: F,
) -> Result<MatchRecord, DomainError>
where
    F: Fn(&mut MatchRecord) -> Result<(), DomainError>,
{
    for _ in 0..CAS_RETRIES {
        let Some((raw, mut record)) = load_with_raw(store, match_id).await? else {
            return Err(DomainError::not_found(
                NotFoundKind::Match,
                format!("match {match_id} not found"),
            ));
        };

        mutate(&mut record)?;
        record.version += 1;
        let next = encode(&record)?;

        if store
            .set_cas(&keys::match_record(match_id), Some(&raw), &next)
            .await?
        {
            return Ok(record);
        }
        // Contended: someone swapped the record first. Reload and retry.
    }

    Err(DomainError::conflict(
        ConflictKind::OptimisticLock,
        format!("Match {match_id} was modified concurrently. Please refresh and retry."),
    ))
}
