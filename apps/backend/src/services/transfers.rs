//! Stake settlement against the custody service.
//!
//! Execution is leg-scoped and owner-scoped: a finished match has at most
//! one leg (loser to winner), and only the losing player may push their own
//! stake out. The per-slot panel on the match record is the gate; claiming
//! it (PENDING or retryable FAILED, flipped to IN_PROGRESS) is what grants
//! the right to call custody. Attempts are counted before each custody
//! submission and accumulate across execute calls, so a crashed process
//! never under-counts its budget.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::time::sleep;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Tunables;
use crate::custody::{CustodyError, SharedCustody, TransferReceipt, TransferRequest};
use crate::domain::{
    now_unix_ms, plan_transfers, MatchRecord, MatchStatus, PlayerSlot, TransferLeg, TransferPanel,
    TransferState, Winner,
};
use crate::error::AppError;
use crate::errors::domain::{DomainError, ForbiddenKind};
use crate::repos::transfers::TransferOperation;
use crate::repos::{matches, transfers};
use crate::store::SharedStore;

/// Settlement view returned by both execute and status reads.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferStatus {
    pub match_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<Winner>,
    pub transfer_a: TransferPanel,
    pub transfer_b: TransferPanel,
    pub operations: Vec<TransferOperation>,
}

#[derive(Default)]
pub struct TransferService;

impl TransferService {
    /// Execute the acting user's own transfer leg of a finished match.
    ///
    /// Idempotent over a COMPLETED leg and a no-op while another call holds
    /// the leg IN_PROGRESS; both cases return the current settlement view
    /// without touching custody. A FAILED leg is retried only while the
    /// attempt budget lasts. Custody failures are recorded on the panel and
    /// surfaced as data in the returned view, not as errors.
    pub async fn execute(
        &self,
        store: &SharedStore,
        custody: &SharedCustody,
        default_collection: Option<&str>,
        tunables: &Tunables,
        match_id: &str,
        acting_user_id: &str,
    ) -> Result<TransferStatus, AppError> {
        let record = matches::require_match(store, match_id).await?;
        if record.slot_of(acting_user_id).is_none() {
            return Err(not_a_participant(acting_user_id, match_id).into());
        }
        record.require_status(MatchStatus::Finished)?;

        let legs = plan_transfers(&record);
        if legs.is_empty() {
            // Tie (or no opponent ever seated): nothing moves.
            return status_view(store, record).await;
        }
        let Some(leg) = legs
            .into_iter()
            .find(|leg| leg.from_user_id == acting_user_id)
        else {
            return Err(DomainError::forbidden(
                ForbiddenKind::NotLegOwner,
                format!("user {acting_user_id} holds no transfer leg in match {match_id}"),
            )
            .into());
        };
        let slot = leg.from_slot;
        let max_attempts = tunables.transfer_max_attempts;

        // Claim the leg. Only the run of the closure that actually persisted
        // decides whether we proceed, so a lost CAS round cannot leak a claim.
        let proceed = AtomicBool::new(false);
        let claimed = matches::update(store, match_id, |r| {
            let panel = r.transfer_mut(slot);
            let can_run = match panel.state {
                TransferState::Pending => true,
                TransferState::Failed => panel.attempts < max_attempts,
                TransferState::InProgress | TransferState::Completed => false,
            };
            if can_run {
                panel.state = TransferState::InProgress;
            }
            proceed.store(can_run, Ordering::Relaxed);
            Ok(())
        })
        .await?;
        if !proceed.load(Ordering::Relaxed) {
            info!(
                match_id,
                slot = ?slot,
                state = ?claimed.transfer(slot).state,
                "transfer leg not runnable, returning current settlement"
            );
            return status_view(store, claimed).await;
        }

        // Fail closed before custody sees anything: wallets, token and
        // collection must all resolve or the leg is marked FAILED outright,
        // with no attempt consumed.
        let request = match build_request(&claimed, &leg, default_collection) {
            Ok(request) => request,
            Err(reason) => {
                warn!(match_id, slot = ?slot, reason, "transfer leg failed pre-flight checks");
                let failed = matches::update(store, match_id, |r| {
                    let panel = r.transfer_mut(slot);
                    panel.state = TransferState::Failed;
                    panel.error = Some(reason.clone());
                    Ok(())
                })
                .await?;
                return status_view(store, failed).await;
            }
        };

        let mut op = upsert_operation(store, &claimed, &leg, &request).await?;

        let mut current = claimed;
        let mut receipt: Option<TransferReceipt> = None;
        let mut last_error: Option<String> = None;
        loop {
            if current.transfer(slot).attempts >= max_attempts {
                break;
            }
            // Count the attempt before submitting, so a crash mid-call still
            // shows up in the budget.
            current = matches::update(store, match_id, |r| {
                r.transfer_mut(slot).attempts += 1;
                Ok(())
            })
            .await?;
            let attempt = current.transfer(slot).attempts;
            info!(match_id, slot = ?slot, attempt, "submitting custody transfer");
            match custody.transfer(&request).await {
                Ok(r) => {
                    receipt = Some(r);
                    break;
                }
                Err(err) => {
                    last_error = Some(err.to_string());
                    if !retryable(&err, attempt, max_attempts) {
                        warn!(
                            match_id,
                            slot = ?slot,
                            attempt,
                            error = %err,
                            "custody transfer failed terminally for this call"
                        );
                        break;
                    }
                    warn!(
                        match_id,
                        slot = ?slot,
                        attempt,
                        error = %err,
                        "transient custody failure, backing off"
                    );
                    sleep(tunables.transfer_retry_delay).await;
                }
            }
        }

        let final_record = matches::update(store, match_id, |r| {
            let panel = r.transfer_mut(slot);
            match &receipt {
                Some(receipt) => {
                    panel.state = TransferState::Completed;
                    panel.error = None;
                    panel.submission_id = receipt.submission_id.clone();
                }
                None => {
                    panel.state = TransferState::Failed;
                    panel.error = last_error.clone();
                }
            }
            Ok(())
        })
        .await?;

        let panel = final_record.transfer(slot);
        op.status = panel.state;
        op.attempts = panel.attempts;
        op.last_error = panel.error.clone();
        op.submission_id = panel.submission_id.clone();
        op.updated_at = now_unix_ms();
        transfers::save(store, &op).await?;

        match panel.state {
            TransferState::Completed => info!(
                match_id,
                slot = ?slot,
                attempts = panel.attempts,
                submission_id = panel.submission_id.as_deref().unwrap_or("-"),
                "stake transfer completed"
            ),
            _ => warn!(
                match_id,
                slot = ?slot,
                attempts = panel.attempts,
                error = panel.error.as_deref().unwrap_or("-"),
                "stake transfer failed"
            ),
        }

        status_view(store, final_record).await
    }

    /// Read-only settlement view of a match.
    pub async fn status(
        &self,
        store: &SharedStore,
        match_id: &str,
    ) -> Result<TransferStatus, AppError> {
        let record = matches::require_match(store, match_id).await?;
        status_view(store, record).await
    }
}

fn not_a_participant(user_id: &str, match_id: &str) -> DomainError {
    DomainError::forbidden(
        ForbiddenKind::NotAParticipant,
        format!("user {user_id} is not a participant of match {match_id}"),
    )
}

fn retryable(err: &CustodyError, attempt: u32, max_attempts: u32) -> bool {
    err.is_transient() && attempt < max_attempts
}

/// Resolve the custody request for a leg, or the reason it cannot be built.
fn build_request(
    record: &MatchRecord,
    leg: &TransferLeg,
    default_collection: Option<&str>,
) -> Result<TransferRequest, String> {
    let from_wallet = wallet_of(record, leg.from_slot)
        .ok_or_else(|| format!("no wallet address recorded for {}", leg.from_user_id))?;
    let to_wallet = wallet_of(record, leg.to_slot)
        .ok_or_else(|| format!("no wallet address recorded for {}", leg.to_user_id))?;
    let token_id = leg
        .asset
        .token_id
        .parse::<u64>()
        .map_err(|_| format!("token id '{}' is not transferable", leg.asset.token_id))?;
    let collection = leg
        .asset
        .collection
        .clone()
        .filter(|c| !c.trim().is_empty())
        .or_else(|| default_collection.map(str::to_string))
        .ok_or_else(|| "no collection known for the staked token".to_string())?;
    Ok(TransferRequest {
        from_wallet,
        to_wallet,
        collection,
        token_id,
    })
}

fn wallet_of(record: &MatchRecord, slot: PlayerSlot) -> Option<String> {
    record
        .player(slot)
        .and_then(|p| p.wallet_address.clone())
        .filter(|w| !w.trim().is_empty())
}

/// Create or refresh the durable operation record for a claimed leg.
async fn upsert_operation(
    store: &SharedStore,
    record: &MatchRecord,
    leg: &TransferLeg,
    request: &TransferRequest,
) -> Result<TransferOperation, DomainError> {
    let now = now_unix_ms();
    let mut op = match transfers::find(store, &record.id, leg.from_slot).await? {
        Some(existing) => existing,
        None => TransferOperation {
            id: Uuid::new_v4().to_string(),
            match_id: record.id.clone(),
            from_slot: leg.from_slot,
            to_slot: leg.to_slot,
            token_id: leg.asset.token_id.clone(),
            from_address: request.from_wallet.clone(),
            to_address: request.to_wallet.clone(),
            status: TransferState::InProgress,
            attempts: record.transfer(leg.from_slot).attempts,
            last_error: None,
            submission_id: None,
            created_at: now,
            updated_at: now,
        },
    };
    op.status = TransferState::InProgress;
    op.updated_at = now;
    transfers::save(store, &op).await?;
    Ok(op)
}

async fn status_view(store: &SharedStore, record: MatchRecord) -> Result<TransferStatus, AppError> {
    let operations = transfers::find_for_match(store, &record.id).await?;
    Ok(TransferStatus {
        match_id: record.id,
        winner: record.winner,
        transfer_a: record.transfer_a,
        transfer_b: record.transfer_b,
        operations,
    })
}
