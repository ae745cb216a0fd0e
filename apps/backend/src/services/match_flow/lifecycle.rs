use std::sync::atomic::{AtomicBool, Ordering};

use tokio::time::sleep;
use tracing::info;
use uuid::Uuid;

use super::MatchFlowService;
use crate::config::tunables::Tunables;
use crate::domain::{now_unix_ms, MatchRecord, MatchStatus, PlayerInfo, StakedAsset};
use crate::error::AppError;
use crate::errors::domain::{DomainError, ForbiddenKind, ValidationKind};
use crate::repos::matches;
use crate::services::questions::SharedQuestionSource;
use crate::store::SharedStore;
use crate::tasks;

impl MatchFlowService {
    /// Create a match with the acting user in slot A, waiting for an
    /// opponent.
    pub async fn create(
        &self,
        store: &SharedStore,
        questions: &SharedQuestionSource,
        tunables: &Tunables,
        creator: PlayerInfo,
        stake: StakedAsset,
    ) -> Result<MatchRecord, AppError> {
        stake.validate()?;
        let drawn = questions.draw(tunables.questions_per_match).await?;
        if drawn.is_empty() {
            return Err(AppError::internal("question source produced no questions"));
        }

        let record = MatchRecord::new(
            Uuid::new_v4().to_string(),
            creator,
            stake,
            drawn,
            now_unix_ms(),
        );
        matches::insert(store, &record).await?;
        info!(match_id = %record.id, user_id = %record.player_a.user_id, "match created");
        Ok(record)
    }

    /// Create a match with both players already seated (automatch pairing).
    /// The player who was waiting in the queue takes slot A; the claimer
    /// takes slot B. The match starts out READY.
    pub async fn create_paired(
        &self,
        store: &SharedStore,
        questions: &SharedQuestionSource,
        tunables: &Tunables,
        host: PlayerInfo,
        host_stake: StakedAsset,
        guest: PlayerInfo,
        guest_stake: StakedAsset,
    ) -> Result<MatchRecord, AppError> {
        host_stake.validate()?;
        guest_stake.validate()?;
        let drawn = questions.draw(tunables.questions_per_match).await?;
        if drawn.is_empty() {
            return Err(AppError::internal("question source produced no questions"));
        }

        let mut record = MatchRecord::new(
            Uuid::new_v4().to_string(),
            host,
            host_stake,
            drawn,
            now_unix_ms(),
        );
        record.attach_opponent(guest, guest_stake)?;
        matches::insert(store, &record).await?;
        info!(
            match_id = %record.id,
            host = %record.player_a.user_id,
            "paired match created"
        );
        Ok(record)
    }

    /// Seat the acting user in slot B of a pending match.
    pub async fn join(
        &self,
        store: &SharedStore,
        match_id: &str,
        player: PlayerInfo,
        stake: StakedAsset,
    ) -> Result<MatchRecord, AppError> {
        stake.validate()?;
        let joining = player.user_id.clone();
        let updated = matches::update(store, match_id, move |record| {
            record.attach_opponent(player.clone(), stake.clone())
        })
        .await?;
        info!(match_id = %updated.id, user_id = %joining, "player joined match");
        Ok(updated)
    }

    /// Acknowledge a start press from a participant.
    ///
    /// The first press moves READY to INTRO and schedules the countdown that
    /// opens question play; the other player's press (and any repeat) is a
    /// no-op. Pressing start on a PENDING or FINISHED match is rejected.
    pub async fn start(
        &self,
        store: &SharedStore,
        tunables: &Tunables,
        match_id: &str,
        acting_user_id: &str,
    ) -> Result<MatchRecord, AppError> {
        // Written by the last run of the closure, which is the run that
        // persisted: only that run decides whether the countdown is ours
        // to schedule.
        let transitioned = AtomicBool::new(false);
        let updated = matches::update(store, match_id, |record| {
            if !record.is_participant(acting_user_id) {
                return Err(not_a_participant(acting_user_id, &record.id));
            }
            match record.status {
                MatchStatus::Ready => {
                    record.status = MatchStatus::Intro;
                    transitioned.store(true, Ordering::Relaxed);
                    Ok(())
                }
                MatchStatus::Intro | MatchStatus::InProgress => {
                    transitioned.store(false, Ordering::Relaxed);
                    Ok(())
                }
                _ => Err(DomainError::validation(
                    ValidationKind::PhaseMismatch,
                    format!(
                        "match {} is {:?}, expected {:?}",
                        record.id,
                        record.status,
                        MatchStatus::Ready
                    ),
                )),
            }
        })
        .await?;

        if transitioned.load(Ordering::Relaxed) {
            info!(match_id = %updated.id, "intro countdown started");
            let store = store.clone();
            let id = updated.id.clone();
            let delay = tunables.intro_delay;
            tasks::spawn_supervised("intro-timer", async move {
                sleep(delay).await;
                begin_play(&store, &id).await
            });
        }
        Ok(updated)
    }

    /// Load a match for display.
    pub async fn get(&self, store: &SharedStore, match_id: &str) -> Result<MatchRecord, AppError> {
        Ok(matches::require_match(store, match_id).await?)
    }
}

/// INTRO countdown expiry: open question play and stamp the start time.
async fn begin_play(store: &SharedStore, match_id: &str) -> Result<(), AppError> {
    let now = now_unix_ms();
    let updated = matches::update(store, match_id, |record| {
        record.require_status(MatchStatus::Intro)?;
        record.status = MatchStatus::InProgress;
        record.started_at = Some(now);
        Ok(())
    })
    .await?;
    info!(match_id = %updated.id, "question play started");
    Ok(())
}

pub(super) fn not_a_participant(user_id: &str, match_id: &str) -> DomainError {
    DomainError::forbidden(
        ForbiddenKind::NotAParticipant,
        format!("user {user_id} is not a participant of match {match_id}"),
    )
}
