use tracing::{debug, info};

use super::lifecycle::not_a_participant;
use super::MatchFlowService;
use crate::config::tunables::Tunables;
use crate::domain::scoring::score_answer;
use crate::domain::{now_unix_ms, MatchRecord, MatchStatus, PlayerAnswer, PlayerSlot};
use crate::error::AppError;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::repos::matches;
use crate::store::SharedStore;

impl MatchFlowService {
    /// Record one answer against the active question.
    ///
    /// The acting user must be a participant. Slot resolution, the
    /// duplicate-answer check, scoring, and any resulting advancement or
    /// finish all happen inside the CAS loop against a freshly read record,
    /// so two racing submissions can never double-count one slot.
    #[allow(clippy::too_many_arguments)]
    pub async fn submit_answer(
        &self,
        store: &SharedStore,
        tunables: &Tunables,
        match_id: &str,
        acting_user_id: &str,
        question_id: &str,
        requested_slot: Option<PlayerSlot>,
        selected_option: i32,
        time_remaining: f64,
    ) -> Result<MatchRecord, AppError> {
        let limit = tunables.question_time_limit_secs();
        let now = now_unix_ms();

        let updated = matches::update(store, match_id, |record| {
            let acting = record
                .slot_of(acting_user_id)
                .ok_or_else(|| not_a_participant(acting_user_id, &record.id))?;
            record.require_status(MatchStatus::InProgress)?;

            let question = record.current_question().cloned().ok_or_else(|| {
                DomainError::validation(
                    ValidationKind::QuestionMismatch,
                    format!("match {} has no active question", record.id),
                )
            })?;
            if question.id != question_id {
                return Err(DomainError::validation(
                    ValidationKind::QuestionMismatch,
                    format!(
                        "question {question_id} is not the active question of match {}",
                        record.id
                    ),
                ));
            }

            let slot = record.resolve_answer_slot(acting, requested_slot, &question.id)?;
            let clamped = time_remaining.clamp(0.0, limit);
            let correct = question.is_correct(selected_option);
            let points = score_answer(correct, clamped, limit);
            record.record_answer(
                slot,
                PlayerAnswer {
                    question_id: question.id.clone(),
                    selected_option,
                    time_remaining: clamped,
                    correct,
                    points,
                },
            );

            if record.both_answered(&question.id) {
                record.advance_or_finish(now);
            }
            Ok(())
        })
        .await?;

        debug!(
            match_id = %updated.id,
            question_id,
            index = updated.current_question_index,
            "answer recorded"
        );
        if updated.status == MatchStatus::Finished {
            info!(match_id = %updated.id, winner = ?updated.winner, "match finished");
        }
        Ok(updated)
    }
}
