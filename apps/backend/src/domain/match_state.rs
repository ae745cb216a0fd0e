//! Match lifecycle state: the record two players compete over, plus the
//! pure transitions that move it through its phases.

use serde::{Deserialize, Serialize};

use crate::domain::asset::{PlayerInfo, StakedAsset};
use crate::domain::quiz::{PlayerAnswer, Question};
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};

/// Sentinel for `current_question_index` before question play is armed.
pub const NO_ACTIVE_QUESTION: i32 = -1;

/// Overall match progression phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    /// Created, waiting for an opponent.
    Pending,
    /// Both players seated, waiting for a start.
    Ready,
    /// Start acknowledged; intro countdown running.
    Intro,
    /// Question play.
    InProgress,
    /// Terminal; winner decided.
    Finished,
}

/// The two player slots of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerSlot {
    A,
    B,
}

impl PlayerSlot {
    pub fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

/// Outcome of a finished match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Winner {
    A,
    B,
    Tie,
}

/// Lifecycle of one stake transfer leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferState {
    Pending,
    InProgress,
    Completed,
    Failed,
}

/// Per-slot transfer bookkeeping carried on the match record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferPanel {
    pub state: TransferState,
    /// Custody submissions consumed so far, counted across execute calls.
    pub attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Custody-side transfer id, recorded on completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<String>,
}

impl Default for TransferPanel {
    fn default() -> Self {
        Self {
            state: TransferState::Pending,
            attempts: 0,
            error: None,
            submission_id: None,
        }
    }
}

/// The full persisted state of one head-to-head match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub id: String,
    pub status: MatchStatus,
    pub player_a: PlayerInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_b: Option<PlayerInfo>,
    pub nft_a: StakedAsset,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nft_b: Option<StakedAsset>,
    pub questions: Vec<Question>,
    pub answers_a: Vec<PlayerAnswer>,
    pub answers_b: Vec<PlayerAnswer>,
    pub score_a: u32,
    pub score_b: u32,
    /// Index into `questions`, or `NO_ACTIVE_QUESTION` before play is armed.
    pub current_question_index: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Winner>,
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<i64>,
    pub transfer_a: TransferPanel,
    pub transfer_b: TransferPanel,
    /// Optimistic lock version, bumped on every persisted mutation.
    pub version: u64,
}

impl MatchRecord {
    pub fn new(
        id: impl Into<String>,
        creator: PlayerInfo,
        stake: StakedAsset,
        questions: Vec<Question>,
        now_ms: i64,
    ) -> Self {
        Self {
            id: id.into(),
            status: MatchStatus::Pending,
            player_a: creator,
            player_b: None,
            nft_a: stake,
            nft_b: None,
            questions,
            answers_a: Vec::new(),
            answers_b: Vec::new(),
            score_a: 0,
            score_b: 0,
            current_question_index: NO_ACTIVE_QUESTION,
            winner: None,
            created_at: now_ms,
            started_at: None,
            finished_at: None,
            transfer_a: TransferPanel::default(),
            transfer_b: TransferPanel::default(),
            version: 0,
        }
    }

    pub fn player(&self, slot: PlayerSlot) -> Option<&PlayerInfo> {
        match slot {
            PlayerSlot::A => Some(&self.player_a),
            PlayerSlot::B => self.player_b.as_ref(),
        }
    }

    pub fn stake(&self, slot: PlayerSlot) -> Option<&StakedAsset> {
        match slot {
            PlayerSlot::A => Some(&self.nft_a),
            PlayerSlot::B => self.nft_b.as_ref(),
        }
    }

    pub fn answers(&self, slot: PlayerSlot) -> &[PlayerAnswer] {
        match slot {
            PlayerSlot::A => &self.answers_a,
            PlayerSlot::B => &self.answers_b,
        }
    }

    pub fn score(&self, slot: PlayerSlot) -> u32 {
        match slot {
            PlayerSlot::A => self.score_a,
            PlayerSlot::B => self.score_b,
        }
    }

    pub fn transfer(&self, slot: PlayerSlot) -> &TransferPanel {
        match slot {
            PlayerSlot::A => &self.transfer_a,
            PlayerSlot::B => &self.transfer_b,
        }
    }

    pub fn transfer_mut(&mut self, slot: PlayerSlot) -> &mut TransferPanel {
        match slot {
            PlayerSlot::A => &mut self.transfer_a,
            PlayerSlot::B => &mut self.transfer_b,
        }
    }

    /// The slot occupied by `user_id`, if any.
    pub fn slot_of(&self, user_id: &str) -> Option<PlayerSlot> {
        if self.player_a.user_id == user_id {
            return Some(PlayerSlot::A);
        }
        match &self.player_b {
            Some(p) if p.user_id == user_id => Some(PlayerSlot::B),
            _ => None,
        }
    }

    pub fn is_participant(&self, user_id: &str) -> bool {
        self.slot_of(user_id).is_some()
    }

    pub fn current_question(&self) -> Option<&Question> {
        usize::try_from(self.current_question_index)
            .ok()
            .and_then(|i| self.questions.get(i))
    }

    pub fn has_answered(&self, slot: PlayerSlot, question_id: &str) -> bool {
        self.answers(slot).iter().any(|a| a.question_id == question_id)
    }

    pub fn both_answered(&self, question_id: &str) -> bool {
        self.has_answered(PlayerSlot::A, question_id) && self.has_answered(PlayerSlot::B, question_id)
    }

    pub fn require_status(&self, expected: MatchStatus) -> Result<(), DomainError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                format!(
                    "match {} is {:?}, expected {:?}",
                    self.id, self.status, expected
                ),
            ))
        }
    }

    /// Seat the joining player in slot B and arm question play.
    ///
    /// Rejects joins once slot B is taken, joins by the creator, and stakes
    /// whose rarity differs from the creator's stake.
    pub fn attach_opponent(
        &mut self,
        player: PlayerInfo,
        stake: StakedAsset,
    ) -> Result<(), DomainError> {
        if self.status != MatchStatus::Pending || self.player_b.is_some() {
            return Err(DomainError::conflict(
                ConflictKind::MatchFull,
                format!("match {} already has two players", self.id),
            ));
        }
        if self.player_a.user_id == player.user_id {
            return Err(DomainError::validation(
                ValidationKind::SelfJoin,
                "cannot join your own match",
            ));
        }
        if self.nft_a.rarity != stake.rarity {
            return Err(DomainError::validation(
                ValidationKind::RarityMismatch,
                format!(
                    "staked rarity {} does not match the creator's {}",
                    stake.rarity, self.nft_a.rarity
                ),
            ));
        }
        self.player_b = Some(player);
        self.nft_b = Some(stake);
        self.status = MatchStatus::Ready;
        self.current_question_index = 0;
        Ok(())
    }

    /// Pick the slot an incoming answer applies to.
    ///
    /// An explicit slot wins if it has not answered yet. Otherwise the acting
    /// player's own slot is tried first, then the opponent's (covers the
    /// time-up path where one connection reports sentinel answers for both
    /// players). When both slots already answered the active question, the
    /// answer is a duplicate.
    pub fn resolve_answer_slot(
        &self,
        acting: PlayerSlot,
        requested: Option<PlayerSlot>,
        question_id: &str,
    ) -> Result<PlayerSlot, DomainError> {
        if let Some(slot) = requested {
            if self.has_answered(slot, question_id) {
                return Err(DomainError::validation(
                    ValidationKind::DuplicateAnswer,
                    format!("slot {slot:?} already answered question {question_id}"),
                ));
            }
            return Ok(slot);
        }
        if !self.has_answered(acting, question_id) {
            return Ok(acting);
        }
        let other = acting.other();
        if !self.has_answered(other, question_id) {
            return Ok(other);
        }
        Err(DomainError::validation(
            ValidationKind::DuplicateAnswer,
            format!("both slots already answered question {question_id}"),
        ))
    }

    /// Append an answer to a slot and credit its points.
    pub fn record_answer(&mut self, slot: PlayerSlot, answer: PlayerAnswer) {
        let points = answer.points;
        match slot {
            PlayerSlot::A => {
                self.answers_a.push(answer);
                self.score_a += points;
            }
            PlayerSlot::B => {
                self.answers_b.push(answer);
                self.score_b += points;
            }
        }
    }

    /// Move to the next question, or settle the match after the last one.
    pub fn advance_or_finish(&mut self, now_ms: i64) {
        let next = self.current_question_index + 1;
        if (next as usize) < self.questions.len() {
            self.current_question_index = next;
        } else {
            self.finish(now_ms);
        }
    }

    pub fn decide_winner(&self) -> Winner {
        match self.score_a.cmp(&self.score_b) {
            std::cmp::Ordering::Greater => Winner::A,
            std::cmp::Ordering::Less => Winner::B,
            std::cmp::Ordering::Equal => Winner::Tie,
        }
    }

    fn finish(&mut self, now_ms: i64) {
        self.status = MatchStatus::Finished;
        self.winner = Some(self.decide_winner());
        self.finished_at = Some(now_ms);
        self.settle_transfer_panels();
    }

    /// Seed the per-slot transfer panels at settlement. Only the losing slot
    /// has a stake to move; the winner's panel (and both panels on a tie)
    /// complete immediately with nothing to do.
    fn settle_transfer_panels(&mut self) {
        let loser = match self.winner {
            Some(Winner::A) => Some(PlayerSlot::B),
            Some(Winner::B) => Some(PlayerSlot::A),
            _ => None,
        };
        for slot in [PlayerSlot::A, PlayerSlot::B] {
            let state = if loser == Some(slot) {
                TransferState::Pending
            } else {
                TransferState::Completed
            };
            self.transfer_mut(slot).state = state;
        }
    }
}
