//! Trivia questions and recorded answers.

use serde::{Deserialize, Serialize};

/// Sentinel `selected_option` for a slot that never picked an option before
/// time ran out. Always scores zero.
pub const NO_ANSWER: i32 = -1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    pub correct_option: usize,
}

impl Question {
    /// Whether a selected option index hits the correct option.
    /// Out-of-range and sentinel indices are simply wrong, never errors.
    pub fn is_correct(&self, selected_option: i32) -> bool {
        selected_option >= 0 && selected_option as usize == self.correct_option
    }
}

/// One slot's answer to one question, with the score it earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerAnswer {
    pub question_id: String,
    pub selected_option: i32,
    /// Seconds left on the question clock when the answer landed,
    /// clamped to `[0, question_time_limit]`.
    pub time_remaining: f64,
    pub correct: bool,
    pub points: u32,
}
