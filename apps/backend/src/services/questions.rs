//! Question sourcing for new matches.
//!
//! Question generation is an external capability; the engine only stores and
//! serves what it is given. [`QuestionSource`] is the seam, and
//! [`StaticQuestionBank`] is the built-in implementation drawing from a fixed
//! general-knowledge pool.

use std::sync::Arc;

use async_trait::async_trait;
use rand::seq::IndexedRandom;

use crate::domain::Question;
use crate::errors::domain::DomainError;

#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Produce up to `count` questions for a new match.
    async fn draw(&self, count: usize) -> Result<Vec<Question>, DomainError>;
}

pub type SharedQuestionSource = Arc<dyn QuestionSource>;

/// Fixed in-process question pool.
pub struct StaticQuestionBank {
    pool: Vec<Question>,
}

impl StaticQuestionBank {
    pub fn new(pool: Vec<Question>) -> Self {
        Self { pool }
    }

    /// The bank the server ships with.
    pub fn builtin() -> Self {
        Self::new(builtin_pool())
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }
}

#[async_trait]
impl QuestionSource for StaticQuestionBank {
    async fn draw(&self, count: usize) -> Result<Vec<Question>, DomainError> {
        let mut rng = rand::rng();
        Ok(self
            .pool
            .choose_multiple(&mut rng, count)
            .cloned()
            .collect())
    }
}

fn question(id: &str, text: &str, options: [&str; 4], correct_option: usize) -> Question {
    Question {
        id: id.to_string(),
        text: text.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct_option,
    }
}

fn builtin_pool() -> Vec<Question> {
    vec![
        question(
            "q-001",
            "Which planet is known as the Red Planet?",
            ["Venus", "Mars", "Jupiter", "Mercury"],
            1,
        ),
        question(
            "q-002",
            "What is the largest ocean on Earth?",
            ["Atlantic", "Indian", "Pacific", "Arctic"],
            2,
        ),
        question(
            "q-003",
            "How many continents are there?",
            ["Five", "Six", "Seven", "Eight"],
            2,
        ),
        question(
            "q-004",
            "What gas do plants absorb from the atmosphere?",
            ["Oxygen", "Nitrogen", "Carbon dioxide", "Hydrogen"],
            2,
        ),
        question(
            "q-005",
            "Which element has the chemical symbol Au?",
            ["Silver", "Gold", "Aluminium", "Copper"],
            1,
        ),
        question(
            "q-006",
            "What is the capital of Japan?",
            ["Kyoto", "Osaka", "Tokyo", "Nagoya"],
            2,
        ),
        question(
            "q-007",
            "How many sides does a hexagon have?",
            ["Five", "Six", "Seven", "Eight"],
            1,
        ),
        question(
            "q-008",
            "What is the largest animal known to have lived?",
            ["African elephant", "Blue whale", "Colossal squid", "Orca"],
            1,
        ),
        question(
            "q-009",
            "In which year did humans first walk on the Moon?",
            ["1965", "1969", "1972", "1975"],
            1,
        ),
        question(
            "q-010",
            "What is the smallest prime number?",
            ["0", "1", "2", "3"],
            2,
        ),
        question(
            "q-011",
            "How many keys does a standard piano have?",
            ["76", "88", "92", "101"],
            1,
        ),
        question(
            "q-012",
            "Which country is home to the kangaroo?",
            ["New Zealand", "South Africa", "Australia", "Brazil"],
            2,
        ),
    ]
}
