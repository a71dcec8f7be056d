//! Question bank and random sampling.

use rand::Rng;
use thiserror::Error;

use crate::model::Question;

const BUILTIN_QUESTIONS: &str = include_str!("../assets/civics_questions.json");

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PoolError {
    #[error("question pool is empty")]
    Empty,

    #[error("invalid question pool: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read-only collection of questions that quizzes are drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionPool {
    questions: Vec<Question>,
}

impl QuestionPool {
    /// # Errors
    ///
    /// Returns `PoolError::Empty` if no questions are given.
    pub fn new(questions: Vec<Question>) -> Result<Self, PoolError> {
        if questions.is_empty() {
            return Err(PoolError::Empty);
        }
        Ok(Self { questions })
    }

    /// The bundled civics question bank.
    ///
    /// # Errors
    ///
    /// Returns `PoolError::Json` if the bundled data is malformed.
    pub fn builtin() -> Result<Self, PoolError> {
        Self::from_json(BUILTIN_QUESTIONS)
    }

    /// Parse a pool from a JSON array of `{ "question": ..., "answers": [...] }` records.
    ///
    /// # Errors
    ///
    /// Returns `PoolError::Json` for malformed JSON or invalid questions and
    /// `PoolError::Empty` for an empty array.
    pub fn from_json(json: &str) -> Result<Self, PoolError> {
        let questions: Vec<Question> = serde_json::from_str(json)?;
        Self::new(questions)
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Draw `count` questions from this pool. See [`sample`].
    #[must_use]
    pub fn sample<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<Question> {
        sample(&self.questions, count, rng)
    }
}

/// Draw `count` questions without replacement, in uniformly random order.
///
/// Returns fewer than `count` questions only when the pool itself is smaller;
/// callers that need an exact count must check the pool size first.
#[must_use]
pub fn sample<R: Rng + ?Sized>(pool: &[Question], count: usize, rng: &mut R) -> Vec<Question> {
    let amount = count.min(pool.len());
    rand::seq::index::sample(rng, pool.len(), amount)
        .into_iter()
        .map(|index| pool[index].clone())
        .collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
