//! Prompt and reply contract shared by every grader.
//!
//! The classifier is asked to put a bare `yes` or `no` on the first line of its
//! reply and a short explanation after it. Only a first line starting with
//! `yes` (any letter case) counts as correct; everything else, including an
//! empty reply, is an incorrect verdict.

use crate::model::Question;

/// System message sent ahead of the grading prompt.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Build the grading prompt for one submission.
#[must_use]
pub fn build_prompt(question: &Question, user_answer: &str) -> String {
    format!(
        "You are a civics test grader. Here is the question:\n\
         {question}\n\
         Here are the correct answers: {answers}\n\
         The user answered: {user_answer}\n\
         Is the user's answer correct? Reply with only \"yes\" or \"no\" on the first line, \
         then explain briefly on the next line.\n",
        question = question.text(),
        answers = question.joined_answers(),
    )
}

/// Whether the first line of a classifier reply is affirmative.
#[must_use]
pub fn is_affirmative(reply: &str) -> bool {
    reply
        .trim()
        .lines()
        .next()
        .is_some_and(|line| line.to_lowercase().starts_with("yes"))
}

/// Binary verdict plus the classifier's free-text rationale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeVerdict {
    pub is_correct: bool,
    pub rationale: String,
}

impl GradeVerdict {
    #[must_use]
    pub fn new(is_correct: bool, rationale: impl Into<String>) -> Self {
        Self {
            is_correct,
            rationale: rationale.into(),
        }
    }

    /// Derive a verdict from a raw classifier reply.
    #[must_use]
    pub fn from_reply(reply: impl Into<String>) -> Self {
        let reply = reply.into();
        Self {
            is_correct: is_affirmative(&reply),
            rationale: reply.trim().to_string(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
