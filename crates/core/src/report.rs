//! Final tally and per-question breakdown of a finished quiz.

use std::fmt;

use crate::model::{Outcome, QuizSession, QuizSnapshot, QuizStatus};

/// One row of the breakdown, copied verbatim from an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    /// One-based question number.
    pub number: usize,
    pub question: String,
    pub user_answer: String,
    pub is_correct: bool,
    pub grading_failed: bool,
    pub rationale: String,
    pub accepted_answers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultReport {
    pub status: QuizStatus,
    pub correct_count: usize,
    pub total: usize,
    pub entries: Vec<ReportEntry>,
}

impl ResultReport {
    /// Report for a finished quiz, or `None` while it is still in progress.
    #[must_use]
    pub fn new(
        status: QuizStatus,
        correct_count: usize,
        total: usize,
        outcomes: &[Outcome],
    ) -> Option<Self> {
        if !status.is_terminal() {
            return None;
        }

        let entries = outcomes
            .iter()
            .enumerate()
            .map(|(index, outcome)| ReportEntry {
                number: index + 1,
                question: outcome.question().text().to_string(),
                user_answer: outcome.user_answer().to_string(),
                is_correct: outcome.is_correct(),
                grading_failed: outcome.grading_failed(),
                rationale: outcome.rationale().to_string(),
                accepted_answers: outcome.accepted_answers().to_vec(),
            })
            .collect();

        Some(Self {
            status,
            correct_count,
            total,
            entries,
        })
    }

    #[must_use]
    pub fn from_session(session: &QuizSession) -> Option<Self> {
        Self::new(
            session.status(),
            session.correct_count(),
            session.total_questions(),
            session.outcomes(),
        )
    }

    #[must_use]
    pub fn from_snapshot(snapshot: &QuizSnapshot) -> Option<Self> {
        Self::new(
            snapshot.status,
            snapshot.correct_count,
            snapshot.total,
            &snapshot.outcomes,
        )
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == QuizStatus::Passed
    }

    #[must_use]
    pub fn headline(&self) -> &'static str {
        if self.passed() {
            "Congrats, you passed!"
        } else {
            "You did not pass"
        }
    }

    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "You answered {} out of {} questions correctly.",
            self.correct_count, self.total
        )
    }
}

impl fmt::Display for ResultReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.headline())?;
        writeln!(f, "{}", self.summary())?;
        for entry in &self.entries {
            let marker = if entry.is_correct { "✓" } else { "✗" };
            writeln!(f)?;
            writeln!(
                f,
                "{marker} Question {} of {}: {}",
                entry.number, self.total, entry.question
            )?;
            writeln!(f, "  Your answer: {}", entry.user_answer)?;
            writeln!(f, "  Correct answer(s): {}", entry.accepted_answers.join("; "))?;
            if entry.grading_failed {
                writeln!(f, "  {}", entry.rationale)?;
            }
        }
        Ok(())
    }
}
