use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::health::ClassifierHealth;
use crate::model::outcome::{GradeResolution, Outcome};
use crate::model::question::Question;

/// Number of questions asked in one quiz attempt.
pub const TOTAL_QUESTIONS: usize = 10;

/// Correct answers needed to pass. Reaching it ends the quiz immediately.
pub const PASS_THRESHOLD: usize = 6;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("a quiz needs exactly {expected} questions, got {actual}")]
    QuestionCount { expected: usize, actual: usize },

    #[error("no submission is being graded")]
    NotPending,

    #[error("submission for question {submitted} does not match current question {current}")]
    StaleSubmission { submitted: usize, current: usize },
}

/// Why a submission was refused. A refused submission leaves the session untouched.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    #[error("answer is empty")]
    EmptyAnswer,

    #[error("an answer is already being graded")]
    Pending,

    #[error("quiz is already finished")]
    Completed,
}

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuizStatus {
    #[default]
    InProgress,
    Passed,
    Failed,
}

impl QuizStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, QuizStatus::InProgress)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuizStatus::InProgress => "in-progress",
            QuizStatus::Passed => "passed",
            QuizStatus::Failed => "failed",
        }
    }
}

//
// ─── SUBMISSION ────────────────────────────────────────────────────────────────
//

/// An accepted answer waiting for its verdict.
///
/// Returned by [`QuizSession::begin_submission`] and handed back to
/// [`QuizSession::resolve_submission`] once grading finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    index: usize,
    question: Question,
    answer: String,
}

impl Submission {
    /// Zero-based index of the question being answered.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn question(&self) -> &Question {
        &self.question
    }

    /// The trimmed answer text.
    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One quiz attempt over a fixed set of questions.
///
/// The session moves strictly forward: each answer is accepted with
/// `begin_submission`, graded elsewhere, then recorded with
/// `resolve_submission`. Only one answer can be in flight at a time. The quiz
/// passes as soon as [`PASS_THRESHOLD`] answers are correct and fails when the
/// last question is answered below it.
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<Question>,
    current: usize,
    correct_count: usize,
    outcomes: Vec<Outcome>,
    status: QuizStatus,
    pending: bool,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Start a session over the given questions.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::QuestionCount` unless exactly [`TOTAL_QUESTIONS`]
    /// questions are provided.
    pub fn new(questions: Vec<Question>, started_at: DateTime<Utc>) -> Result<Self, SessionError> {
        if questions.len() != TOTAL_QUESTIONS {
            return Err(SessionError::QuestionCount {
                expected: TOTAL_QUESTIONS,
                actual: questions.len(),
            });
        }

        Ok(Self {
            questions,
            current: 0,
            correct_count: 0,
            outcomes: Vec::with_capacity(TOTAL_QUESTIONS),
            status: QuizStatus::InProgress,
            pending: false,
            started_at,
            completed_at: None,
        })
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Number of questions answered so far; equals the index of the next question.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    #[must_use]
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn status(&self) -> QuizStatus {
        self.status
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status.is_terminal()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// The question awaiting an answer, or `None` once the quiz has finished.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.is_complete() {
            return None;
        }
        self.questions.get(self.current)
    }

    /// Accept an answer for the current question and mark it as being graded.
    ///
    /// # Errors
    ///
    /// Returns a `SubmitRejection` (and changes nothing) if the quiz is over, an
    /// answer is already being graded, or the answer is blank.
    pub fn begin_submission(&mut self, raw_answer: &str) -> Result<Submission, SubmitRejection> {
        if self.is_complete() {
            return Err(SubmitRejection::Completed);
        }
        if self.pending {
            return Err(SubmitRejection::Pending);
        }
        let answer = raw_answer.trim();
        if answer.is_empty() {
            return Err(SubmitRejection::EmptyAnswer);
        }
        let Some(question) = self.questions.get(self.current) else {
            return Err(SubmitRejection::Completed);
        };

        let submission = Submission {
            index: self.current,
            question: question.clone(),
            answer: answer.to_string(),
        };
        self.pending = true;
        Ok(submission)
    }

    /// Record the grading result for a pending submission and advance.
    ///
    /// `resolved_at` should come from the caller's clock.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotPending` if nothing is being graded and
    /// `SessionError::StaleSubmission` if the submission belongs to another question.
    pub fn resolve_submission(
        &mut self,
        submission: Submission,
        resolution: GradeResolution,
        resolved_at: DateTime<Utc>,
    ) -> Result<&Outcome, SessionError> {
        if !self.pending {
            return Err(SessionError::NotPending);
        }
        if submission.index != self.current {
            return Err(SessionError::StaleSubmission {
                submitted: submission.index,
                current: self.current,
            });
        }

        let outcome =
            Outcome::from_resolution(submission.question, submission.answer, resolution);
        if outcome.is_correct() {
            self.correct_count += 1;
        }
        self.outcomes.push(outcome);
        self.pending = false;

        let answered = self.current;
        self.current += 1;
        self.status = self.status_after(answered);
        if self.status.is_terminal() {
            self.completed_at = Some(resolved_at);
        }

        self.outcomes.last().ok_or(SessionError::NotPending)
    }

    /// Release a pending submission without recording an outcome, so the same
    /// question can be answered again.
    ///
    /// Returns `false` and changes nothing if the submission is no longer the
    /// one in flight.
    pub fn abandon_submission(&mut self, submission: &Submission) -> bool {
        if !self.pending || submission.index != self.current {
            return false;
        }
        self.pending = false;
        true
    }

    fn status_after(&self, answered: usize) -> QuizStatus {
        if self.correct_count >= PASS_THRESHOLD {
            QuizStatus::Passed
        } else if answered + 1 >= self.questions.len() {
            QuizStatus::Failed
        } else {
            QuizStatus::InProgress
        }
    }

    /// Immutable copy of the presentation-relevant state.
    #[must_use]
    pub fn snapshot(&self, health: ClassifierHealth) -> QuizSnapshot {
        QuizSnapshot {
            current_index: self.current,
            total: self.questions.len(),
            correct_count: self.correct_count,
            status: self.status,
            pending: self.pending,
            current_question: self.current_question().cloned(),
            outcomes: self.outcomes.clone(),
            health,
            started_at: self.started_at,
            completed_at: self.completed_at,
        }
    }
}

//
// ─── SNAPSHOT ──────────────────────────────────────────────────────────────────
//

/// Point-in-time view of a session for front ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSnapshot {
    pub current_index: usize,
    pub total: usize,
    pub correct_count: usize,
    pub status: QuizStatus,
    pub pending: bool,
    pub current_question: Option<Question>,
    pub outcomes: Vec<Outcome>,
    pub health: ClassifierHealth,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl QuizSnapshot {
    /// "Question N of M" for the question on screen, if any.
    #[must_use]
    pub fn progress_label(&self) -> Option<String> {
        self.current_question
            .as_ref()
            .map(|_| format!("Question {} of {}", self.current_index + 1, self.total))
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status.is_terminal()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
