use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use civics_core::model::{
    ClassifierHealth, GradeResolution, Outcome, Question, QuizSession, QuizSnapshot, Submission,
};
use civics_core::{Clock, ResultReport};

use crate::error::SubmitError;
use crate::grading::Grader;

/// Result of a graded submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub outcome: Outcome,
    pub snapshot: QuizSnapshot,
}

struct HandleState {
    session: QuizSession,
    health: ClassifierHealth,
    /// Set once the grader reports a configuration error; later submissions
    /// in this session are resolved without calling it again.
    configuration_fault: Option<String>,
}

/// Shared handle to one running quiz.
///
/// Cloning the handle shares the session. The lock is never held while a
/// grading call is in flight, so a second submission made during grading sees
/// the pending flag and is rejected.
#[derive(Clone)]
pub struct QuizHandle {
    state: Arc<Mutex<HandleState>>,
    grader: Arc<dyn Grader>,
    clock: Clock,
}

impl QuizHandle {
    pub(crate) fn new(session: QuizSession, grader: Arc<dyn Grader>, clock: Clock) -> Self {
        Self {
            state: Arc::new(Mutex::new(HandleState {
                session,
                health: ClassifierHealth::Unknown,
                configuration_fault: None,
            })),
            grader,
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HandleState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn snapshot(&self) -> QuizSnapshot {
        let state = self.lock();
        state.session.snapshot(state.health)
    }

    /// The questions drawn for this attempt, in order.
    #[must_use]
    pub fn questions(&self) -> Vec<Question> {
        self.lock().session.questions().to_vec()
    }

    #[must_use]
    pub fn health(&self) -> ClassifierHealth {
        self.lock().health
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.lock().session.is_complete()
    }

    /// Final report, once the quiz has finished.
    #[must_use]
    pub fn report(&self) -> Option<ResultReport> {
        ResultReport::from_session(&self.lock().session)
    }

    /// Grade an answer for the current question and advance the quiz.
    ///
    /// Grading failures never surface here: they are recorded as incorrect
    /// outcomes flagged as grading failures, and classifier health turns to
    /// `Error`.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::Rejected` (with no change to the session) for a
    /// blank answer, an answer submitted while another is being graded, or a
    /// finished quiz.
    ///
    /// Dropping the future before grading finishes leaves the current question
    /// unanswered and open for another submission.
    pub async fn submit_answer(&self, raw_answer: &str) -> Result<SubmitOutcome, SubmitError> {
        let (submission, known_fault) = {
            let mut state = self.lock();
            let submission = state.session.begin_submission(raw_answer)?;
            (submission, state.configuration_fault.clone())
        };

        let in_flight = InFlight {
            handle: self,
            submission: submission.clone(),
            armed: true,
        };
        let (resolution, new_fault) = match known_fault {
            Some(reason) => (GradeResolution::Unavailable { reason }, None),
            None => self.grade(&submission).await,
        };
        in_flight.disarm();

        let mut state = self.lock();
        if new_fault.is_some() {
            state.configuration_fault = new_fault;
        }
        state.health = ClassifierHealth::from_resolution(&resolution);
        let index = submission.index();
        let outcome = state
            .session
            .resolve_submission(submission, resolution, self.clock.now())?
            .clone();

        debug!(
            question = index + 1,
            correct = outcome.is_correct(),
            grading_failed = outcome.grading_failed(),
            "answer recorded"
        );
        if state.session.is_complete() {
            info!(
                status = state.session.status().as_str(),
                correct = state.session.correct_count(),
                answered = state.session.current_index(),
                "quiz finished"
            );
        }

        Ok(SubmitOutcome {
            outcome,
            snapshot: state.session.snapshot(state.health),
        })
    }

    async fn grade(&self, submission: &Submission) -> (GradeResolution, Option<String>) {
        match self
            .grader
            .grade(submission.question(), submission.answer())
            .await
        {
            Ok(verdict) => (GradeResolution::Graded(verdict), None),
            Err(err) => {
                warn!(error = %err, question = submission.index() + 1, "grading failed");
                let reason = err.to_string();
                let fault = err.is_configuration().then(|| reason.clone());
                (GradeResolution::Unavailable { reason }, fault)
            }
        }
    }
}

/// Releases the pending flag if `submit_answer` is dropped while grading.
struct InFlight<'a> {
    handle: &'a QuizHandle,
    submission: Submission,
    armed: bool,
}

impl InFlight<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if self.handle.lock().session.abandon_submission(&self.submission) {
            warn!(
                question = self.submission.index() + 1,
                "submission dropped before grading finished"
            );
        }
    }
}

impl fmt::Debug for QuizHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("QuizHandle")
            .field("current", &state.session.current_index())
            .field("correct", &state.session.correct_count())
            .field("status", &state.session.status())
            .field("pending", &state.session.is_pending())
            .field("health", &state.health)
            .finish_non_exhaustive()
    }
}
