use civics_core::model::{ClassifierHealth, Outcome, QuizSnapshot, SubmitRejection};
use services::{QuizError, QuizHandle, QuizService, SubmitError, SubmitOutcome};

use crate::views::ViewError;
use crate::vm::report_vm::{ReportVm, map_report};

/// Notice shown while the grading classifier is failing.
pub const DEGRADED_NOTICE: &str =
    "The grading service is unavailable. Answers are being marked incorrect until it recovers.";

/// Everything the quiz screen renders, computed from the current state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizScreen {
    pub progress: Option<String>,
    pub question: Option<String>,
    pub input: String,
    pub input_disabled: bool,
    pub can_submit: bool,
    pub submit_label: &'static str,
    pub health: ClassifierHealth,
    pub health_notice: Option<&'static str>,
    pub feedback: Option<String>,
    pub report: Option<ReportVm>,
}

/// View model for one quiz attempt.
///
/// Holds the last snapshot received from the session and the answer being
/// typed. Submitting is split in two steps so the component can await grading
/// without holding the signal: [`QuizVm::begin_submit`] hands out the handle
/// and answer, [`QuizVm::apply`] folds the result back in.
#[derive(Clone, Debug)]
pub struct QuizVm {
    handle: QuizHandle,
    snapshot: QuizSnapshot,
    input: String,
    grading: bool,
    last_outcome: Option<Outcome>,
    rejection: Option<SubmitRejection>,
}

impl QuizVm {
    #[must_use]
    pub fn new(handle: QuizHandle) -> Self {
        let snapshot = handle.snapshot();
        Self {
            handle,
            snapshot,
            input: String::new(),
            grading: false,
            last_outcome: None,
            rejection: None,
        }
    }

    /// # Errors
    ///
    /// Returns `ViewError::PoolTooSmall` when the question pool cannot fill a
    /// quiz and `ViewError::Unknown` for other failures.
    pub fn start(service: &QuizService) -> Result<Self, ViewError> {
        match service.start_session() {
            Ok(handle) => Ok(Self::new(handle)),
            Err(QuizError::PoolTooSmall { .. }) => Err(ViewError::PoolTooSmall),
            Err(err) => {
                tracing::error!(error = %err, "could not start quiz");
                Err(ViewError::Unknown)
            }
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> &QuizSnapshot {
        &self.snapshot
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, value: String) {
        self.input = value;
        self.rejection = None;
    }

    #[must_use]
    pub fn is_grading(&self) -> bool {
        self.grading
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.grading && !self.snapshot.is_complete() && !self.input.trim().is_empty()
    }

    /// Start grading the typed answer.
    ///
    /// Returns `None` (and changes nothing) when submitting is not allowed
    /// right now.
    pub fn begin_submit(&mut self) -> Option<(QuizHandle, String)> {
        if !self.can_submit() {
            return None;
        }
        self.grading = true;
        self.rejection = None;
        Some((self.handle.clone(), self.input.clone()))
    }

    /// Record the result of a submission started with `begin_submit`.
    pub fn apply(&mut self, result: Result<SubmitOutcome, SubmitError>) {
        self.grading = false;
        match result {
            Ok(SubmitOutcome { outcome, snapshot }) => {
                self.snapshot = snapshot;
                self.last_outcome = Some(outcome);
                self.input.clear();
            }
            Err(err) => {
                self.rejection = err.rejection();
                if self.rejection.is_none() {
                    tracing::error!(error = %err, "submission could not be recorded");
                }
                self.snapshot = self.handle.snapshot();
            }
        }
    }

    #[must_use]
    pub fn report(&self) -> Option<ReportVm> {
        let report = self.handle.report()?;
        Some(map_report(
            &report,
            self.snapshot.started_at,
            self.snapshot.completed_at,
        ))
    }

    fn feedback(&self) -> Option<String> {
        if let Some(rejection) = self.rejection {
            return Some(format!("Not submitted: {rejection}."));
        }
        let outcome = self.last_outcome.as_ref()?;
        let line = if outcome.grading_failed() {
            "Your last answer could not be graded."
        } else if outcome.is_correct() {
            "Your last answer was correct."
        } else {
            "Your last answer was incorrect."
        };
        Some(line.to_string())
    }

    #[must_use]
    pub fn screen(&self) -> QuizScreen {
        let complete = self.snapshot.is_complete();
        QuizScreen {
            progress: self.snapshot.progress_label(),
            question: self
                .snapshot
                .current_question
                .as_ref()
                .map(|question| question.text().to_string()),
            input: self.input.clone(),
            input_disabled: self.grading || complete,
            can_submit: self.can_submit(),
            submit_label: if self.grading { "Grading..." } else { "Submit" },
            health: self.snapshot.health,
            health_notice: self.snapshot.health.is_degraded().then_some(DEGRADED_NOTICE),
            feedback: self.feedback(),
            report: if complete { self.report() } else { None },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use civics_core::model::Question;
    use civics_core::time::fixed_clock;
    use civics_core::{GradeVerdict, QuestionPool};
    use services::{Grader, GradingError};

    struct Fixed(Result<&'static str, &'static str>);

    #[async_trait]
    impl Grader for Fixed {
        async fn grade(&self, _: &Question, _: &str) -> Result<GradeVerdict, GradingError> {
            match self.0 {
                Ok(reply) => Ok(GradeVerdict::from_reply(reply)),
                Err(reason) => Err(GradingError::Configuration(reason.into())),
            }
        }
    }

    fn service(pool_size: usize, grader: Fixed) -> QuizService {
        let questions = (0..pool_size)
            .map(|i| Question::new(format!("Q{i}?"), [format!("A{i}")]).unwrap())
            .collect();
        QuizService::new(
            fixed_clock(),
            Arc::new(QuestionPool::new(questions).unwrap()),
            Arc::new(grader),
        )
        .with_seed(3)
    }

    async fn submit(vm: &mut QuizVm, answer: &str) {
        vm.set_input(answer.into());
        let (handle, answer) = vm.begin_submit().unwrap();
        let result = handle.submit_answer(&answer).await;
        vm.apply(result);
    }

    #[test]
    fn small_pool_maps_to_view_error() {
        let err = QuizVm::start(&service(4, Fixed(Ok("yes")))).unwrap_err();
        assert_eq!(err, ViewError::PoolTooSmall);
    }

    #[test]
    fn submit_requires_a_non_blank_answer() {
        let mut vm = QuizVm::start(&service(10, Fixed(Ok("yes")))).unwrap();
        let screen = vm.screen();
        assert_eq!(screen.progress.as_deref(), Some("Question 1 of 10"));
        assert!(!screen.can_submit);
        assert_eq!(screen.submit_label, "Submit");

        vm.set_input("   ".into());
        assert!(vm.begin_submit().is_none());

        vm.set_input("George Washington".into());
        assert!(vm.screen().can_submit);
    }

    #[test]
    fn grading_locks_the_form() {
        let mut vm = QuizVm::start(&service(10, Fixed(Ok("yes")))).unwrap();
        vm.set_input("an answer".into());
        let (_, answer) = vm.begin_submit().unwrap();
        assert_eq!(answer, "an answer");

        let screen = vm.screen();
        assert_eq!(screen.submit_label, "Grading...");
        assert!(screen.input_disabled);
        assert!(!screen.can_submit);
        assert!(vm.begin_submit().is_none());
    }

    #[tokio::test]
    async fn recorded_answer_clears_input_and_advances() {
        let mut vm = QuizVm::start(&service(10, Fixed(Ok("Yes\nCorrect.")))).unwrap();
        submit(&mut vm, "an answer").await;

        let screen = vm.screen();
        assert_eq!(screen.input, "");
        assert_eq!(screen.progress.as_deref(), Some("Question 2 of 10"));
        assert_eq!(screen.feedback.as_deref(), Some("Your last answer was correct."));
        assert_eq!(screen.health, ClassifierHealth::Ok);
        assert!(screen.health_notice.is_none());
        assert!(screen.report.is_none());
    }

    #[tokio::test]
    async fn six_correct_answers_show_the_report() {
        let mut vm = QuizVm::start(&service(12, Fixed(Ok("yes")))).unwrap();
        for _ in 0..6 {
            submit(&mut vm, "an answer").await;
        }

        let screen = vm.screen();
        assert!(screen.progress.is_none());
        assert!(screen.question.is_none());
        assert!(screen.input_disabled);
        let report = screen.report.unwrap();
        assert!(report.passed);
        assert_eq!(report.headline, "Congrats, you passed!");
        assert_eq!(report.rows.len(), 6);
    }

    #[tokio::test]
    async fn grading_failure_shows_degraded_notice() {
        let mut vm = QuizVm::start(&service(10, Fixed(Err("no key")))).unwrap();
        submit(&mut vm, "an answer").await;

        let screen = vm.screen();
        assert_eq!(screen.health, ClassifierHealth::Error);
        assert_eq!(screen.health_notice, Some(DEGRADED_NOTICE));
        assert_eq!(
            screen.feedback.as_deref(),
            Some("Your last answer could not be graded.")
        );
        assert_eq!(screen.progress.as_deref(), Some("Question 2 of 10"));
    }

    #[tokio::test]
    async fn rejection_keeps_input_and_explains() {
        let mut vm = QuizVm::start(&service(10, Fixed(Ok("yes")))).unwrap();
        vm.set_input("an answer".into());
        let (handle, _) = vm.begin_submit().unwrap();
        let result = handle.submit_answer("   ").await;
        vm.apply(result);

        let screen = vm.screen();
        assert_eq!(screen.input, "an answer");
        assert_eq!(screen.feedback.as_deref(), Some("Not submitted: answer is empty."));
        assert_eq!(screen.progress.as_deref(), Some("Question 1 of 10"));
    }
}
