use crate::grading::GradeVerdict;
use crate::model::question::Question;

//
// ─── RESOLUTION ────────────────────────────────────────────────────────────────
//

/// How a single submission was resolved by the grading layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradeResolution {
    /// The classifier answered; its verdict is used as-is.
    Graded(GradeVerdict),
    /// The classifier could not be reached or its reply could not be read.
    ///
    /// Scored as incorrect, but recorded as a grading failure.
    Unavailable { reason: String },
}

impl GradeResolution {
    #[must_use]
    pub fn is_graded(&self) -> bool {
        matches!(self, GradeResolution::Graded(_))
    }
}

//
// ─── OUTCOME ───────────────────────────────────────────────────────────────────
//

/// Immutable record of one answered question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    question: Question,
    user_answer: String,
    is_correct: bool,
    rationale: String,
    grading_failed: bool,
}

impl Outcome {
    pub(crate) fn from_resolution(
        question: Question,
        user_answer: String,
        resolution: GradeResolution,
    ) -> Self {
        let (is_correct, rationale, grading_failed) = match resolution {
            GradeResolution::Graded(verdict) => (verdict.is_correct, verdict.rationale, false),
            GradeResolution::Unavailable { reason } => {
                (false, format!("Grading unavailable: {reason}"), true)
            }
        };

        Self {
            question,
            user_answer,
            is_correct,
            rationale,
            grading_failed,
        }
    }

    #[must_use]
    pub fn question(&self) -> &Question {
        &self.question
    }

    #[must_use]
    pub fn user_answer(&self) -> &str {
        &self.user_answer
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    #[must_use]
    pub fn rationale(&self) -> &str {
        &self.rationale
    }

    /// True when no verdict could be obtained and the answer was scored as incorrect.
    #[must_use]
    pub fn grading_failed(&self) -> bool {
        self.grading_failed
    }

    #[must_use]
    pub fn accepted_answers(&self) -> &[String] {
        self.question.accepted_answers()
    }
}
