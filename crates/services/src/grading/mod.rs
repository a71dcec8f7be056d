mod classifier;
mod endpoint;
pub mod route;

use async_trait::async_trait;

use civics_core::GradeVerdict;
use civics_core::model::Question;

use crate::error::GradingError;

pub use classifier::{
    ClassifierConfig, ClassifierGrader, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
    DEFAULT_TIMEOUT, credential_state,
};
pub use endpoint::{EndpointConfig, EndpointGrader};

/// Judges a free-text answer against a question's accepted answers.
///
/// Implementations make exactly one attempt per call.
#[async_trait]
pub trait Grader: Send + Sync {
    /// # Errors
    ///
    /// Returns `GradingError::Configuration` when the grader cannot be used at
    /// all and `GradingError::Upstream` when the classifier call fails.
    async fn grade(
        &self,
        question: &Question,
        user_answer: &str,
    ) -> Result<GradeVerdict, GradingError>;
}
