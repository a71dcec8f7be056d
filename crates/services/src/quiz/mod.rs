mod handle;
mod service;

// Public API of the quiz subsystem.
pub use crate::error::{QuizError, SubmitError};
pub use handle::{QuizHandle, SubmitOutcome};
pub use service::QuizService;
