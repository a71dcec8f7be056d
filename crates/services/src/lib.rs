#![forbid(unsafe_code)]

pub mod error;
pub mod grading;
pub mod quiz;

pub use civics_core::Clock;

pub use error::{GradingError, QuizError, SubmitError, UpstreamError};
pub use grading::route::{GRADE_PATH, GradeReply, GradeRequest, grade_router};
pub use grading::{
    ClassifierConfig, ClassifierGrader, EndpointConfig, EndpointGrader, Grader,
};
pub use quiz::{QuizHandle, QuizService, SubmitOutcome};
