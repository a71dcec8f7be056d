mod health;
mod outcome;
mod question;
mod session;

pub use health::ClassifierHealth;
pub use outcome::{GradeResolution, Outcome};
pub use question::{Question, QuestionError};
pub use session::{
    PASS_THRESHOLD, QuizSession, QuizSnapshot, QuizStatus, SessionError, Submission,
    SubmitRejection, TOTAL_QUESTIONS,
};
