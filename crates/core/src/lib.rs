#![forbid(unsafe_code)]

pub mod error;
pub mod grading;
pub mod model;
pub mod pool;
pub mod report;
pub mod time;

pub use error::Error;
pub use grading::GradeVerdict;
pub use pool::QuestionPool;
pub use report::ResultReport;
pub use time::Clock;
