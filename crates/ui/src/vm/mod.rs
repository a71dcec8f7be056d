mod quiz_vm;
mod report_vm;
mod time_fmt;

pub use quiz_vm::{DEGRADED_NOTICE, QuizScreen, QuizVm};
pub use report_vm::{ReportRowVm, ReportVm, map_report};
