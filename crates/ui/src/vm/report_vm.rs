use chrono::{DateTime, Utc};

use civics_core::ResultReport;
use civics_core::report::ReportEntry;

use crate::vm::time_fmt::format_elapsed;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportRowVm {
    pub label: String,
    pub question: String,
    pub user_answer: String,
    pub verdict: &'static str,
    pub is_correct: bool,
    pub accepted_answers: String,
    /// Shown only when the answer could not be graded.
    pub note: Option<String>,
}

impl From<&ReportEntry> for ReportRowVm {
    fn from(entry: &ReportEntry) -> Self {
        let verdict = if entry.is_correct {
            "Correct"
        } else if entry.grading_failed {
            "Not graded"
        } else {
            "Incorrect"
        };
        Self {
            label: format!("Question {}", entry.number),
            question: entry.question.clone(),
            user_answer: entry.user_answer.clone(),
            verdict,
            is_correct: entry.is_correct,
            accepted_answers: entry.accepted_answers.join("; "),
            note: entry.grading_failed.then(|| entry.rationale.clone()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportVm {
    pub passed: bool,
    pub headline: &'static str,
    pub summary: String,
    pub elapsed: Option<String>,
    pub rows: Vec<ReportRowVm>,
}

#[must_use]
pub fn map_report(
    report: &ResultReport,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
) -> ReportVm {
    ReportVm {
        passed: report.passed(),
        headline: report.headline(),
        summary: report.summary(),
        elapsed: completed_at.map(|finished| format!("Finished in {}", format_elapsed(started_at, finished))),
        rows: report.entries.iter().map(ReportRowVm::from).collect(),
    }
}
