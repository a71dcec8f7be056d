use std::fmt;

use crate::model::outcome::GradeResolution;

/// Last known state of the grading classifier, shown separately from quiz scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClassifierHealth {
    /// Nothing has been graded yet.
    #[default]
    Unknown,
    /// The most recent grading call returned a verdict.
    Ok,
    /// The most recent grading call failed.
    Error,
}

impl ClassifierHealth {
    /// Health implied by the latest grading resolution. Earlier results do not matter.
    #[must_use]
    pub fn from_resolution(resolution: &GradeResolution) -> Self {
        if resolution.is_graded() {
            ClassifierHealth::Ok
        } else {
            ClassifierHealth::Error
        }
    }

    #[must_use]
    pub fn is_degraded(self) -> bool {
        matches!(self, ClassifierHealth::Error)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ClassifierHealth::Unknown => "unknown",
            ClassifierHealth::Ok => "ok",
            ClassifierHealth::Error => "error",
        }
    }
}

impl fmt::Display for ClassifierHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
