#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    PoolTooSmall,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::PoolTooSmall => "There are not enough questions to run a quiz.",
            ViewError::Unknown => "Something went wrong. Please try again.",
        }
    }
}
