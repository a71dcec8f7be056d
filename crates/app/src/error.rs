use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use civics_core::pool::PoolError;
use services::{GradingError, QuizError};

/// Errors that stop the binary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("invalid {name} `{value}`: {source}")]
    InvalidUrl {
        name: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("could not read question pool {}: {source}", path.display())]
    PoolRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("question pool {origin} is invalid: {source}")]
    PoolInvalid {
        origin: String,
        #[source]
        source: PoolError,
    },

    #[error("question pool {origin} has {available} questions, a quiz needs {required}")]
    PoolTooSmall {
        origin: String,
        available: usize,
        required: usize,
    },

    #[error(transparent)]
    Grading(#[from] GradingError),

    #[error(transparent)]
    Quiz(#[from] QuizError),

    #[error("could not listen on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("this build has no desktop window; rebuild with `--features desktop` or use `quiz`")]
    DesktopUnavailable,
}
