//! Turns parsed command-line options into validated service configuration.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use url::Url;

use civics_core::model::TOTAL_QUESTIONS;
use civics_core::{Clock, QuestionPool};
use services::{
    ClassifierConfig, ClassifierGrader, EndpointConfig, EndpointGrader, Grader, QuizService,
};

use crate::cli::{ClassifierArgs, QuizArgs};
use crate::error::AppError;

/// Environment variable consulted when `--api-key` / `CIVICS_AI_API_KEY` is not set.
pub const FALLBACK_API_KEY_VAR: &str = "OPENROUTER_API_KEY";

fn parse_url(name: &'static str, value: &str) -> Result<Url, AppError> {
    Url::parse(value).map_err(|source| AppError::InvalidUrl {
        name,
        value: value.to_string(),
        source,
    })
}

impl ClassifierArgs {
    /// Build the classifier configuration.
    ///
    /// A missing key is not an error here; grading reports it per submission.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidUrl` when the base URL does not parse.
    pub fn resolve(&self, fallback_key: Option<String>) -> Result<ClassifierConfig, AppError> {
        parse_url("classifier base URL", &self.base_url)?;
        let config = ClassifierConfig::new(self.api_key.clone().or(fallback_key))
            .with_base_url(self.base_url.clone())
            .with_model(self.model.clone())
            .with_max_tokens(self.max_tokens)
            .with_request_timeout(self.request_timeout());
        if config.api_key.is_none() {
            warn!("no classifier API key is set; answers cannot be graded");
        }
        Ok(config)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// How submissions get graded.
#[derive(Debug, Clone)]
pub enum GradingMode {
    /// Call the classifier from this process.
    Direct(ClassifierConfig),
    /// Post to a grading endpoint that holds the credential.
    Endpoint(EndpointConfig),
}

impl GradingMode {
    /// # Errors
    ///
    /// Returns `AppError::InvalidUrl` for an unparseable URL.
    pub fn from_args(args: &QuizArgs, fallback_key: Option<String>) -> Result<Self, AppError> {
        match &args.grader_url {
            Some(endpoint) => {
                parse_url("grader URL", endpoint)?;
                Ok(GradingMode::Endpoint(
                    EndpointConfig::new(endpoint.clone())
                        .with_request_timeout(args.classifier.request_timeout()),
                ))
            }
            None => Ok(GradingMode::Direct(args.classifier.resolve(fallback_key)?)),
        }
    }

    /// # Errors
    ///
    /// Returns `AppError::Grading` if the HTTP client cannot be built.
    pub fn into_grader(self) -> Result<Arc<dyn Grader>, AppError> {
        let grader: Arc<dyn Grader> = match self {
            GradingMode::Direct(config) => {
                info!(base_url = %config.base_url, model = %config.model, "grading with classifier");
                Arc::new(ClassifierGrader::new(config)?)
            }
            GradingMode::Endpoint(config) => {
                info!(endpoint = %config.endpoint_url, "grading through endpoint");
                Arc::new(EndpointGrader::new(config)?)
            }
        };
        Ok(grader)
    }
}

/// Load the question pool from `path`, or the built-in pool.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or holds fewer than
/// [`TOTAL_QUESTIONS`] questions.
pub fn load_pool(path: Option<&Path>) -> Result<QuestionPool, AppError> {
    let (origin, pool) = match path {
        Some(path) => {
            let origin = path.display().to_string();
            let json = std::fs::read_to_string(path).map_err(|source| AppError::PoolRead {
                path: path.to_path_buf(),
                source,
            })?;
            let pool = QuestionPool::from_json(&json).map_err(|source| AppError::PoolInvalid {
                origin: origin.clone(),
                source,
            })?;
            (origin, pool)
        }
        None => {
            let origin = "built-in".to_string();
            let pool = QuestionPool::builtin().map_err(|source| AppError::PoolInvalid {
                origin: origin.clone(),
                source,
            })?;
            (origin, pool)
        }
    };

    if pool.len() < TOTAL_QUESTIONS {
        return Err(AppError::PoolTooSmall {
            origin,
            available: pool.len(),
            required: TOTAL_QUESTIONS,
        });
    }
    info!(origin = %origin, questions = pool.len(), "question pool loaded");
    Ok(pool)
}

/// Assemble the quiz service for the `quiz` and `ui` commands.
///
/// # Errors
///
/// Returns the first configuration problem found.
pub fn build_quiz_service(
    args: &QuizArgs,
    fallback_key: Option<String>,
) -> Result<QuizService, AppError> {
    let pool = load_pool(args.questions.as_deref())?;
    let grader = GradingMode::from_args(args, fallback_key)?.into_grader()?;
    let service = QuizService::new(Clock::system(), Arc::new(pool), grader);
    Ok(match args.seed {
        Some(seed) => service.with_seed(seed),
        None => service,
    })
}
