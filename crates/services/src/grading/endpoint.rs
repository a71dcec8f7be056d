use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use civics_core::GradeVerdict;
use civics_core::model::Question;

use super::Grader;
use super::route::{GradeReply, GradeRequest, GradeRequestError};
use crate::error::{GradingError, UpstreamError};

/// Where the grading endpoint lives.
#[derive(Clone, Debug)]
pub struct EndpointConfig {
    /// Full URL of the `POST` grading route, e.g. `http://127.0.0.1:3000/api/grade`.
    pub endpoint_url: String,
    pub request_timeout: Duration,
}

impl EndpointConfig {
    #[must_use]
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            request_timeout: super::classifier::DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Grades answers through a grading endpoint that holds the classifier credential.
#[derive(Clone)]
pub struct EndpointGrader {
    client: Client,
    config: EndpointConfig,
}

impl EndpointGrader {
    /// # Errors
    ///
    /// Returns `GradingError::Configuration` for a blank URL and
    /// `GradingError::Upstream` if the HTTP client cannot be built.
    pub fn new(config: EndpointConfig) -> Result<Self, GradingError> {
        if config.endpoint_url.trim().is_empty() {
            return Err(GradingError::Configuration(
                "grading endpoint URL is empty".into(),
            ));
        }
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl Grader for EndpointGrader {
    async fn grade(
        &self,
        question: &Question,
        user_answer: &str,
    ) -> Result<GradeVerdict, GradingError> {
        let request = GradeRequest {
            question: question.text().to_string(),
            answers: question.accepted_answers().to_vec(),
            user_answer: user_answer.to_string(),
        };

        let response = self
            .client
            .post(&self.config.endpoint_url)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        debug!(%status, url = %self.config.endpoint_url, "grading endpoint responded");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GradeRequestError>(&body)
                .map(|err| err.error)
                .unwrap_or(body);
            warn!(%status, error = %message, "grading endpoint reported a failure");
            return Err(UpstreamError::HttpStatus { status, message }.into());
        }

        let reply: GradeReply = response.json().await?;
        Ok(GradeVerdict::new(reply.is_correct, reply.ai_reply.trim()))
    }
}
