use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use civics_core::GradeVerdict;
use civics_core::grading::{SYSTEM_PROMPT, build_prompt};
use civics_core::model::Question;

use super::Grader;
use crate::error::{GradingError, UpstreamError};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "meta-llama/llama-4-maverick:free";
pub const DEFAULT_MAX_TOKENS: u32 = 100;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for an OpenAI-compatible chat-completions classifier.
#[derive(Clone)]
pub struct ClassifierConfig {
    pub base_url: String,
    /// Bearer credential. `None` makes every grading call fail with a
    /// configuration error.
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub request_timeout: Duration,
}

impl ClassifierConfig {
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            model: DEFAULT_MODEL.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            request_timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl fmt::Debug for ClassifierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &credential_state(self.api_key.as_deref()))
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

/// Printable stand-in for a credential.
#[must_use]
pub fn credential_state(key: Option<&str>) -> &'static str {
    match key {
        Some(_) => "<set>",
        None => "<unset>",
    }
}

/// Grades answers by asking a hosted language model directly.
#[derive(Clone)]
pub struct ClassifierGrader {
    client: Client,
    config: ClassifierConfig,
}

impl ClassifierGrader {
    /// # Errors
    ///
    /// Returns `GradingError::Upstream` if the HTTP client cannot be built.
    pub fn new(config: ClassifierConfig) -> Result<Self, GradingError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Send one prompt and return the raw reply text.
    ///
    /// A reply without any message content is returned as an empty string.
    ///
    /// # Errors
    ///
    /// Returns `GradingError::Configuration` without a credential and
    /// `GradingError::Upstream` for transport, status, or decoding failures.
    pub async fn complete(&self, prompt: &str) -> Result<String, GradingError> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            GradingError::Configuration("no classifier API key is set".into())
        })?;

        let payload = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        debug!(%status, model = %self.config.model, "classifier responded");
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(%status, body = %message, "classifier rejected grading request");
            return Err(UpstreamError::HttpStatus { status, message }.into());
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        Ok(content)
    }
}

#[async_trait]
impl Grader for ClassifierGrader {
    async fn grade(
        &self,
        question: &Question,
        user_answer: &str,
    ) -> Result<GradeVerdict, GradingError> {
        let prompt = build_prompt(question, user_answer);
        debug!(question = question.text(), user_answer, "grading answer");
        let reply = self.complete(&prompt).await?;
        debug!(reply = %reply, "classifier reply");
        Ok(GradeVerdict::from_reply(reply))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_api_key_counts_as_missing() {
        let config = ClassifierConfig::new(Some("   ".into()));
        assert!(config.api_key.is_none());
        let config = ClassifierConfig::new(Some("sk-test".into()));
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn completions_url_tolerates_trailing_slash() {
        let config = ClassifierConfig::new(None).with_base_url("http://localhost:9000/v1/");
        assert_eq!(
            config.completions_url(),
            "http://localhost:9000/v1/chat/completions"
        );
    }

    #[test]
    fn request_body_matches_chat_completions_shape() {
        let payload = ChatRequest {
            model: "m",
            messages: vec![ChatMessage {
                role: "user",
                content: "hi",
            }],
            max_tokens: 100,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "m",
                "messages": [{ "role": "user", "content": "hi" }],
                "max_tokens": 100
            })
        );
    }

    #[test]
    fn missing_choices_decode_as_empty() {
        let body: ChatResponse = serde_json::from_str("{}").unwrap();
        assert!(body.choices.is_empty());
        let body: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(body.choices[0].message.content.is_none());
    }

    #[test]
    fn debug_output_hides_the_api_key() {
        let config = ClassifierConfig::new(Some("sk-secret".into()));
        let printed = format!("{config:?}");
        assert!(!printed.contains("sk-secret"), "{printed}");
        assert!(printed.contains("api_key: \"<set>\""), "{printed}");

        let printed = format!("{:?}", ClassifierConfig::new(None));
        assert!(printed.contains("api_key: \"<unset>\""), "{printed}");
    }

    #[tokio::test]
    async fn missing_credential_is_a_configuration_error() {
        let grader = ClassifierGrader::new(ClassifierConfig::new(None)).unwrap();
        let question = Question::new("Q?", ["A"]).unwrap();
        let err = grader.grade(&question, "A").await.unwrap_err();
        assert!(err.is_configuration(), "unexpected error: {err}");
    }
}
