//! Completion-service capability abstraction.
//!
//! Both pipeline stages talk to the provider through the [`CompletionClient`]
//! trait so that tests can substitute a deterministic stub and production code
//! can swap providers without touching the decision logic. The shipped
//! implementation, [`RigClient`], targets any OpenAI-compatible endpoint via
//! Rig.
//!
//! A single `complete` call is exactly one provider attempt — no retries, no
//! fallback. Recovery policy lives in the pipeline, not here.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use rig::client::CompletionClient as _;
use rig::completion::Chat;
use rig::providers::openai;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::ServiceConfig;
use crate::error::PipelineError;

/// Author of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
            Self::System => write!(f, "system"),
        }
    }
}

/// One role-tagged turn of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// Model selection and sampling parameters for a single completion call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelParams {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u64,
}

/// Immutable request handed to a [`CompletionClient`].
///
/// The full role-tagged sequence is `preamble` (system) + `history` +
/// `prompt` (the final user turn).
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub preamble: String,
    pub history: Vec<Message>,
    pub prompt: String,
    pub params: ModelParams,
}

/// Failure of a single provider attempt.
///
/// Transport errors, authentication failures, and provider-side refusals all
/// surface through the SDK as [`ProviderError::Completion`]; an exceeded
/// deadline is reported separately so callers can tune timeouts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("completion request failed: {0}")]
    Completion(String),

    #[error("completion request timed out after {seconds}s")]
    Timeout { seconds: u64 },
}

/// Capability abstraction over "send role-tagged messages to a named model,
/// get back text".
///
/// Stateless and side-effect free beyond the network call itself. One call is
/// one attempt.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError>;
}

/// Rig-backed [`CompletionClient`] for OpenAI-compatible endpoints.
///
/// Model selection happens per call via [`ModelParams`], so one client serves
/// both the primary generator and the validator role.
#[derive(Debug)]
pub struct RigClient {
    client: openai::CompletionsClient,
    timeout: Duration,
}

impl RigClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = openai::CompletionsClient::builder()
            .api_key(api_key)
            .base_url(base_url)
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build completion client: {e}"))?;
        Ok(Self { client, timeout })
    }

    /// Build from service configuration.
    ///
    /// Fails with [`PipelineError::Configuration`] when no provider credential
    /// is present — before any provider call is made.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, PipelineError> {
        let api_key = config.provider.api_key.as_deref().ok_or_else(|| {
            PipelineError::Configuration("SAKINA_API_KEY (or OPENAI_API_KEY) not set".into())
        })?;
        Self::new(
            &config.provider.base_url,
            api_key,
            Duration::from_secs(config.request_timeout_secs),
        )
        .map_err(|e| PipelineError::Configuration(e.to_string()))
    }
}

#[async_trait]
impl CompletionClient for RigClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        let mut preamble = request.preamble;
        let mut history = Vec::with_capacity(request.history.len());
        for msg in request.history {
            match msg.role {
                Role::User => history.push(rig::completion::Message::user(msg.content)),
                Role::Assistant => history.push(rig::completion::Message::assistant(msg.content)),
                // Rig chat history carries user/assistant turns only; mid-history
                // system directives fold into the preamble in order.
                Role::System => {
                    preamble.push_str("\n\n");
                    preamble.push_str(&msg.content);
                }
            }
        }

        let agent = self
            .client
            .agent(&request.params.model)
            .preamble(&preamble)
            .temperature(request.params.temperature)
            .max_tokens(request.params.max_tokens)
            .build();

        debug!(
            model = %request.params.model,
            temperature = request.params.temperature,
            history_len = history.len(),
            "completion call"
        );

        match tokio::time::timeout(self.timeout, agent.chat(request.prompt.as_str(), history)).await
        {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(ProviderError::Completion(e.to_string())),
            Err(_) => Err(ProviderError::Timeout {
                seconds: self.timeout.as_secs(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderEndpoint;

    fn config_with_key(api_key: Option<&str>) -> ServiceConfig {
        ServiceConfig {
            provider: ProviderEndpoint {
                base_url: "http://localhost:9".into(),
                api_key: api_key.map(String::from),
            },
            generator: ModelParams {
                model: "gen".into(),
                temperature: 0.7,
                max_tokens: 512,
            },
            validator: ModelParams {
                model: "judge".into(),
                temperature: 0.0,
                max_tokens: 512,
            },
            request_timeout_secs: 30,
            context_window: 3,
        }
    }

    #[test]
    fn missing_credential_fails_fatally_before_any_call() {
        let err = RigClient::from_config(&config_with_key(None)).unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));
        assert!(err.is_fatal());
        assert!(err.to_string().contains("SAKINA_API_KEY"));
    }

    #[test]
    fn configured_credential_builds_a_client() {
        assert!(RigClient::from_config(&config_with_key(Some("test-key"))).is_ok());
    }

    #[test]
    fn role_round_trips_through_wire_names() {
        let json = serde_json::to_string(&Role::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
        let role: Role = serde_json::from_str("\"system\"").unwrap();
        assert_eq!(role, Role::System);
    }

    #[test]
    fn message_constructors_tag_roles() {
        assert_eq!(Message::user("hi").role, Role::User);
        assert_eq!(Message::assistant("hello").role, Role::Assistant);
        assert_eq!(Message::system("rules").role, Role::System);
    }

    #[test]
    fn provider_error_display() {
        let e = ProviderError::Timeout { seconds: 30 };
        assert_eq!(e.to_string(), "completion request timed out after 30s");
        let e = ProviderError::Completion("401 unauthorized".into());
        assert!(e.to_string().contains("401"));
    }
}
