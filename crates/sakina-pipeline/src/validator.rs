//! Clinical safety validation of candidate replies.
//!
//! The validator is total: every call yields either a present verdict or an
//! explicit absent marker with a diagnostic. It never retries, never blocks
//! beyond the per-call timeout, and never puts the pipeline into a fatal
//! state.

use std::sync::Arc;

use tracing::warn;

use crate::client::{CompletionClient, CompletionRequest, Message, ModelParams};
use crate::error::PipelineError;
use crate::verdict::ValidatorVerdict;

/// Outcome of one validation call.
#[derive(Debug, Clone, PartialEq)]
pub enum Assessment {
    Present(ValidatorVerdict),
    /// The call failed or the output did not conform to the schema.
    Absent { reason: String },
}

impl Assessment {
    pub fn verdict(&self) -> Option<&ValidatorVerdict> {
        match self {
            Self::Present(v) => Some(v),
            Self::Absent { .. } => None,
        }
    }
}

/// Scores a candidate reply for crisis risk and cultural/therapeutic quality.
pub struct ResponseValidator {
    client: Arc<dyn CompletionClient>,
    params: ModelParams,
    instruction: String,
    /// Trailing history messages rendered into the context block.
    context_window: usize,
}

impl ResponseValidator {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        params: ModelParams,
        instruction: String,
        context_window: usize,
    ) -> Self {
        Self {
            client,
            params,
            instruction,
            context_window,
        }
    }

    /// Assess one exchange. Total — failures collapse to [`Assessment::Absent`].
    pub async fn assess(
        &self,
        user: &str,
        candidate: &str,
        history: &[Message],
    ) -> Assessment {
        let request = CompletionRequest {
            preamble: self.instruction.clone(),
            history: Vec::new(),
            prompt: self.render_exchange(user, candidate, history),
            params: self.params.clone(),
        };

        let raw = match self.client.complete(request).await {
            Ok(raw) => raw,
            Err(e) => {
                let err = PipelineError::ValidationUnavailable(e.to_string());
                warn!(error = %err, "validator call failed");
                return Assessment::Absent {
                    reason: err.to_string(),
                };
            }
        };

        match ValidatorVerdict::from_llm_response(&raw) {
            Some(verdict) => Assessment::Present(verdict),
            None => {
                warn!(raw_len = raw.len(), "validator output did not conform to schema");
                Assessment::Absent {
                    reason: PipelineError::ValidationUnavailable(
                        "output did not conform to verdict schema".into(),
                    )
                    .to_string(),
                }
            }
        }
    }

    /// Render the compact context block the validator evaluates.
    fn render_exchange(&self, user: &str, candidate: &str, history: &[Message]) -> String {
        let tail_start = history.len().saturating_sub(self.context_window);
        let recent: Vec<String> = history[tail_start..]
            .iter()
            .map(|m| format!("{}: {}", m.role.to_string().to_uppercase(), m.content))
            .collect();
        format!(
            "USER INPUT: {user}\nCANDIDATE REPLY: {candidate}\nRECENT CONTEXT:\n{}",
            recent.join("\n")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ProviderError;
    use async_trait::async_trait;

    struct FixedClient(Result<String, ProviderError>);

    #[async_trait]
    impl CompletionClient for FixedClient {
        async fn complete(&self, _request: CompletionRequest) -> Result<String, ProviderError> {
            self.0.clone()
        }
    }

    fn validator(reply: Result<String, ProviderError>) -> ResponseValidator {
        ResponseValidator::new(
            Arc::new(FixedClient(reply)),
            ModelParams {
                model: "judge".into(),
                temperature: 0.0,
                max_tokens: 512,
            },
            "INSTRUCTION".into(),
            3,
        )
    }

    fn verdict_json() -> String {
        serde_json::json!({
            "crisis_risk": "LOW",
            "crisis_indicators": [],
            "cultural_sensitivity": "APPROPRIATE",
            "therapeutic_quality": 8,
            "recommended_action": "PROCEED",
            "modifications_needed": null,
            "emergency_trigger": false
        })
        .to_string()
    }

    #[tokio::test]
    async fn conforming_output_is_present() {
        let v = validator(Ok(verdict_json()));
        let assessment = v.assess("hi", "hello", &[]).await;
        assert!(assessment.verdict().is_some());
    }

    #[tokio::test]
    async fn provider_failure_is_absent_not_fatal() {
        let v = validator(Err(ProviderError::Completion("refused".into())));
        let assessment = v.assess("hi", "hello", &[]).await;
        assert!(assessment.verdict().is_none());
        match assessment {
            Assessment::Absent { reason } => assert!(reason.contains("refused")),
            Assessment::Present(_) => panic!("expected absent"),
        }
    }

    #[tokio::test]
    async fn unparseable_output_is_absent() {
        let v = validator(Ok("looks fine to me".into()));
        let assessment = v.assess("hi", "hello", &[]).await;
        assert!(assessment.verdict().is_none());
    }

    #[test]
    fn context_block_renders_last_three_messages() {
        let v = validator(Ok(String::new()));
        let history = vec![
            Message::user("one"),
            Message::assistant("two"),
            Message::user("three"),
            Message::assistant("four"),
        ];
        let block = v.render_exchange("help", "a reply", &history);
        assert!(block.starts_with("USER INPUT: help\nCANDIDATE REPLY: a reply\n"));
        assert!(!block.contains("one"));
        assert!(block.contains("ASSISTANT: two"));
        assert!(block.contains("USER: three"));
        assert!(block.contains("ASSISTANT: four"));
    }

    #[test]
    fn context_block_handles_short_history() {
        let v = validator(Ok(String::new()));
        let block = v.render_exchange("help", "a reply", &[]);
        assert!(block.ends_with("RECENT CONTEXT:\n"));
    }
}
