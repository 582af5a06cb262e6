//! Primary reply generation against the companion persona.

use std::sync::Arc;

use tracing::debug;

use crate::client::{CompletionClient, CompletionRequest, Message, ModelParams};
use crate::error::PipelineError;

/// Drafts candidate replies from the full caller-supplied conversation.
///
/// Caller history is borrowed and never mutated; each call builds a fresh
/// immutable [`CompletionRequest`].
pub struct PrimaryGenerator {
    client: Arc<dyn CompletionClient>,
    params: ModelParams,
    persona: String,
}

impl PrimaryGenerator {
    pub fn new(client: Arc<dyn CompletionClient>, params: ModelParams, persona: String) -> Self {
        Self {
            client,
            params,
            persona,
        }
    }

    /// Produce a candidate reply for the new user utterance.
    ///
    /// # Errors
    ///
    /// Fails with [`PipelineError::Generation`] on any provider failure —
    /// there is no safe reply without a primary draft.
    pub async fn draft(&self, history: &[Message], user: &str) -> Result<String, PipelineError> {
        debug!(history_len = history.len(), "drafting primary reply");
        let request = CompletionRequest {
            preamble: self.persona.clone(),
            history: history.to_vec(),
            prompt: user.to_string(),
            params: self.params.clone(),
        };
        self.client
            .complete(request)
            .await
            .map_err(PipelineError::Generation)
    }

    /// Reissue generation over the same conversation with a modification
    /// instruction from the validator.
    ///
    /// # Errors
    ///
    /// Fails with [`PipelineError::Regeneration`]; the pipeline recovers this
    /// by falling back to the original draft.
    pub async fn apply_modifications(
        &self,
        history: &[Message],
        user: &str,
        instructions: &str,
    ) -> Result<String, PipelineError> {
        debug!(history_len = history.len(), "regenerating with modifications");
        let mut conversation = history.to_vec();
        conversation.push(Message::user(user));
        let request = CompletionRequest {
            preamble: self.persona.clone(),
            history: conversation,
            prompt: format!("Modify your previous response as follows: {instructions}"),
            params: self.params.clone(),
        };
        self.client
            .complete(request)
            .await
            .map_err(PipelineError::Regeneration)
    }
}
