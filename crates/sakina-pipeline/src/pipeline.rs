//! End-to-end response pipeline orchestration.
//!
//! Runs generation → validation → escalation → (conditional) regeneration for
//! a single request and assembles the final result envelope:
//!
//! ```text
//! ResponsePipeline::respond(history, user)
//!   → PrimaryGenerator::draft          — fatal on provider failure
//!   → ResponseValidator::assess        — total; absence is first-class
//!   → policy::decide                   — pure precedence rules
//!   → PrimaryGenerator::apply_modifications (only for the MODIFY outcome;
//!     failure falls back to the original draft plus a note)
//! ```
//!
//! No shared mutable state across requests; the pipeline is shared behind an
//! `Arc` and every invocation is independent.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::client::{CompletionClient, Message};
use crate::config::ServiceConfig;
use crate::error::PipelineError;
use crate::generator::PrimaryGenerator;
use crate::policy::{self, EscalationOutcome, SafetyAnnotation};
use crate::prompts::PromptSet;
use crate::validator::{Assessment, ResponseValidator};
use crate::verdict::ValidatorVerdict;

/// Raw validator output carried in the result envelope: either the decoded
/// verdict or the reason it is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValidatorMetadata {
    Verdict(ValidatorVerdict),
    Unavailable { error: String },
}

/// The only externally observable output of a request. Immutable once built.
///
/// Invariants: `crisis == true` iff `reply` equals the crisis template;
/// `modifications_applied == true` iff a regeneration call ran and succeeded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    pub reply: String,
    pub crisis: bool,
    pub crisis_indicators: Vec<String>,
    /// Empty when no safety note applies.
    pub safety_note: String,
    pub modifications_applied: bool,
    pub validator_metadata: ValidatorMetadata,
}

/// Orchestrates the two-stage generate-and-validate flow.
pub struct ResponsePipeline {
    generator: PrimaryGenerator,
    validator: ResponseValidator,
    prompts: PromptSet,
}

impl ResponsePipeline {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        config: &ServiceConfig,
        prompts: PromptSet,
    ) -> Self {
        let generator = PrimaryGenerator::new(
            client.clone(),
            config.generator.clone(),
            prompts.persona.clone(),
        );
        let validator = ResponseValidator::new(
            client,
            config.validator.clone(),
            prompts.validator_instruction.clone(),
            config.context_window,
        );
        Self {
            generator,
            validator,
            prompts,
        }
    }

    /// Process one request: screen a reply to `user` given `history`.
    ///
    /// # Errors
    ///
    /// Only fatal errors propagate ([`PipelineError::Generation`]); validator
    /// and regeneration failures are absorbed into degraded outcomes with an
    /// explicit note.
    pub async fn respond(
        &self,
        history: &[Message],
        user: &str,
    ) -> Result<PipelineResult, PipelineError> {
        let draft = self.generator.draft(history, user).await?;
        debug!(draft_len = draft.len(), "primary draft produced");

        let assessment = self.validator.assess(user, &draft, history).await;
        let outcome = policy::decide(assessment.verdict());
        info!(outcome = outcome.label(), "escalation outcome selected");

        let crisis_indicators = assessment
            .verdict()
            .map(|v| v.crisis_indicators.clone())
            .unwrap_or_default();
        let validator_metadata = match &assessment {
            Assessment::Present(v) => ValidatorMetadata::Verdict(v.clone()),
            Assessment::Absent { reason } => ValidatorMetadata::Unavailable {
                error: reason.clone(),
            },
        };

        let mut reply = draft.clone();
        let mut crisis = false;
        let mut safety_note = String::new();
        let mut modifications_applied = false;

        match outcome {
            EscalationOutcome::PassThrough => {}
            EscalationOutcome::CrisisOverride => {
                warn!("crisis override engaged; substituting fixed template");
                reply = self.prompts.crisis_template.clone();
                crisis = true;
            }
            EscalationOutcome::AnnotatedPassThrough(annotation) => {
                let note = match annotation {
                    SafetyAnnotation::ValidationUnavailable => {
                        &self.prompts.validation_unavailable_note
                    }
                    SafetyAnnotation::ElevatedRisk => &self.prompts.elevated_risk_note,
                };
                safety_note = note.clone();
                reply = format!("{draft}\n\n[Safety Note: {note}]");
            }
            EscalationOutcome::RegenerateWithModification { instructions } => {
                match self
                    .generator
                    .apply_modifications(history, user, &instructions)
                    .await
                {
                    Ok(modified) => {
                        reply = modified;
                        modifications_applied = true;
                    }
                    Err(e) => {
                        // A failed improvement attempt never fails the request.
                        warn!(error = %e, "modification attempt failed; keeping original draft");
                        reply = format!(
                            "{draft}\n\n[Note: {}]",
                            self.prompts.modification_failed_note
                        );
                    }
                }
            }
        }

        Ok(PipelineResult {
            reply,
            crisis,
            crisis_indicators,
            safety_note,
            modifications_applied,
            validator_metadata,
        })
    }
}
