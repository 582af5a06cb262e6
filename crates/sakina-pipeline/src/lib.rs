//! Safety-gated conversational response pipeline for the Sakina wellbeing
//! companion.
//!
//! Given a conversation history and a new user utterance, the pipeline drafts
//! a reply, scores it for crisis risk and cultural/therapeutic
//! appropriateness, and applies deterministic escalation rules before
//! anything reaches the caller:
//!
//! ```text
//! respond(history, user)
//!   → generator  — candidate reply from the companion persona
//!   → validator  — structured verdict (or an explicit absent marker)
//!   → policy     — pure precedence rules: pass / annotate / regenerate / crisis
//!   → result     — reply + structured safety metadata
//! ```
//!
//! The highest-risk path never contains model-generated text: a crisis
//! override substitutes a fixed, pre-approved template.

pub mod client;
pub mod config;
pub mod error;
pub mod generator;
pub mod pipeline;
pub mod policy;
pub mod prompts;
pub mod server;
pub mod validator;
pub mod verdict;

pub use client::{
    CompletionClient, CompletionRequest, Message, ModelParams, ProviderError, RigClient, Role,
};
pub use config::ServiceConfig;
pub use error::PipelineError;
pub use pipeline::{PipelineResult, ResponsePipeline, ValidatorMetadata};
pub use policy::{decide, EscalationOutcome, SafetyAnnotation};
pub use prompts::PromptSet;
pub use validator::{Assessment, ResponseValidator};
pub use verdict::{CrisisRisk, CulturalSensitivity, RecommendedAction, ValidatorVerdict};
