//! Structured safety verdict decoded from validator model output.
//!
//! Malformed output is a normal, expected case: decoding is strict, but
//! failure yields `None` rather than an error, and the pipeline treats an
//! absent verdict as a first-class degraded state.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Assessed crisis risk level for the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CrisisRisk {
    Low,
    Medium,
    High,
}

/// Cultural appropriateness of the candidate reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CulturalSensitivity {
    Appropriate,
    NeedsAdjustment,
    Inappropriate,
}

/// Validator's recommended disposition for the candidate reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecommendedAction {
    Proceed,
    Modify,
    Escalate,
    CrisisIntervention,
}

/// Full structured assessment of one (user input, candidate reply) exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorVerdict {
    pub crisis_risk: CrisisRisk,
    #[serde(default)]
    pub crisis_indicators: Vec<String>,
    pub cultural_sensitivity: CulturalSensitivity,
    /// 1 (poor) to 10 (excellent).
    pub therapeutic_quality: u8,
    pub recommended_action: RecommendedAction,
    #[serde(default)]
    pub modifications_needed: Option<String>,
    pub emergency_trigger: bool,
}

impl ValidatorVerdict {
    /// Decode a verdict from raw model output.
    ///
    /// Tolerates a code fence or surrounding prose around the JSON object.
    /// Missing required fields, non-conforming enum values, or an
    /// out-of-range quality score all yield `None`.
    pub fn from_llm_response(raw: &str) -> Option<Self> {
        let json = extract_json_block(raw)?;
        let verdict: Self = match serde_json::from_str(json) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "validator output failed schema decode");
                return None;
            }
        };
        if !(1..=10).contains(&verdict.therapeutic_quality) {
            warn!(
                quality = verdict.therapeutic_quality,
                "therapeutic_quality out of range"
            );
            return None;
        }
        Some(verdict)
    }

    /// The trimmed modification instructions, if the validator both
    /// recommended MODIFY and actually supplied non-empty suggestions.
    pub fn wants_modification(&self) -> Option<&str> {
        if self.recommended_action != RecommendedAction::Modify {
            return None;
        }
        self.modifications_needed
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}

/// Isolate the verdict JSON from whatever wrapping the model added.
///
/// Validator models asked for "ONLY a JSON object" still fence it or preface
/// it with prose often enough that both shapes must decode.
fn extract_json_block(text: &str) -> Option<&str> {
    // A ```json fence, when present, bounds the object exactly.
    if let Some(start) = text.find("```json") {
        let json_start = start + 7;
        if let Some(end) = text[json_start..].find("```") {
            return Some(text[json_start..json_start + end].trim());
        }
    }

    // No fence: take the widest brace-delimited span.
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}
