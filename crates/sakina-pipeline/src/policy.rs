//! Escalation decision logic: a pure mapping from verdict to outcome.
//!
//! Rules are evaluated in strict precedence order; the first match wins and
//! ordering is load-bearing (an emergency trigger always overrides a
//! simultaneous MODIFY recommendation, and MEDIUM risk overrides MODIFY).
//!
//! | # | Condition                                   | Outcome                          |
//! |---|---------------------------------------------|----------------------------------|
//! | 1 | verdict absent                              | annotated (validation unavailable) |
//! | 2 | emergency_trigger OR crisis_risk == HIGH    | crisis override                  |
//! | 3 | crisis_risk == MEDIUM                       | annotated (elevated risk)        |
//! | 4 | MODIFY with non-empty modifications_needed  | regenerate with modification     |
//! | 5 | otherwise                                   | pass through                     |

use crate::verdict::{CrisisRisk, ValidatorVerdict};

/// Which fixed note an annotated pass-through carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafetyAnnotation {
    /// The validator failed or returned unparseable output; warn rather than
    /// silently trust an unverified reply.
    ValidationUnavailable,
    /// Risk is elevated but not acute; append a supportive note.
    ElevatedRisk,
}

/// Disposition selected for a candidate reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscalationOutcome {
    /// Return the primary reply unchanged.
    PassThrough,
    /// Return the primary reply with a fixed safety note appended.
    AnnotatedPassThrough(SafetyAnnotation),
    /// Reissue generation applying the validator's suggestions.
    RegenerateWithModification { instructions: String },
    /// Discard the primary reply and substitute the fixed crisis template.
    CrisisOverride,
}

impl EscalationOutcome {
    /// Short label for structured logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::PassThrough => "pass_through",
            Self::AnnotatedPassThrough(SafetyAnnotation::ValidationUnavailable) => {
                "annotated_unvalidated"
            }
            Self::AnnotatedPassThrough(SafetyAnnotation::ElevatedRisk) => "annotated_elevated_risk",
            Self::RegenerateWithModification { .. } => "regenerate_with_modification",
            Self::CrisisOverride => "crisis_override",
        }
    }
}

/// Select the outcome for a candidate reply given its verdict (or absence).
///
/// Pure: no I/O, no state. The caller executes the selected outcome.
pub fn decide(verdict: Option<&ValidatorVerdict>) -> EscalationOutcome {
    let Some(v) = verdict else {
        return EscalationOutcome::AnnotatedPassThrough(SafetyAnnotation::ValidationUnavailable);
    };
    if v.emergency_trigger || v.crisis_risk == CrisisRisk::High {
        return EscalationOutcome::CrisisOverride;
    }
    if v.crisis_risk == CrisisRisk::Medium {
        return EscalationOutcome::AnnotatedPassThrough(SafetyAnnotation::ElevatedRisk);
    }
    if let Some(instructions) = v.wants_modification() {
        return EscalationOutcome::RegenerateWithModification {
            instructions: instructions.to_string(),
        };
    }
    EscalationOutcome::PassThrough
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verdict::{CulturalSensitivity, RecommendedAction};

    fn verdict(risk: CrisisRisk, action: RecommendedAction) -> ValidatorVerdict {
        ValidatorVerdict {
            crisis_risk: risk,
            crisis_indicators: vec![],
            cultural_sensitivity: CulturalSensitivity::Appropriate,
            therapeutic_quality: 7,
            recommended_action: action,
            modifications_needed: None,
            emergency_trigger: false,
        }
    }

    #[test]
    fn absent_verdict_degrades_to_unvalidated_annotation() {
        assert_eq!(
            decide(None),
            EscalationOutcome::AnnotatedPassThrough(SafetyAnnotation::ValidationUnavailable)
        );
    }

    #[test]
    fn emergency_trigger_forces_crisis_override() {
        let mut v = verdict(CrisisRisk::Low, RecommendedAction::Proceed);
        v.emergency_trigger = true;
        assert_eq!(decide(Some(&v)), EscalationOutcome::CrisisOverride);
    }

    #[test]
    fn high_risk_forces_crisis_override_without_trigger() {
        let v = verdict(CrisisRisk::High, RecommendedAction::Proceed);
        assert!(!v.emergency_trigger);
        assert_eq!(decide(Some(&v)), EscalationOutcome::CrisisOverride);
    }

    #[test]
    fn emergency_overrides_simultaneous_modify() {
        let mut v = verdict(CrisisRisk::Low, RecommendedAction::Modify);
        v.emergency_trigger = true;
        v.modifications_needed = Some("soften tone".into());
        assert_eq!(decide(Some(&v)), EscalationOutcome::CrisisOverride);
    }

    #[test]
    fn medium_risk_gets_elevated_risk_annotation() {
        let v = verdict(CrisisRisk::Medium, RecommendedAction::Proceed);
        assert_eq!(
            decide(Some(&v)),
            EscalationOutcome::AnnotatedPassThrough(SafetyAnnotation::ElevatedRisk)
        );
    }

    #[test]
    fn medium_risk_takes_precedence_over_modify() {
        let mut v = verdict(CrisisRisk::Medium, RecommendedAction::Modify);
        v.modifications_needed = Some("soften tone".into());
        assert_eq!(
            decide(Some(&v)),
            EscalationOutcome::AnnotatedPassThrough(SafetyAnnotation::ElevatedRisk)
        );
    }

    #[test]
    fn modify_with_suggestions_regenerates() {
        let mut v = verdict(CrisisRisk::Low, RecommendedAction::Modify);
        v.modifications_needed = Some("  soften clinical terms  ".into());
        assert_eq!(
            decide(Some(&v)),
            EscalationOutcome::RegenerateWithModification {
                instructions: "soften clinical terms".into()
            }
        );
    }

    #[test]
    fn modify_without_suggestions_passes_through() {
        let v = verdict(CrisisRisk::Low, RecommendedAction::Modify);
        assert_eq!(decide(Some(&v)), EscalationOutcome::PassThrough);
    }

    #[test]
    fn low_risk_proceed_passes_through() {
        let v = verdict(CrisisRisk::Low, RecommendedAction::Proceed);
        assert_eq!(decide(Some(&v)), EscalationOutcome::PassThrough);
    }

    #[test]
    fn escalate_action_alone_passes_through() {
        // ESCALATE without HIGH risk or emergency trigger has no dedicated
        // rule; precedence order is authoritative.
        let v = verdict(CrisisRisk::Low, RecommendedAction::Escalate);
        assert_eq!(decide(Some(&v)), EscalationOutcome::PassThrough);
    }

    #[test]
    fn labels_are_distinct() {
        let outcomes = [
            EscalationOutcome::PassThrough,
            EscalationOutcome::AnnotatedPassThrough(SafetyAnnotation::ValidationUnavailable),
            EscalationOutcome::AnnotatedPassThrough(SafetyAnnotation::ElevatedRisk),
            EscalationOutcome::RegenerateWithModification {
                instructions: "x".into(),
            },
            EscalationOutcome::CrisisOverride,
        ];
        for (i, a) in outcomes.iter().enumerate() {
            for b in outcomes.iter().skip(i + 1) {
                assert_ne!(a.label(), b.label());
            }
        }
    }
}
