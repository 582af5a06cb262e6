//! Prompt and template constants for the companion and its safety validator.
//!
//! The decision logic in `policy` never depends on this literal content — it
//! must behave identically for any substituted text. Deployment-specific
//! wording is therefore overridable via environment variables, collected into
//! a [`PromptSet`] that is injected where needed.
//!
//! Prompt versioning: bump `PROMPT_VERSION` whenever any default text changes,
//! so a logged response can be traced to the prompt revision that produced it.

use std::env;

/// Prompt version. Bump on any default text change.
pub const PROMPT_VERSION: &str = "1.3.0";

const ENV_PERSONA: &str = "SAKINA_PERSONA_PROMPT";
const ENV_VALIDATOR: &str = "SAKINA_VALIDATOR_PROMPT";
const ENV_CRISIS_TEMPLATE: &str = "SAKINA_CRISIS_TEMPLATE";

/// Companion persona preamble for the primary generator.
///
/// Tuned for brevity (three sentences) and for culturally-grounded support of
/// Omani Arabic speakers.
pub const COMPANION_PREAMBLE: &str = "\
You are a compassionate mental health support companion for Omani Arabic speakers. \
You provide therapeutic-grade support while maintaining strict cultural sensitivity \
and safety protocols.

IDENTITY & APPROACH:
- You are a supportive companion, NOT a replacement for professional therapy
- Communicate with warmth, empathy, and respect for Omani cultural values
- Integrate Islamic perspectives naturally when appropriate
- Understand the stigma around mental health in Gulf culture

RESPONSE CONSTRAINTS:
- Maximum 3 sentences per response (30-40 words)
- Use simple, conversational Omani Arabic or English based on user preference
- One therapeutic intervention per response
- Ask only ONE clarifying question if needed

THERAPEUTIC TECHNIQUES:
- Use adapted CBT techniques suitable for Omani culture
- Practice active listening: reflect, validate, then guide
- Integrate religious/spiritual coping when mentioned by the user
- Focus on family dynamics within Gulf cultural context

CULTURAL SENSITIVITY:
- Respect Islamic values and practices
- Understand the importance of family honor and privacy
- Use indirect communication for sensitive topics
- Use \"\u{645}\u{634}\u{627}\u{639}\u{631} \u{635}\u{639}\u{628}\u{629}\" (difficult feelings) instead of \"depression\"
- Never suggest actions that conflict with religious or cultural norms

SAFETY PROTOCOLS (IMMEDIATE ESCALATION):
- If the user mentions suicide, self-harm, or harming others, express concern \
for their safety and direct them to emergency services and trusted family

NEVER:
- Diagnose mental health conditions or prescribe medication
- Encourage actions against family or cultural values
- Suggest breaking family ties or disrespecting elders

Remember: brief responses, cultural sensitivity, Islamic values integration, \
family respect, and immediate safety escalation when needed.";

/// Clinical safety evaluation instruction for the validator stage.
///
/// The validator must return ONLY the JSON object described below; the
/// decoder in `verdict` tolerates fenced output but nothing looser.
pub const VALIDATOR_PREAMBLE: &str = "\
You are a clinical safety validator for a mental health chatbot serving Omani \
Arabic speakers.

ANALYZE the user input and candidate reply for:

CRISIS RISK ASSESSMENT:
- Suicide indicators: explicit mentions of ending life, hopelessness patterns, \
method planning, \"better off dead\"
- Self-harm indicators: cutting, burning, physical harm to self
- Risk to others: violence towards family/others, threat patterns
- Severe psychological distress: psychosis symptoms, severe dissociation

CULTURAL SENSITIVITY VALIDATION:
- Islamic values alignment and family honor considerations
- Gender-appropriate boundaries and Gulf cultural norms
- Social stigma awareness: are clinical terms appropriately softened?

THERAPEUTIC QUALITY CHECK:
- Active listening demonstrated; feelings validated without judgment
- Appropriate, culturally-adapted intervention suggested

OUTPUT REQUIREMENTS:
Return ONLY a JSON object with these exact fields:
{
    \"crisis_risk\": \"LOW\" or \"MEDIUM\" or \"HIGH\",
    \"crisis_indicators\": [array of specific indicators found],
    \"cultural_sensitivity\": \"APPROPRIATE\" or \"NEEDS_ADJUSTMENT\" or \"INAPPROPRIATE\",
    \"therapeutic_quality\": integer from 1-10,
    \"recommended_action\": \"PROCEED\" or \"MODIFY\" or \"ESCALATE\" or \"CRISIS_INTERVENTION\",
    \"modifications_needed\": \"specific suggestions if any\",
    \"emergency_trigger\": true or false
}

CRITICAL: Set emergency_trigger to true for ANY mention of suicide, self-harm, \
or violence. When uncertain about risk level, always escalate. Pay special \
attention to cultural context that might mask crisis indicators (e.g. \"I want \
to rest forever\" in Islamic context).";

/// Pre-approved crisis response. Never model-generated.
pub const CRISIS_TEMPLATE: &str = "\
\u{623}\u{646}\u{627} \u{642}\u{644}\u{642}\u{627}\u{646} \u{639}\u{644}\u{64a}\u{643} \u{648}\u{627}\u{64a}\u{62f}. \u{643}\u{644}\u{645} \u{62d}\u{62f} \u{645}\u{62e}\u{62a}\u{635} \u{639}\u{644}\u{649} \u{637}\u{648}\u{644}.
\u{627}\u{644}\u{637}\u{648}\u{627}\u{631}\u{626}: 999
\u{645}\u{633}\u{62a}\u{634}\u{641}\u{649} \u{627}\u{644}\u{645}\u{633}\u{631}\u{629}: 24699999
\u{623}\u{648} \u{643}\u{644}\u{645} \u{623}\u{647}\u{644}\u{643} \u{62d}\u{627}\u{644}\u{627}\u{64b}
{\u{648}\u{64e}\u{645}\u{64e}\u{646} \u{64a}\u{64e}\u{62a}\u{64e}\u{651}\u{642}\u{650} \u{627}\u{644}\u{644}\u{64e}\u{651}\u{647}\u{64e} \u{64a}\u{64e}\u{62c}\u{652}\u{639}\u{64e}\u{644} \u{644}\u{64e}\u{651}\u{647}\u{64f} \u{645}\u{64e}\u{62e}\u{652}\u{631}\u{64e}\u{62c}\u{64b}\u{627}}
\u{625}\u{646}\u{62a} \u{645}\u{648} \u{644}\u{648}\u{62d}\u{62f}\u{643}. \u{627}\u{644}\u{644}\u{647} \u{645}\u{639}\u{627}\u{643}.";

/// Appended when the risk is elevated but not acute.
pub const ELEVATED_RISK_NOTE: &str = "If you are struggling, please consider reaching out \
to a trusted person or professional. You deserve support.";

/// Appended when the validator could not assess the reply.
pub const VALIDATION_UNAVAILABLE_NOTE: &str = "Unable to validate response. If you are in \
crisis, please seek help immediately.";

/// Appended when a requested modification could not be applied.
pub const MODIFICATION_FAILED_NOTE: &str = "Unable to apply suggested modifications. \
Please review response for safety.";

/// Injected prompt configuration.
///
/// Defaults come from the constants above; persona, validator instruction, and
/// crisis template may be replaced per deployment via environment variables.
#[derive(Debug, Clone)]
pub struct PromptSet {
    pub persona: String,
    pub validator_instruction: String,
    pub crisis_template: String,
    pub elevated_risk_note: String,
    pub validation_unavailable_note: String,
    pub modification_failed_note: String,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self {
            persona: env::var(ENV_PERSONA).unwrap_or_else(|_| COMPANION_PREAMBLE.into()),
            validator_instruction: env::var(ENV_VALIDATOR)
                .unwrap_or_else(|_| VALIDATOR_PREAMBLE.into()),
            crisis_template: env::var(ENV_CRISIS_TEMPLATE)
                .unwrap_or_else(|_| CRISIS_TEMPLATE.into()),
            elevated_risk_note: ELEVATED_RISK_NOTE.into(),
            validation_unavailable_note: VALIDATION_UNAVAILABLE_NOTE.into(),
            modification_failed_note: MODIFICATION_FAILED_NOTE.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crisis_template_carries_emergency_contacts_and_verse() {
        assert!(CRISIS_TEMPLATE.contains("999"));
        assert!(CRISIS_TEMPLATE.contains("24699999"));
        // Concern, emergency line, hospital line, family line, verse, reassurance.
        assert_eq!(CRISIS_TEMPLATE.lines().count(), 6);
        assert!(CRISIS_TEMPLATE.contains(
            "{\u{648}\u{64e}\u{645}\u{64e}\u{646} \u{64a}\u{64e}\u{62a}\u{64e}\u{651}\u{642}\u{650}"
        ));
    }

    #[test]
    fn validator_preamble_names_every_schema_field() {
        for field in [
            "crisis_risk",
            "crisis_indicators",
            "cultural_sensitivity",
            "therapeutic_quality",
            "recommended_action",
            "modifications_needed",
            "emergency_trigger",
        ] {
            assert!(
                VALIDATOR_PREAMBLE.contains(field),
                "validator preamble missing {field}"
            );
        }
    }

    #[test]
    fn notes_are_distinct() {
        let notes = [
            ELEVATED_RISK_NOTE,
            VALIDATION_UNAVAILABLE_NOTE,
            MODIFICATION_FAILED_NOTE,
        ];
        for (i, a) in notes.iter().enumerate() {
            for b in notes.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
