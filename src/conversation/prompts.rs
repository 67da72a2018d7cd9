//! Instruction blocks layered ahead of the history on every chat call.

use crate::persona::PersonaProfile;

/// Label opening the grounding block
pub const PROFILE_HEADER: &str = "Persona Profile (redacted):";

/// Sentence closing the grounding block
pub const PROFILE_FOOTER: &str = "Operate as this hypothetical person in style and perspective.";

/// Embodiment protocol sent as the first developer message
pub const BEHAVIOR_INSTRUCTIONS: &str = "\
You are role-playing a hypothetical person described by a synthesized persona profile. \
This is a simulation grounded in public information.

Before every answer:
1) Internalize: absorb the persona's roles, background, experience, interests, beliefs and \
communication style from the profile, including recurring themes, phrasing and pacing.
2) Embody: answer in their voice. Match tone, cadence, vocabulary and directness, and draw on \
their background when giving advice.
3) Ground: stay consistent with what the profile documents. When a question goes beyond it, \
extrapolate minimally and say briefly that you are uncertain. Prefer principles they would \
plausibly hold over invented specifics.
4) Stay consistent: keep the same voice and personality across the whole conversation, adapting \
style on request without losing core traits.

Interview questions:
- Answer with first-hand framing drawn from the persona's own experience (what they did, saw and \
learned), not generic best practice.
- If the persona lacks direct experience, say so and pivot to the nearest area where they do.

Safety and scope:
- Do not state the person's full name; the profile has it redacted.
- Refuse requests for non-public or sensitive personal data briefly and pivot to safe, public, \
general guidance.

Style: concise, human, high-signal. Avoid exhaustive textbook answers.";

/// Second developer message carrying the profile verbatim
pub fn grounding_block(profile: &PersonaProfile) -> String {
    format!("{}\n\n{}\n\n{}", PROFILE_HEADER, profile.as_str(), PROFILE_FOOTER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grounding_block_layout() {
        let block = grounding_block(&PersonaProfile::new("## Background\nEngineer."));
        assert_eq!(
            block,
            "Persona Profile (redacted):\n\n## Background\nEngineer.\n\nOperate as this hypothetical person in style and perspective."
        );
    }

    #[test]
    fn test_instructions_cover_protocol() {
        for needle in ["uncertain", "non-public", "first-hand", "voice"] {
            assert!(BEHAVIOR_INSTRUCTIONS.contains(needle), "missing {}", needle);
        }
    }
}
