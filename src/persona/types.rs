//! Core types for persona synthesis.

use std::fmt;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────
// Identity Hints
// ─────────────────────────────────────────────────────────────────

/// User-supplied clues identifying the person to research.
///
/// Every field is optional; blank strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityHints {
    pub full_name: Option<String>,
    pub linkedin_url: Option<String>,
    pub x_url: Option<String>,
    pub additional_info: Option<String>,
}

impl IdentityHints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_full_name(mut self, value: impl Into<String>) -> Self {
        self.full_name = Some(value.into());
        self
    }

    pub fn with_linkedin_url(mut self, value: impl Into<String>) -> Self {
        self.linkedin_url = Some(value.into());
        self
    }

    pub fn with_x_url(mut self, value: impl Into<String>) -> Self {
        self.x_url = Some(value.into());
        self
    }

    pub fn with_additional_info(mut self, value: impl Into<String>) -> Self {
        self.additional_info = Some(value.into());
        self
    }

    /// Copy with every value trimmed and blank values dropped
    pub fn normalized(&self) -> Self {
        fn clean(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        }

        Self {
            full_name: clean(&self.full_name),
            linkedin_url: clean(&self.linkedin_url),
            x_url: clean(&self.x_url),
            additional_info: clean(&self.additional_info),
        }
    }

    /// True when no field carries a non-blank value
    pub fn is_empty(&self) -> bool {
        let n = self.normalized();
        n.full_name.is_none()
            && n.linkedin_url.is_none()
            && n.x_url.is_none()
            && n.additional_info.is_none()
    }

    /// Trimmed full name, if one was given
    pub fn full_name(&self) -> Option<&str> {
        self.full_name
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}

// ─────────────────────────────────────────────────────────────────
// Profile Sections
// ─────────────────────────────────────────────────────────────────

/// The fixed section list a profile is organized into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionKind {
    Background,
    Experience,
    Interests,
    CommunicationStyle,
    PersonalityBehavior,
    Constraints,
}

impl SectionKind {
    /// All sections in document order.
    pub fn all() -> &'static [SectionKind] {
        &[
            SectionKind::Background,
            SectionKind::Experience,
            SectionKind::Interests,
            SectionKind::CommunicationStyle,
            SectionKind::PersonalityBehavior,
            SectionKind::Constraints,
        ]
    }

    /// Heading as requested from the model.
    pub fn heading(&self) -> &'static str {
        match self {
            SectionKind::Background => "Background",
            SectionKind::Experience => "Experience",
            SectionKind::Interests => "Interests/Topics",
            SectionKind::CommunicationStyle => "Communication Style",
            SectionKind::PersonalityBehavior => "Personality & Behavior",
            SectionKind::Constraints => "Constraints & Guardrails",
        }
    }

    /// Recognize a heading line written in any of the usual markdown shapes
    /// ("## Background", "**Experience:**", "3. Interests & Topics").
    pub fn from_heading(line: &str) -> Option<SectionKind> {
        let core = line
            .trim()
            .trim_start_matches(|c: char| {
                c == '#' || c == '*' || c == '_' || c == '.' || c == ')' || c.is_ascii_digit() || c.is_whitespace()
            })
            .trim_end_matches(|c: char| c == ':' || c == '*' || c == '_' || c.is_whitespace())
            .to_lowercase()
            .replace(" and ", " & ")
            .replace("behaviour", "behavior");

        match core.as_str() {
            "background" => Some(SectionKind::Background),
            "experience" => Some(SectionKind::Experience),
            "interests" | "interests/topics" | "interests & topics" | "topics" => {
                Some(SectionKind::Interests)
            }
            "communication style" => Some(SectionKind::CommunicationStyle),
            "personality & behavior" | "personality" => Some(SectionKind::PersonalityBehavior),
            "constraints" | "constraints & guardrails" | "guardrails" => {
                Some(SectionKind::Constraints)
            }
            _ => None,
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.heading())
    }
}

/// One recognized section of a profile document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSection {
    pub kind: SectionKind,
    pub body: String,
}

// ─────────────────────────────────────────────────────────────────
// Persona Profile
// ─────────────────────────────────────────────────────────────────

/// The synthesized, redacted persona document.
///
/// Replaced wholesale on every synthesis; never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonaProfile(String);

impl PersonaProfile {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A provider may legitimately return nothing; callers decide how to render it
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Best-effort split into the known sections, in document order.
    ///
    /// Text before the first recognized heading is ignored.
    pub fn sections(&self) -> Vec<ProfileSection> {
        let mut sections = Vec::new();
        let mut current: Option<(SectionKind, Vec<&str>)> = None;

        for line in self.0.lines() {
            if let Some(kind) = SectionKind::from_heading(line) {
                if let Some((kind, body)) = current.take() {
                    sections.push(ProfileSection {
                        kind,
                        body: body.join("\n").trim().to_string(),
                    });
                }
                current = Some((kind, Vec::new()));
            } else if let Some((_, ref mut body)) = current {
                body.push(line);
            }
        }

        if let Some((kind, body)) = current {
            sections.push(ProfileSection {
                kind,
                body: body.join("\n").trim().to_string(),
            });
        }

        sections
    }

    /// Sections laid out one after another under plain headings.
    ///
    /// Falls back to the raw text when no known heading is found.
    pub fn render_sections(&self) -> String {
        let sections = self.sections();
        if sections.is_empty() {
            return self.0.trim().to_string();
        }
        sections
            .iter()
            .map(|section| format!("{}:\n{}", section.kind, section.body))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl fmt::Display for PersonaProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PersonaProfile {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ─────────────────────────────────────────────────────────────────
// Synthesis Result
// ─────────────────────────────────────────────────────────────────

/// Outcome of one synthesis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedPersona {
    /// The redacted profile document
    pub profile: PersonaProfile,

    /// The redaction marker when a full name was supplied, empty otherwise
    pub display_name: String,

    /// How many literal occurrences of the name were replaced
    pub redactions: usize,
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_hints_are_empty() {
        assert!(IdentityHints::new().is_empty());
        assert!(IdentityHints::new()
            .with_full_name("   ")
            .with_x_url("")
            .is_empty());
        assert!(!IdentityHints::new().with_additional_info("mathematician").is_empty());
    }

    #[test]
    fn test_normalized_trims() {
        let hints = IdentityHints::new()
            .with_full_name("  Ada Lovelace ")
            .with_linkedin_url(" ");
        let n = hints.normalized();
        assert_eq!(n.full_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(n.linkedin_url, None);
        assert_eq!(hints.full_name(), Some("Ada Lovelace"));
    }

    #[test]
    fn test_heading_shapes() {
        assert_eq!(SectionKind::from_heading("## Background"), Some(SectionKind::Background));
        assert_eq!(SectionKind::from_heading("**Experience:**"), Some(SectionKind::Experience));
        assert_eq!(
            SectionKind::from_heading("3. Interests and Topics"),
            Some(SectionKind::Interests)
        );
        assert_eq!(
            SectionKind::from_heading("### Personality & Behaviour"),
            Some(SectionKind::PersonalityBehavior)
        );
        assert_eq!(SectionKind::from_heading("She studied maths."), None);
    }

    #[test]
    fn test_sections_split() {
        let profile = PersonaProfile::new(
            "Report\n\n## Background\nBorn in London.\n\n## Experience\nWrote notes.\nMore notes.\n## Constraints & Guardrails\nNone.",
        );
        let sections = profile.sections();

        let kinds: Vec<_> = sections.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![SectionKind::Background, SectionKind::Experience, SectionKind::Constraints]
        );
        assert_eq!(sections[1].body, "Wrote notes.\nMore notes.");
    }

    #[test]
    fn test_render_sections() {
        let profile = PersonaProfile::new(
            "Intro line\n## Background\nBorn in London.\n\n**Communication Style:**\nPrecise.",
        );
        assert_eq!(
            profile.render_sections(),
            "Background:\nBorn in London.\n\nCommunication Style:\nPrecise."
        );

        let unstructured = PersonaProfile::new("  Just a paragraph.\n");
        assert_eq!(unstructured.render_sections(), "Just a paragraph.");
    }

    #[test]
    fn test_empty_profile() {
        assert!(PersonaProfile::default().is_empty());
        assert!(PersonaProfile::new(" \n").is_empty());
        assert!(PersonaProfile::default().sections().is_empty());
    }

    #[test]
    fn test_section_kind_serde() {
        let json = serde_json::to_string(&SectionKind::CommunicationStyle).unwrap();
        assert_eq!(json, "\"communication-style\"");
    }
}
