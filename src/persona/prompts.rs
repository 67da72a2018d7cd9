//! Instruction text for the research call.

use super::types::{IdentityHints, SectionKind};

/// Placeholder rendered for a hint the user left blank
pub const NOT_PROVIDED: &str = "N/A";

/// Fixed research instruction sent as the developer message.
///
/// The person's name is forbidden in the output outright; the redaction pass
/// then catches any literal occurrence the model emits anyway.
pub fn research_instructions() -> String {
    let sections = SectionKind::all()
        .iter()
        .map(|s| s.heading())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are researching a real individual from the public links and context provided. \
         Use the available web search tools to gather current, public information, and before \
         attributing anything to this person, corroborate that the sources describe the same \
         individual (matching roles, employers, handles and locations); discard material about \
         namesakes. \
         Synthesize a persona description covering background, roles, experience, notable work, \
         topics they care about, how they communicate, and their likely personality traits and \
         behavioral patterns. Summarize neutrally and do not speculate beyond what sources support. \
         Never write the person's explicit full name anywhere in the output; refer to them as \
         \"the persona\" or by role instead. \
         Organize the report under exactly these section headings: {}. \
         Output the report and no other text.",
        sections
    )
}

/// Render the user message listing every hint, absent ones as `N/A`
pub fn render_hints(hints: &IdentityHints) -> String {
    let hints = hints.normalized();
    let field = |value: &Option<String>| value.clone().unwrap_or_else(|| NOT_PROVIDED.to_string());

    format!(
        "Inputs Provided:\n\
         - Full name: {}\n\
         - LinkedIn: {}\n\
         - X: {}\n\
         - Additional info: {}\n\n\
         Please research and synthesize the persona as specified.",
        field(&hints.full_name),
        field(&hints.linkedin_url),
        field(&hints.x_url),
        field(&hints.additional_info),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instructions_name_every_section() {
        let text = research_instructions();
        for kind in SectionKind::all() {
            assert!(text.contains(kind.heading()), "missing {}", kind.heading());
        }
        assert!(text.contains("web search"));
        assert!(text.contains("full name"));
    }

    #[test]
    fn test_render_hints_marks_absent_fields() {
        let hints = IdentityHints::new()
            .with_full_name("Ada Lovelace")
            .with_linkedin_url("")
            .with_additional_info("mathematician");
        let text = render_hints(&hints);

        assert!(text.starts_with("Inputs Provided:\n"));
        assert!(text.contains("- Full name: Ada Lovelace\n"));
        assert!(text.contains("- LinkedIn: N/A\n"));
        assert!(text.contains("- X: N/A\n"));
        assert!(text.contains("- Additional info: mathematician\n"));
    }
}
