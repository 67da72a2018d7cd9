//! Redaction pass over generated profile text.
//!
//! A plain, case-sensitive substring replacement of the supplied full name.
//! The output never contains the name, whatever the marker. It does not catch
//! partial names, nicknames or other identifying strings.

use std::borrow::Cow;

/// Default marker substituted for the name
pub const DEFAULT_MARKER: &str = "[redacted]";

/// Result of a redaction pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redacted {
    pub text: String,
    pub replacements: usize,
}

/// Replaces every literal occurrence of a name with a fixed marker
#[derive(Debug, Clone)]
pub struct Redactor {
    marker: String,
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER)
    }
}

impl Redactor {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Redact `name` from `text`. A blank name leaves the text untouched.
    pub fn redact(&self, text: &str, name: &str) -> Redacted {
        let name = name.trim();
        if name.is_empty() {
            return Redacted {
                text: text.to_string(),
                replacements: 0,
            };
        }

        let replacements = text.matches(name).count();
        if replacements == 0 {
            return Redacted {
                text: text.to_string(),
                replacements,
            };
        }

        let replaced = text.replace(name, &self.marker_for(name));
        // A marker can join with neighbouring text into a fresh occurrence
        let text = if replaced.contains(name) {
            text.replace(name, &filler_for(name))
        } else {
            replaced
        };

        Redacted { text, replacements }
    }

    /// The configured marker, unless it would itself reintroduce the name
    fn marker_for(&self, name: &str) -> Cow<'_, str> {
        if self.marker.contains(name) {
            Cow::Owned(filler_for(name))
        } else {
            Cow::Borrowed(&self.marker)
        }
    }
}

/// A run of one character absent from `name`, as long as the name.
///
/// No occurrence of the name can span it, so a single replacement pass
/// with this filler always leaves the name out.
fn filler_for(name: &str) -> String {
    let filler = ['#', '*']
        .into_iter()
        .chain('!'..=char::MAX)
        .find(|c| !name.contains(*c))
        .unwrap_or('#');
    filler.to_string().repeat(name.chars().count())
}
