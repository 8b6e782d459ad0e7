//! Front-line command routing.
//!
//! Pure and synchronous: the router inspects the normalized input and
//! classifies it. It never performs I/O and never touches conversation
//! state, which keeps every routing decision unit-testable.

use crate::intents::CATALOG;

/// Lead-ins that mark an image-generation request. Prefix match only, so a
/// sentence merely mentioning "create an image of" mid-way delegates instead.
const IMAGE_LEAD_INS: &[&str] = &[
    "create an image of",
    "generate a picture of",
    "render a visual of",
];

/// Outcome of routing one line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterResult {
    /// Canned intent response; the conversation history is not touched.
    Scripted(String),
    /// Image synthesis with the extracted prompt.
    GenerateImage { prompt: String },
    /// Everything else goes to the completion endpoint, raw text preserved.
    Delegate(String),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CommandRouter;

impl CommandRouter {
    pub fn new() -> Self {
        Self
    }

    pub fn route(&self, input: &str) -> RouterResult {
        let raw = input.trim();
        let normalized = raw.to_lowercase();

        for lead_in in IMAGE_LEAD_INS {
            if normalized.starts_with(lead_in) {
                // lowercasing can shift byte offsets, so slice checked
                let Some(rest) = raw.get(lead_in.len()..) else {
                    break;
                };
                let prompt = rest.trim().to_string();
                if prompt.is_empty() {
                    break;
                }
                return RouterResult::GenerateImage { prompt };
            }
        }

        for rule in CATALOG {
            if rule.matches(&normalized) {
                return RouterResult::Scripted(rule.render(&normalized));
            }
        }

        RouterResult::Delegate(raw.to_string())
    }
}
