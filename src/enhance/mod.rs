//! Rewriting the document through a text-generation service.

mod gemini;
mod worker;

pub use gemini::{DEFAULT_ENDPOINT, DEFAULT_MODEL, GeminiEnhancer};
pub use worker::{EnhanceOutcome, EnhanceWorker};

use thiserror::Error;

/// Separator between the instruction and the document in the prompt.
pub const PROMPT_SEPARATOR: &str = "\n\n---\n\n";

/// The stylistic transforms the enhance menu offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    Grammar,
    Funky,
    Professional,
    Summarize,
}

impl TransformKind {
    /// Menu order.
    pub const ALL: [Self; 4] = [
        Self::Grammar,
        Self::Funky,
        Self::Professional,
        Self::Summarize,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Grammar => "Fix Grammar",
            Self::Funky => "Make it Funky",
            Self::Professional => "Professional Tone",
            Self::Summarize => "Summarize",
        }
    }

    /// Instruction sent ahead of the document.
    pub const fn instruction(self) -> &'static str {
        match self {
            Self::Grammar => {
                "Fix the grammar and spelling of the following markdown content. Keep the formatting exactly the same."
            }
            Self::Funky => {
                "Rewrite the following markdown content to be more energetic, funky, and enthusiastic. Use emojis where appropriate. Keep the markdown structure."
            }
            Self::Professional => {
                "Rewrite the following markdown content to be strictly professional, concise, and business-appropriate. Keep the markdown structure."
            }
            Self::Summarize => {
                "Create a summary section at the top of the following markdown content, and then list the original content below it."
            }
        }
    }
}

/// Full prompt for `kind` applied to `content`.
pub fn compose_prompt(kind: TransformKind, content: &str) -> String {
    format!("{}{PROMPT_SEPARATOR}{content}", kind.instruction())
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnhanceError {
    #[error("Gemini API Key is missing.")]
    MissingCredentials,
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    MalformedResponse(String),
}

/// A service that rewrites markdown.
///
/// Implementations block; callers run them off the UI thread.
pub trait Enhancer: Send + Sync {
    /// Rewrite `content` under `kind`. A response without text returns
    /// `content` unchanged.
    ///
    /// # Errors
    ///
    /// Returns an [`EnhanceError`] when the service cannot be reached or
    /// answers with something unreadable.
    fn enhance(&self, content: &str, kind: TransformKind) -> Result<String, EnhanceError>;
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_prompt_joins_instruction_and_content() {
        let prompt = compose_prompt(TransformKind::Grammar, "# teh title");
        assert!(prompt.starts_with("Fix the grammar and spelling"));
        assert!(prompt.ends_with("\n\n---\n\n# teh title"));
    }

    #[test]
    fn test_each_kind_has_distinct_instruction() {
        let seen: HashSet<&str> = TransformKind::ALL.iter().map(|k| k.instruction()).collect();
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_missing_credentials_message() {
        assert_eq!(
            EnhanceError::MissingCredentials.to_string(),
            "Gemini API Key is missing."
        );
    }
}
