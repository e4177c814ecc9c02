//! Error types.

use crate::span::Span;
use vize_carton::CompactString;

/// Failure to read selector text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorParseError {
    #[error("empty selector")]
    Empty { span: Span },

    #[error("unclosed `{delimiter}`")]
    Unclosed { delimiter: char, span: Span },

    #[error("unexpected `{found}`")]
    Unexpected { found: char, span: Span },

    #[error("selector ends with a combinator")]
    DanglingCombinator { span: Span },

    #[error("expected {expected}")]
    Expected { expected: &'static str, span: Span },
}

impl SelectorParseError {
    pub fn span(&self) -> Span {
        match self {
            Self::Empty { span }
            | Self::Unclosed { span, .. }
            | Self::Unexpected { span, .. }
            | Self::DanglingCombinator { span }
            | Self::Expected { span, .. } => *span,
        }
    }
}

/// Invalid analysis options.
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("invalid captureClassesFromDoc pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: CompactString,
        #[source]
        source: regex::Error,
    },

    #[error("invalid options: {0}")]
    Json(#[from] serde_json::Error),
}
