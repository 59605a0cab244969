//! Error types for view-function expansion.

use crate::ast::Span;
use std::fmt;
use thiserror::Error;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum ViewFnError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Expand(#[from] ExpandError),
}

/// Errors while reading a declaration from source text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unexpected token at line {line}, column {column}: expected {expected}, found {found:?}")]
    UnexpectedToken {
        found: String,
        expected: String,
        line: u32,
        column: u32,
    },

    #[error("Unbalanced '{open}' opened at line {line}, column {column}")]
    UnbalancedDelimiter { open: char, line: u32, column: u32 },

    #[error("Unterminated string starting at line {line}")]
    UnterminatedString { line: u32 },

    #[error("Unexpected end of input")]
    UnexpectedEof,
}

/// Errors during expansion. Both are fatal for the declaration at hand and
/// never affect other declarations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExpandError {
    #[error("'{name}' has no statement body to expand")]
    MissingBody { name: String, span: Span },

    #[error("view component expansion applies to functions only, found {kind} '{name}'")]
    UnsupportedShape {
        kind: String,
        name: String,
        span: Span,
    },
}

impl ExpandError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ExpandError::MissingBody { .. } => FailureKind::MissingBody,
            ExpandError::UnsupportedShape { .. } => FailureKind::UnsupportedShape,
        }
    }

    /// Location of the offending declaration.
    pub fn span(&self) -> Span {
        match self {
            ExpandError::MissingBody { span, .. } | ExpandError::UnsupportedShape { span, .. } => {
                *span
            }
        }
    }
}

/// Failure kind reported through the diagnostics boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FailureKind {
    MissingBody,
    UnsupportedShape,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingBody => write!(f, "MissingBody"),
            Self::UnsupportedShape => write!(f, "UnsupportedShape"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_error_kind_and_message() {
        let err = ExpandError::MissingBody {
            name: "hoge".to_string(),
            span: Span::default(),
        };
        assert_eq!(err.kind(), FailureKind::MissingBody);
        assert_eq!(err.to_string(), "'hoge' has no statement body to expand");

        let err = ExpandError::UnsupportedShape {
            kind: "struct".to_string(),
            name: "Card".to_string(),
            span: Span::new(0, 4, 3, 1),
        };
        assert_eq!(err.kind(), FailureKind::UnsupportedShape);
        assert_eq!(err.span().line, 3);
        assert!(err.to_string().contains("found struct 'Card'"));
    }

    #[test]
    fn test_top_level_error_is_transparent() {
        let err: ViewFnError = ParseError::UnexpectedEof.into();
        assert_eq!(err.to_string(), "Unexpected end of input");
    }
}
