//! Syntax errors surfaced by the tree provider
//!
//! A tree that contains any `ERROR` or `MISSING` node is rejected as a whole:
//! tokenizing around recovered fragments would produce streams that differ
//! between otherwise identical submissions.

use crate::logging::{codes, Code};

pub type SyntaxResult<T> = Result<T, SyntaxError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyntaxError {
    #[error("{file}:{line}:{column}: {message}")]
    ParseFailure {
        file: String,
        line: u32,
        column: u32,
        message: String,
        /// Caret excerpt of the offending line
        snippet: String,
        /// The parser inserted a node that was absent from the source
        missing: bool,
    },

    #[error("C++ grammar could not be loaded: {message}")]
    LanguageUnavailable { message: String },

    #[error("Parser returned no tree for {file}")]
    ParserReturnedNoTree { file: String },
}

impl SyntaxError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::ParseFailure { missing: true, .. } => codes::syntax::MISSING_NODE,
            Self::ParseFailure { .. } => codes::syntax::SYNTAX_ERROR,
            Self::LanguageUnavailable { .. } => codes::syntax::LANGUAGE_UNAVAILABLE,
            Self::ParserReturnedNoTree { .. } => codes::syntax::NO_TREE_PRODUCED,
        }
    }

    /// `(line, column)` of the first offending node
    pub fn location(&self) -> Option<(u32, u32)> {
        match self {
            Self::ParseFailure { line, column, .. } => Some((*line, *column)),
            _ => None,
        }
    }

    pub fn snippet(&self) -> Option<&str> {
        match self {
            Self::ParseFailure { snippet, .. } => Some(snippet),
            _ => None,
        }
    }

    /// Environment problems rather than problems with the submitted file
    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_failure_display_and_code() {
        let err = SyntaxError::ParseFailure {
            file: "a.cpp".into(),
            line: 3,
            column: 7,
            message: "missing `;`".into(),
            snippet: String::new(),
            missing: true,
        };
        assert_eq!(err.to_string(), "a.cpp:3:7: missing `;`");
        assert_eq!(err.error_code(), codes::syntax::MISSING_NODE);
        assert_eq!(err.location(), Some((3, 7)));
    }

    #[test]
    fn test_language_unavailable_halts() {
        let err = SyntaxError::LanguageUnavailable {
            message: "version mismatch".into(),
        };
        assert_eq!(err.error_code(), codes::syntax::LANGUAGE_UNAVAILABLE);
        assert!(err.requires_halt());
        assert!(err.location().is_none());
    }
}
