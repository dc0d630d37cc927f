use crate::logging::{codes, Code};
use crate::tokens::{ConstructKind, TokenStreamError};

pub type TokenizerResult<T> = Result<T, TokenizerError>;

/// Per-file tokenization failures. Any of these discards the partial stream.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TokenizerError {
    #[error("{found} closed at {line}:{column} while {expected} is open")]
    NestingViolation {
        expected: String,
        found: ConstructKind,
        line: u32,
        column: u32,
    },

    #[error("{construct} opened at {line}:{column} is never closed")]
    UnclosedConstruct {
        construct: ConstructKind,
        line: u32,
        column: u32,
    },

    #[error("Nesting deeper than {limit} at {line}:{column}")]
    MaxDepthExceeded { limit: usize, line: u32, column: u32 },

    #[error("File produces more than {limit} tokens")]
    TokenLimitExceeded { limit: usize },

    #[error("Invalid token stream: {message}")]
    InvalidStream { message: String },

    #[error("Tokenization cancelled")]
    Cancelled,
}

impl TokenizerError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::NestingViolation { .. } => codes::tokenization::NESTING_VIOLATION,
            Self::UnclosedConstruct { .. } => codes::tokenization::UNCLOSED_CONSTRUCT,
            Self::MaxDepthExceeded { .. } => codes::tokenization::MAX_DEPTH_EXCEEDED,
            Self::TokenLimitExceeded { .. } => codes::tokenization::TOKEN_LIMIT_EXCEEDED,
            Self::InvalidStream { .. } => codes::tokenization::INVALID_TERMINATION,
            Self::Cancelled => codes::tokenization::CANCELLED,
        }
    }

    /// Limits and cancellation are properties of the run, not defects in
    /// the walker.
    pub fn is_internal_defect(&self) -> bool {
        matches!(
            self,
            Self::NestingViolation { .. } | Self::UnclosedConstruct { .. } | Self::InvalidStream { .. }
        )
    }
}

impl From<TokenStreamError> for TokenizerError {
    fn from(error: TokenStreamError) -> Self {
        match error {
            TokenStreamError::NestingViolation {
                expected,
                found,
                line,
                column,
            } => Self::NestingViolation {
                expected,
                found,
                line,
                column,
            },
            TokenStreamError::UnclosedConstruct {
                construct,
                line,
                column,
            } => Self::UnclosedConstruct {
                construct,
                line,
                column,
            },
            TokenStreamError::TokenLimitExceeded { limit } => Self::TokenLimitExceeded { limit },
            other @ (TokenStreamError::PairedKindAsUnit { .. }
            | TokenStreamError::InvalidTermination { .. }) => Self::InvalidStream {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenKind;
    use assert_matches::assert_matches;

    #[test]
    fn test_stream_errors_convert() {
        let err: TokenizerError = TokenStreamError::TokenLimitExceeded { limit: 5 }.into();
        assert_eq!(err, TokenizerError::TokenLimitExceeded { limit: 5 });
        assert!(!err.is_internal_defect());

        let err: TokenizerError = TokenStreamError::PairedKindAsUnit {
            kind: TokenKind::IfBegin,
        }
        .into();
        assert_matches!(err, TokenizerError::InvalidStream { ref message } if message.contains("IF_BEGIN"));
        assert!(err.is_internal_defect());
    }

    #[test]
    fn test_codes() {
        assert_eq!(TokenizerError::Cancelled.error_code(), codes::tokenization::CANCELLED);
        assert_eq!(
            TokenizerError::MaxDepthExceeded {
                limit: 1,
                line: 1,
                column: 1
            }
            .error_code(),
            codes::tokenization::MAX_DEPTH_EXCEEDED
        );
    }
}
