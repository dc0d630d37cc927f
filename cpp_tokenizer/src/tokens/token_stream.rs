//! Token stream assembly
//!
//! [`TokenStreamBuilder`] is the only way to produce a [`TokenStream`]. It
//! keeps an explicit stack of open constructs so that BEGIN/END balance is
//! enforced while tokens are emitted rather than checked afterwards, and it
//! appends the single `FILE_END` sentinel when the file is finished.

use super::kind::{ConstructKind, TokenKind};
use super::token::{SourcePosition, Token};
use crate::logging::codes::{self, Code};
use crate::utils::Span;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TokenStreamError {
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

    #[error("Token limit exceeded: more than {limit} tokens")]
    TokenLimitExceeded { limit: usize },

    #[error("Paired kind {kind} pushed as a unit token")]
    PairedKindAsUnit { kind: TokenKind },

    #[error("Invalid stream termination: {message}")]
    InvalidTermination { message: String },
}

impl TokenStreamError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::NestingViolation { .. } | Self::PairedKindAsUnit { .. } => {
                codes::tokenization::NESTING_VIOLATION
            }
            Self::UnclosedConstruct { .. } => codes::tokenization::UNCLOSED_CONSTRUCT,
            Self::TokenLimitExceeded { .. } => codes::tokenization::TOKEN_LIMIT_EXCEEDED,
            Self::InvalidTermination { .. } => codes::tokenization::INVALID_TERMINATION,
        }
    }
}

/// An immutable, ordered sequence of tokens. A single-file stream ends with
/// exactly one `FILE_END`; a concatenated submission holds one `FILE_END`
/// per file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(Token::kind).collect()
    }

    pub fn count_of(&self, kind: TokenKind) -> usize {
        self.tokens.iter().filter(|t| t.kind == kind).count()
    }

    /// Per-file slices, each ending in its `FILE_END`
    pub fn file_segments(&self) -> Vec<&[Token]> {
        self.tokens
            .split_inclusive(|t| t.kind == TokenKind::FileEnd)
            .collect()
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Join per-file streams in the given order
    pub fn concatenate<I>(streams: I) -> TokenStream
    where
        I: IntoIterator<Item = TokenStream>,
    {
        TokenStream {
            tokens: streams.into_iter().flat_map(|s| s.tokens).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

#[derive(Debug, Clone)]
struct OpenConstruct {
    construct: ConstructKind,
    line: u32,
    column: u32,
}

/// Accumulates tokens for a single file
#[derive(Debug)]
pub struct TokenStreamBuilder {
    file: Arc<str>,
    tokens: Vec<Token>,
    open: Vec<OpenConstruct>,
    token_limit: usize,
    keep_names: bool,
}

impl TokenStreamBuilder {
    pub fn new(file: Arc<str>, token_limit: usize) -> Self {
        Self {
            file,
            tokens: Vec::new(),
            open: Vec::new(),
            token_limit,
            keep_names: true,
        }
    }

    /// Drop name payloads instead of storing them
    pub fn keep_names(mut self, keep: bool) -> Self {
        self.keep_names = keep;
        self
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of constructs currently open
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    fn push(&mut self, kind: TokenKind, span: &Span, name: Option<&str>) -> Result<(), TokenStreamError> {
        if self.tokens.len() >= self.token_limit {
            return Err(TokenStreamError::TokenLimitExceeded {
                limit: self.token_limit,
            });
        }

        let position = SourcePosition::from_span(self.file.clone(), span);
        let mut token = Token::new(kind, position);
        if self.keep_names {
            token.name = name.map(str::to_string);
        }
        self.tokens.push(token);
        Ok(())
    }

    pub fn unit(&mut self, kind: TokenKind, span: &Span, name: Option<&str>) -> Result<(), TokenStreamError> {
        if !kind.is_unit() {
            return Err(TokenStreamError::PairedKindAsUnit { kind });
        }
        self.push(kind, span, name)
    }

    pub fn open(
        &mut self,
        construct: ConstructKind,
        span: &Span,
        name: Option<&str>,
    ) -> Result<(), TokenStreamError> {
        self.push(construct.begin(), span, name)?;
        self.open.push(OpenConstruct {
            construct,
            line: span.start.line,
            column: span.start.column,
        });
        Ok(())
    }

    /// Close the innermost construct, which must be `construct`
    pub fn close(&mut self, construct: ConstructKind, span: &Span) -> Result<(), TokenStreamError> {
        match self.open.last().map(|o| o.construct) {
            Some(top) if top == construct => {
                self.open.pop();
                self.push(construct.end(), span, None)
            }
            other => Err(TokenStreamError::NestingViolation {
                expected: other
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "nothing".to_string()),
                found: construct,
                line: span.start.line,
                column: span.start.column,
            }),
        }
    }

    /// Append `FILE_END` at `span` and seal the stream
    pub fn finish(mut self, span: &Span) -> Result<TokenStream, TokenStreamError> {
        if let Some(unclosed) = self.open.last() {
            return Err(TokenStreamError::UnclosedConstruct {
                construct: unclosed.construct,
                line: unclosed.line,
                column: unclosed.column,
            });
        }

        // The sentinel is exempt from the limit so a stream at the limit still terminates.
        let position = SourcePosition::from_span(self.file.clone(), span);
        self.tokens.push(Token::new(TokenKind::FileEnd, position));

        Ok(TokenStream {
            tokens: self.tokens,
        })
    }
}

/// Post-hoc checks over finished streams
pub mod validation {
    use super::*;

    /// Every END matches the innermost open BEGIN, and nothing is left open
    /// at a `FILE_END`.
    pub fn validate_nesting(stream: &TokenStream) -> Result<(), TokenStreamError> {
        let mut open: Vec<&Token> = Vec::new();

        for token in stream.iter() {
            if token.kind == TokenKind::FileEnd {
                if let Some(unclosed) = open.last() {
                    return Err(unclosed_error(unclosed));
                }
                continue;
            }

            let Some(construct) = token.kind.construct() else {
                continue;
            };

            if token.kind.is_begin() {
                open.push(token);
            } else {
                match open.pop() {
                    Some(top) if top.kind == construct.begin() => {}
                    top => {
                        return Err(TokenStreamError::NestingViolation {
                            expected: top
                                .and_then(|t| t.kind.construct())
                                .map(|c| c.to_string())
                                .unwrap_or_else(|| "nothing".to_string()),
                            found: construct,
                            line: token.line(),
                            column: token.column(),
                        })
                    }
                }
            }
        }

        match open.last() {
            Some(unclosed) => Err(unclosed_error(unclosed)),
            None => Ok(()),
        }
    }

    fn unclosed_error(token: &Token) -> TokenStreamError {
        TokenStreamError::UnclosedConstruct {
            construct: token.kind.construct().unwrap_or(ConstructKind::Function),
            line: token.line(),
            column: token.column(),
        }
    }

    /// The stream ends with `FILE_END` and every file segment carries
    /// tokens from exactly one file.
    pub fn validate_termination(stream: &TokenStream) -> Result<(), TokenStreamError> {
        match stream.tokens().last() {
            None => {
                return Err(TokenStreamError::InvalidTermination {
                    message: "stream is empty".to_string(),
                })
            }
            Some(last) if last.kind != TokenKind::FileEnd => {
                return Err(TokenStreamError::InvalidTermination {
                    message: format!("stream ends with {} instead of FILE_END", last.kind),
                })
            }
            Some(_) => {}
        }

        for segment in stream.file_segments() {
            let file = &segment[segment.len() - 1].position.file;
            if let Some(stray) = segment.iter().find(|t| &t.position.file != file) {
                return Err(TokenStreamError::InvalidTermination {
                    message: format!(
                        "token from {} inside the segment of {}",
                        stray.position.file, file
                    ),
                });
            }
        }

        Ok(())
    }

    pub fn validate_token_stream(stream: &TokenStream) -> Result<(), TokenStreamError> {
        validate_termination(stream)?;
        validate_nesting(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::validation::*;
    use super::*;
    use crate::utils::SourceMap;
    use assert_matches::assert_matches;

    const SOURCE: &str = "void f() {\n  g();\n}\n";

    fn builder(file: &str) -> (TokenStreamBuilder, SourceMap) {
        let map = SourceMap::new(SOURCE.to_string());
        (
            TokenStreamBuilder::new(Arc::from(file), 100),
            map,
        )
    }

    #[test]
    fn test_balanced_stream_finishes_with_single_file_end() {
        let (mut b, map) = builder("a.cpp");
        b.open(ConstructKind::Function, &map.span_between(0, 20), Some("f"))
            .unwrap();
        b.unit(TokenKind::Apply, &map.span_between(13, 16), Some("g"))
            .unwrap();
        assert_eq!(b.depth(), 1);
        b.close(ConstructKind::Function, &map.span_between(19, 20))
            .unwrap();

        let stream = b.finish(&map.span_between(21, 21)).unwrap();
        assert_eq!(
            stream.kinds(),
            vec![
                TokenKind::FunctionBegin,
                TokenKind::Apply,
                TokenKind::FunctionEnd,
                TokenKind::FileEnd
            ]
        );
        assert_eq!(stream.count_of(TokenKind::FileEnd), 1);
        assert_eq!(stream.tokens()[1].line(), 2);
        assert_eq!(stream.tokens()[1].column(), 3);
        assert_eq!(stream.tokens()[1].name.as_deref(), Some("g"));
        assert!(validate_token_stream(&stream).is_ok());
    }

    #[test]
    fn test_mismatched_close_is_rejected() {
        let (mut b, map) = builder("a.cpp");
        let span = map.span_between(0, 1);
        b.open(ConstructKind::If, &span, None).unwrap();
        assert_matches!(
            b.close(ConstructKind::While, &span),
            Err(TokenStreamError::NestingViolation { found: ConstructKind::While, .. })
        );
    }

    #[test]
    fn test_close_without_open_is_rejected() {
        let (mut b, map) = builder("a.cpp");
        let err = b
            .close(ConstructKind::Try, &map.span_between(0, 1))
            .unwrap_err();
        assert_matches!(err, TokenStreamError::NestingViolation { ref expected, .. } if expected == "nothing");
    }

    #[test]
    fn test_unclosed_construct_fails_finish() {
        let (mut b, map) = builder("a.cpp");
        b.open(ConstructKind::Class, &map.span_between(13, 14), None)
            .unwrap();
        assert_matches!(
            b.finish(&map.span_between(21, 21)),
            Err(TokenStreamError::UnclosedConstruct { construct: ConstructKind::Class, line: 2, column: 3 })
        );
    }

    #[test]
    fn test_paired_kind_as_unit_is_rejected() {
        let (mut b, map) = builder("a.cpp");
        assert_matches!(
            b.unit(TokenKind::IfBegin, &map.span_between(0, 1), None),
            Err(TokenStreamError::PairedKindAsUnit { .. })
        );
    }

    #[test]
    fn test_token_limit() {
        let map = SourceMap::new(SOURCE.to_string());
        let mut b = TokenStreamBuilder::new(Arc::from("a.cpp"), 2);
        let span = map.span_between(0, 1);
        b.unit(TokenKind::Apply, &span, None).unwrap();
        b.unit(TokenKind::Apply, &span, None).unwrap();
        assert_matches!(
            b.unit(TokenKind::Apply, &span, None),
            Err(TokenStreamError::TokenLimitExceeded { limit: 2 })
        );
        assert_eq!(b.finish(&span).unwrap().len(), 3);
    }

    #[test]
    fn test_names_can_be_dropped() {
        let (b, map) = builder("a.cpp");
        let mut b = b.keep_names(false);
        b.unit(TokenKind::Apply, &map.span_between(13, 16), Some("g"))
            .unwrap();
        let stream = b.finish(&map.span_between(21, 21)).unwrap();
        assert!(stream.tokens()[0].name.is_none());
    }

    #[test]
    fn test_concatenation_keeps_order_and_terminators() {
        let (a, map) = builder("a.cpp");
        let (mut b, _) = builder("b.cpp");
        b.unit(TokenKind::Return, &map.span_between(0, 1), None)
            .unwrap();

        let end = map.span_between(21, 21);
        let joined =
            TokenStream::concatenate(vec![a.finish(&end).unwrap(), b.finish(&end).unwrap()]);

        assert_eq!(
            joined.kinds(),
            vec![TokenKind::FileEnd, TokenKind::Return, TokenKind::FileEnd]
        );
        assert_eq!(joined.file_segments().len(), 2);
        assert!(validate_token_stream(&joined).is_ok());
    }

    #[test]
    fn test_validation_rejects_unterminated_stream() {
        let empty = TokenStream::concatenate(Vec::new());
        assert_matches!(
            validate_termination(&empty),
            Err(TokenStreamError::InvalidTermination { .. })
        );
    }
}
