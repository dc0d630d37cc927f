//! Syntax tree provider
//!
//! Parsing is delegated to `tree-sitter-cpp` behind the [`SyntaxTreeProvider`]
//! trait. The rest of the crate only sees a [`SyntaxTree`] that is known to
//! be free of `ERROR` and `MISSING` nodes; any other outcome is a
//! [`SyntaxError`] and the file is not tokenized.

mod error;
mod provider;

pub use error::{SyntaxError, SyntaxResult};
pub use provider::{CppTreeSitterProvider, SyntaxTree, SyntaxTreeProvider};

use crate::logging::codes;
use crate::{log_debug, log_error, log_success};

/// Parse with the default C++ provider, logging the outcome
pub fn parse_cpp(file: &str, source: &str) -> SyntaxResult<SyntaxTree> {
    parse_with(&CppTreeSitterProvider::new(), file, source)
}

pub fn parse_with<P>(provider: &P, file: &str, source: &str) -> SyntaxResult<SyntaxTree>
where
    P: SyntaxTreeProvider + ?Sized,
{
    log_debug!("Starting parse", "file" => file, "bytes" => source.len());

    let result = provider.parse(file, source);

    match &result {
        Ok(tree) => {
            log_success!(
                codes::success::PARSE_COMPLETE,
                "Parse completed",
                "file" => file,
                "nodes" => tree.node_count()
            );
        }
        Err(SyntaxError::ParseFailure {
            line,
            column,
            message,
            ..
        }) => {
            log_error!(
                codes::syntax::SYNTAX_ERROR,
                "Parse failed",
                "file" => file,
                "line" => line,
                "column" => column,
                "reason" => message
            );
        }
        Err(error) => {
            log_error!(error.error_code(), "Parser unavailable", "error" => error);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    struct AlwaysFails;

    impl SyntaxTreeProvider for AlwaysFails {
        fn parse(&self, file: &str, _source: &str) -> SyntaxResult<SyntaxTree> {
            Err(SyntaxError::ParserReturnedNoTree {
                file: file.to_string(),
            })
        }
    }

    #[test]
    fn test_parse_with_custom_provider() {
        assert_matches!(
            parse_with(&AlwaysFails, "x.cpp", "int x;"),
            Err(SyntaxError::ParserReturnedNoTree { .. })
        );
    }

    #[test]
    fn test_parse_with_trait_object() {
        let provider: Box<dyn SyntaxTreeProvider> = Box::new(CppTreeSitterProvider::new());
        assert!(parse_with(provider.as_ref(), "x.cpp", "int x;").is_ok());
    }

    #[test]
    fn test_parse_cpp() {
        assert!(parse_cpp("x.cpp", "struct S { int a; };").is_ok());
        assert!(parse_cpp("x.cpp", "struct S { int a; ").is_err());
    }
}
