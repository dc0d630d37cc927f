//! Syntax tree to token stream normalization
//!
//! This is where syntactically different spellings of the same structure are
//! collapsed onto one token sequence. The [`Walker`] traverses the tree
//! depth-first and dispatches each node by [`NodeCategory`] to one rule
//! family:
//!
//! - **control_flow** - functions, lambdas, `if`/`else`, loops, `switch`, jumps
//! - **declarations** - `VARDEF` fan-out and `=` initializers
//! - **expressions** - calls, assignments, `new`
//! - **type_definitions** - `class`/`struct`, `union`, `enum`
//! - **exceptions** - `try`/`catch`
//!
//! Nodes no rule claims are traversed without emitting anything. No semantic
//! analysis is attempted: `a.f()`, `p->f()`, `f()` and `C::f()` are the same
//! `APPLY` whatever `f` resolves to.

mod control_flow;
mod declarations;
mod error;
mod exceptions;
mod expressions;
mod type_definitions;
mod walker;


pub use error::{TokenizerError, TokenizerResult};
pub use walker::{NodeCategory, TokenizationMetrics, WalkLimits, Walker};

use crate::config::compile_time::traversal::{
    MAX_CONSTRUCT_NESTING, MAX_TOKENS_PER_FILE, MAX_TRAVERSAL_DEPTH,
};
use crate::config::runtime::TokenizerPreferences;
use crate::logging::codes;
use crate::syntax::SyntaxTree;
use crate::tokens::{validation, TokenStream, TokenStreamBuilder};
use crate::{log_error, log_success};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct TokenizerOptions {
    pub preferences: TokenizerPreferences,
    pub max_depth: usize,
    pub max_tokens: usize,
    pub max_construct_nesting: usize,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            preferences: TokenizerPreferences::default(),
            max_depth: MAX_TRAVERSAL_DEPTH,
            max_tokens: MAX_TOKENS_PER_FILE,
            max_construct_nesting: MAX_CONSTRUCT_NESTING,
        }
    }
}

/// The result of tokenizing one file
#[derive(Debug, Clone)]
pub struct TokenizationOutput {
    pub stream: TokenStream,
    pub metrics: TokenizationMetrics,
}

/// Stateless between files; one instance can serve a whole batch
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    options: TokenizerOptions,
    cancel: Option<Arc<AtomicBool>>,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: TokenizerOptions) -> Self {
        Self {
            options,
            cancel: None,
        }
    }

    /// Abort any file in progress once `flag` is set
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn options(&self) -> &TokenizerOptions {
        &self.options
    }

    pub fn tokenize(&self, tree: &SyntaxTree) -> TokenizerResult<TokenizationOutput> {
        let builder = TokenStreamBuilder::new(tree.file().clone(), self.options.max_tokens)
        .keep_names(self.options.preferences.include_name_payloads);

        let limits = WalkLimits {
            max_depth: self.options.max_depth,
            max_construct_nesting: self.options.max_construct_nesting,
            log_transparent_nodes: self.options.preferences.log_transparent_nodes,
        };

        let walker = Walker::new(tree, builder, limits, self.cancel.as_deref());
        let (stream, metrics) = match walker.run() {
            Ok(output) => output,
            Err(error) => {
                log_error!(error.error_code(), "Tokenization failed",
                    "file" => tree.file(),
                    "error" => &error
                );
                return Err(error);
            }
        };

        if self.options.preferences.verify_nesting {
            validation::validate_token_stream(&stream)?;
            log_success!(codes::success::NESTING_VERIFIED, "Token nesting verified",
                "file" => tree.file()
            );
        }

        log_success!(codes::success::TOKENIZATION_COMPLETE, "Tokenization completed",
            "file" => tree.file(),
            "tokens" => stream.len(),
            "transparent_nodes" => metrics.transparent_nodes
        );

        Ok(TokenizationOutput { stream, metrics })
    }
}

/// Tokenize with default options
pub fn tokenize(tree: &SyntaxTree) -> TokenizerResult<TokenStream> {
    Tokenizer::new().tokenize(tree).map(|output| output.stream)
}
