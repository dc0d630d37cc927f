//! Structural C++ tokenizer
//!
//! Turns C and C++ source into a flat stream of normalized tokens for
//! similarity detection: identifiers, literals and formatting disappear,
//! while declarations, control flow, calls and assignments survive as
//! `TokenKind`s with their source positions.
//!
//! ```no_run
//! let stream = cpp_tokenizer::tokenize_source("a.cpp", "int x = square(2);").unwrap();
//! println!("{}", cpp_tokenizer::tokens::render_listing(&stream));
//! ```

// Internal modules
pub mod batch;
pub mod config;
pub mod file_processor;
#[macro_use]
pub mod logging;
pub mod normalizer;
pub mod pipeline;
pub mod syntax;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use batch::{BatchConfig, BatchError, BatchResults};
pub use normalizer::{Tokenizer, TokenizerError, TokenizerOptions};
pub use pipeline::{process_file, tokenize_source, Pipeline, PipelineError, PipelineResult};
pub use syntax::{CppTreeSitterProvider, SyntaxError, SyntaxTree, SyntaxTreeProvider};
pub use tokens::{Token, TokenKind, TokenStream};
