//! Structural tokens for C++ similarity comparison
//!
//! This module defines the output side of the tokenizer: the closed
//! vocabulary of token kinds, the token values themselves, and the stream
//! they are assembled into.
//!
//! ## Key Components
//!
//! - **[`TokenKind`]** - The stable, versioned vocabulary (`FUNCTION_BEGIN`, `APPLY`, ...)
//! - **[`ConstructKind`]** - The twelve constructs marked by BEGIN/END pairs
//! - **[`Token`]** - A kind plus its [`SourcePosition`] and an optional name
//! - **[`TokenStreamBuilder`]** - Enforces nesting while tokens are emitted
//! - **[`TokenStream`]** - The finished, read-only stream ending in `FILE_END`
//!
//! ## Stream shape
//!
//! Tokens appear in pre-order: a BEGIN when a construct is entered, its
//! contents, then the matching END. Every file contributes exactly one
//! terminal `FILE_END`, so a concatenated submission can be split back into
//! files with [`TokenStream::file_segments`].

pub mod kind;
pub mod printer;
pub mod token;
pub mod token_stream;

pub use kind::{ConstructKind, TokenKind, VOCABULARY_VERSION};
pub use printer::{render_json, render_listing};
pub use token::{SourcePosition, Token};
pub use token_stream::{validation, TokenStream, TokenStreamBuilder, TokenStreamError};
