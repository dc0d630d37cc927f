//! Shared source-location helpers used by the syntax provider, the token
//! stream and diagnostics.

pub mod span;

pub use span::{Position, SourceMap, Span};
