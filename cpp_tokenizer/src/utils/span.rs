//! Source location tracking
//!
//! Tree-sitter reports byte offsets and zero-based rows/columns measured in
//! bytes. Everything user-facing in this crate is 1-based and counts columns
//! in characters, so positions are always recomputed through a [`SourceMap`].
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in source text with line, column, and byte offset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Byte offset from start of input (0-based)
    pub offset: usize,
    /// Line number (1-based)
    pub line: u32,
    /// Column number (1-based, in characters)
    pub column: u32,
}

impl Position {
    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// Offset 0, line 1, column 1
    pub fn start() -> Self {
        Self::new(0, 1, 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open span of source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start position (inclusive)
    pub start: Position,
    /// End position (exclusive)
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(
            start.offset <= end.offset,
            "Span start must not be after end"
        );
        Self { start, end }
    }

    /// Byte length
    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.offset >= self.start.offset && pos.offset < self.end.offset
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(
                f,
                "{}:{}-{}",
                self.start.line, self.start.column, self.end.column
            )
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Line index over a source text for offset to line/column lookup.
///
/// Lookups are logarithmic in the size of the source, independent of line
/// length: character columns are derived from byte columns by subtracting
/// the continuation bytes of multi-byte characters seen so far.
#[derive(Debug, Clone)]
pub struct SourceMap {
    pub source: String,
    /// Byte offsets of line starts
    line_starts: Vec<usize>,
    /// Byte offsets of multi-byte characters
    wide_chars: Vec<usize>,
    /// `continuation_totals[i]` is the number of continuation bytes in
    /// `wide_chars[..i]`
    continuation_totals: Vec<usize>,
}

impl SourceMap {
    pub fn new(source: String) -> Self {
        let mut line_starts = vec![0];
        let mut wide_chars = Vec::new();
        let mut continuation_totals = vec![0];
        for (offset, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(offset + 1);
            } else if ch.len_utf8() > 1 {
                wide_chars.push(offset);
                let total = continuation_totals[continuation_totals.len() - 1];
                continuation_totals.push(total + ch.len_utf8() - 1);
            }
        }
        Self {
            source,
            line_starts,
            wide_chars,
            continuation_totals,
        }
    }

    /// Continuation bytes strictly before `offset`
    fn continuation_bytes_before(&self, offset: usize) -> usize {
        let index = self.wide_chars.partition_point(|&wide| wide < offset);
        self.continuation_totals[index]
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Line and character column for a byte offset. Offsets past the end
    /// clamp to the end of the source.
    pub fn position_at(&self, offset: usize) -> Position {
        let mut offset = offset.min(self.source.len());
        while !self.source.is_char_boundary(offset) {
            offset -= 1;
        }

        let line = self
            .line_starts
            .binary_search(&offset)
            .unwrap_or_else(|i| i - 1);

        let line_start = self.line_starts[line];
        let column = (offset - line_start)
            - (self.continuation_bytes_before(offset) - self.continuation_bytes_before(line_start));

        Position::new(offset, (line + 1) as u32, (column + 1) as u32)
    }

    pub fn span_between(&self, start_offset: usize, end_offset: usize) -> Span {
        Span::new(self.position_at(start_offset), self.position_at(end_offset))
    }

    /// Line text by 1-based line number, without its terminator
    pub fn get_line(&self, line_num: u32) -> Option<&str> {
        if line_num == 0 {
            return None;
        }

        let line_idx = (line_num - 1) as usize;
        let start = *self.line_starts.get(line_idx)?;
        let end = match self.line_starts.get(line_idx + 1) {
            Some(next) => next - 1,
            None => self.source.len(),
        };

        Some(self.source[start..end].trim_end_matches('\r'))
    }

    /// A one-line excerpt with a caret marker under the span start, used in
    /// parse-failure diagnostics.
    pub fn snippet(&self, span: &Span) -> String {
        let Some(line) = self.get_line(span.start.line) else {
            return String::new();
        };

        let line_num_str = span.start.line.to_string();
        let padding = " ".repeat(line_num_str.len());
        let marker_len = if span.start.line == span.end.line {
            span.end.column.saturating_sub(span.start.column) as usize
        } else {
            line.chars().count().saturating_sub(span.start.column as usize - 1)
        };

        format!(
            "{} |\n{} | {}\n{} | {}{}",
            padding,
            line_num_str,
            line,
            padding,
            " ".repeat(span.start.column as usize - 1),
            "^".repeat(marker_len.max(1))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_at_counts_characters() {
        let map = SourceMap::new("int a;\n// é\nint b;\n".to_string());
        assert_eq!(map.position_at(0), Position::new(0, 1, 1));
        assert_eq!(map.position_at(11).line, 2);
        // "// é" is 5 bytes, so line 3 begins at byte 13
        assert_eq!(map.position_at(12).column, 5);
        let pos = map.position_at(13);
        assert_eq!((pos.line, pos.column), (3, 1));
    }

    #[test]
    fn test_position_at_on_mixed_width_line() {
        let source = "s = \"αβ\"; t = \"€\"; u = 1;";
        let map = SourceMap::new(source.to_string());
        for (offset, _) in source.char_indices() {
            let expected = source[..offset].chars().count() as u32 + 1;
            assert_eq!(map.position_at(offset).column, expected);
        }
        let end = map.position_at(source.len());
        assert_eq!(end.column, source.chars().count() as u32 + 1);
    }

    #[test]
    fn test_position_at_on_long_single_line() {
        let line = "x = f(y);".repeat(200_000);
        let map = SourceMap::new(line.clone());
        let last = map.position_at(line.len() - 1);
        assert_eq!((last.line, last.column), (1, line.len() as u32));
    }

    #[test]
    fn test_position_at_clamps_past_end() {
        let map = SourceMap::new("x".to_string());
        assert_eq!(map.position_at(100), Position::new(1, 1, 2));
    }

    #[test]
    fn test_get_line_strips_carriage_return() {
        let map = SourceMap::new("a\r\nb".to_string());
        assert_eq!(map.get_line(1), Some("a"));
        assert_eq!(map.get_line(2), Some("b"));
        assert_eq!(map.get_line(3), None);
        assert_eq!(map.get_line(0), None);
    }

    #[test]
    fn test_snippet_marks_span() {
        let map = SourceMap::new("int x = ;\n".to_string());
        let span = map.span_between(8, 9);
        let snippet = map.snippet(&span);
        assert!(snippet.contains("1 | int x = ;"));
        assert!(snippet.ends_with("        ^"));
    }

    #[test]
    fn test_span_display() {
        let map = SourceMap::new("abc\ndef".to_string());
        assert_eq!(map.span_between(0, 2).to_string(), "1:1-3");
        assert_eq!(map.span_between(1, 5).to_string(), "1:2-2:2");
    }
}
