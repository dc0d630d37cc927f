//! tree-sitter backed syntax trees

use super::error::{SyntaxError, SyntaxResult};
use crate::utils::{SourceMap, Span};
use std::sync::Arc;
use tree_sitter::{Node, Parser, Tree};

/// Anything that can turn C++ source into a typed syntax tree
pub trait SyntaxTreeProvider {
    fn parse(&self, file: &str, source: &str) -> SyntaxResult<SyntaxTree>;
}

/// A parsed, error-free translation unit together with its source
pub struct SyntaxTree {
    tree: Tree,
    file: Arc<str>,
    source: Arc<str>,
    source_map: SourceMap,
}

impl SyntaxTree {
    pub fn root_node(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn file(&self) -> &Arc<str> {
        &self.file
    }

    pub fn source(&self) -> &Arc<str> {
        &self.source
    }

    pub fn source_map(&self) -> &SourceMap {
        &self.source_map
    }

    pub fn span_of(&self, node: Node<'_>) -> Span {
        self.source_map
            .span_between(node.start_byte(), node.end_byte())
    }

    /// Source text covered by `node`
    pub fn text_of(&self, node: Node<'_>) -> &str {
        self.source
            .get(node.start_byte()..node.end_byte())
            .unwrap_or("")
    }

    /// Total number of nodes, named and anonymous
    pub fn node_count(&self) -> usize {
        self.tree.root_node().descendant_count()
    }
}

impl std::fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("file", &self.file)
            .field("root", &self.tree.root_node().kind())
            .finish()
    }
}

/// The C++ grammar from `tree-sitter-cpp`. A fresh parser is created per
/// call, so one provider can be shared across batch workers.
#[derive(Debug, Default, Clone, Copy)]
pub struct CppTreeSitterProvider;

impl CppTreeSitterProvider {
    pub fn new() -> Self {
        Self
    }

    fn parser(&self) -> SyntaxResult<Parser> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_cpp::LANGUAGE.into())
            .map_err(|e| SyntaxError::LanguageUnavailable {
                message: e.to_string(),
            })?;
        Ok(parser)
    }
}

impl SyntaxTreeProvider for CppTreeSitterProvider {
    fn parse(&self, file: &str, source: &str) -> SyntaxResult<SyntaxTree> {
        let mut parser = self.parser()?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| SyntaxError::ParserReturnedNoTree {
                file: file.to_string(),
            })?;

        let source_map = SourceMap::new(source.to_string());

        if let Some(bad) = first_error_node(tree.root_node()) {
            return Err(parse_failure(file, source, &source_map, bad));
        }

        Ok(SyntaxTree {
            tree,
            file: Arc::from(file),
            source: Arc::from(source),
            source_map,
        })
    }
}

/// Leftmost `ERROR` or `MISSING` node, following only subtrees that
/// report an error
fn first_error_node(root: Node<'_>) -> Option<Node<'_>> {
    if !root.has_error() {
        return None;
    }

    let mut node = root;
    'descend: loop {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.has_error() || child.is_missing() {
                node = child;
                continue 'descend;
            }
        }
        return Some(node);
    }
}

fn parse_failure(file: &str, source: &str, map: &SourceMap, node: Node<'_>) -> SyntaxError {
    let span = map.span_between(node.start_byte(), node.end_byte());
    let missing = node.is_missing();

    let message = if missing {
        format!("missing `{}`", node.kind())
    } else {
        let text = source.get(node.start_byte()..node.end_byte()).unwrap_or("");
        let first_line = text.lines().next().unwrap_or("").trim();
        if first_line.is_empty() {
            "unexpected end of input".to_string()
        } else {
            format!("unexpected `{}`", truncate(first_line, 40))
        }
    };

    SyntaxError::ParseFailure {
        file: file.to_string(),
        line: span.start.line,
        column: span.start.column,
        message,
        snippet: map.snippet(&span),
        missing,
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_parses_valid_translation_unit() {
        let tree = CppTreeSitterProvider::new()
            .parse("ok.cpp", "int main() { return 0; }\n")
            .unwrap();
        assert_eq!(tree.root_node().kind(), "translation_unit");
        assert_eq!(tree.file().as_ref(), "ok.cpp");
        assert!(tree.node_count() > 5);

        let function = tree.root_node().named_child(0).unwrap();
        assert_eq!(function.kind(), "function_definition");
        assert_eq!(tree.span_of(function).start.line, 1);
        assert!(tree.text_of(function).starts_with("int main"));
    }

    #[test]
    fn test_empty_source_is_valid() {
        let tree = CppTreeSitterProvider::new().parse("e.cpp", "").unwrap();
        assert_eq!(tree.root_node().named_child_count(), 0);
    }

    #[test]
    fn test_syntax_error_is_reported_with_location() {
        let err = CppTreeSitterProvider::new()
            .parse("bad.cpp", "int main() {\n  int x = ;\n}\n")
            .unwrap_err();
        assert_matches!(err, SyntaxError::ParseFailure { ref file, line: 2, .. } if file == "bad.cpp");
        assert!(err.snippet().unwrap().contains("int x = ;"));
    }

    #[test]
    fn test_unbalanced_braces_fail() {
        let result = CppTreeSitterProvider::new().parse("bad.cpp", "void f() { if (x) { g(); }\n");
        assert_matches!(result, Err(SyntaxError::ParseFailure { .. }));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("abc", 3), "abc");
    }
}
