//! Depth-first traversal and dispatch
//!
//! The walker visits every named node once, in source order, and hands each
//! node to the rule family for its [`NodeCategory`]. It owns the
//! [`TokenStreamBuilder`] (and with it the construct stack) but makes no
//! token-kind decisions of its own: nodes without a rule are traversed
//! transparently.
//!
//! Transparent nodes emit nothing around their children, so they are
//! expanded on an explicit work list instead of the call stack. Only nodes
//! with a rule add a level of recursion, which keeps long expression chains
//! such as `a + b + ... + z` from counting against the depth limit.

use super::error::{TokenizerError, TokenizerResult};
use crate::logging::codes;
use crate::log_debug;
use crate::syntax::SyntaxTree;
use crate::tokens::{ConstructKind, TokenKind, TokenStream, TokenStreamBuilder};
use crate::utils::Span;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use tree_sitter::Node;

/// Dispatch categories over tree-sitter-cpp node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeCategory {
    FunctionDefinition,
    Lambda,
    TypeDefinition(ConstructKind),
    Declaration,
    If,
    For,
    RangeFor,
    While,
    Do,
    Switch,
    Case,
    Jump(TokenKind),
    Try,
    Call,
    Assignment,
    New,
    FieldInitializer,
    Transparent,
}

impl NodeCategory {
    pub fn classify(kind: &str) -> NodeCategory {
        match kind {
            "function_definition" => NodeCategory::FunctionDefinition,
            "lambda_expression" => NodeCategory::Lambda,

            "class_specifier" | "struct_specifier" => {
                NodeCategory::TypeDefinition(ConstructKind::Class)
            }
            "union_specifier" => NodeCategory::TypeDefinition(ConstructKind::Union),
            "enum_specifier" => NodeCategory::TypeDefinition(ConstructKind::Enum),
            "declaration" | "field_declaration" => NodeCategory::Declaration,

            "if_statement" => NodeCategory::If,
            "for_statement" => NodeCategory::For,
            "for_range_loop" => NodeCategory::RangeFor,
            "while_statement" => NodeCategory::While,
            "do_statement" => NodeCategory::Do,
            "switch_statement" => NodeCategory::Switch,
            "case_statement" => NodeCategory::Case,

            "break_statement" => NodeCategory::Jump(TokenKind::Break),
            "continue_statement" => NodeCategory::Jump(TokenKind::Continue),
            "goto_statement" => NodeCategory::Jump(TokenKind::Goto),
            "return_statement" | "co_return_statement" => NodeCategory::Jump(TokenKind::Return),
            "throw_statement" | "throw_expression" => NodeCategory::Jump(TokenKind::Throw),

            "try_statement" => NodeCategory::Try,

            "call_expression" => NodeCategory::Call,
            "assignment_expression" | "update_expression" => NodeCategory::Assignment,
            "new_expression" => NodeCategory::New,
            "field_initializer" => NodeCategory::FieldInitializer,

            _ => NodeCategory::Transparent,
        }
    }
}

/// Counters gathered during one traversal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TokenizationMetrics {
    pub nodes_visited: usize,
    /// Named interior nodes that matched no rule
    pub transparent_nodes: usize,
    /// Deepest nesting of rule-handled nodes
    pub max_depth_reached: usize,
    pub max_construct_depth: usize,
    pub tokens_emitted: usize,
}

/// Limits and switches for one traversal
#[derive(Debug, Clone, Copy)]
pub struct WalkLimits {
    pub max_depth: usize,
    pub max_construct_nesting: usize,
    pub log_transparent_nodes: bool,
}

pub struct Walker<'t> {
    tree: &'t SyntaxTree,
    builder: TokenStreamBuilder,
    limits: WalkLimits,
    cancel: Option<&'t AtomicBool>,
    depth: usize,
    metrics: TokenizationMetrics,
}

impl<'t> Walker<'t> {
    pub fn new(
        tree: &'t SyntaxTree,
        builder: TokenStreamBuilder,
        limits: WalkLimits,
        cancel: Option<&'t AtomicBool>,
    ) -> Self {
        Self {
            tree,
            builder,
            limits,
            cancel,
            depth: 0,
            metrics: TokenizationMetrics::default(),
        }
    }

    /// Walk the whole tree and seal the stream
    pub fn run(mut self) -> TokenizerResult<(TokenStream, TokenizationMetrics)> {
        let root = self.tree.root_node();
        self.visit(root)?;

        let end = self.tree.source().len();
        let end_span = self.tree.source_map().span_between(end, end);
        let stream = self.builder.finish(&end_span)?;

        let mut metrics = self.metrics;
        metrics.tokens_emitted = stream.len();
        Ok((stream, metrics))
    }

    pub(super) fn text(&self, node: Node<'t>) -> &'t str {
        self.tree.text_of(node)
    }

    pub(super) fn visit(&mut self, node: Node<'t>) -> TokenizerResult<()> {
        let mut pending = vec![node];

        while let Some(node) = pending.pop() {
            if !node.is_named() {
                continue;
            }

            if self
                .cancel
                .is_some_and(|flag| flag.load(Ordering::Relaxed))
            {
                return Err(TokenizerError::Cancelled);
            }
            self.metrics.nodes_visited += 1;

            match NodeCategory::classify(node.kind()) {
                NodeCategory::Transparent => {
                    self.transparent(node);
                    let mut cursor = node.walk();
                    let start = pending.len();
                    pending.extend(node.named_children(&mut cursor));
                    pending[start..].reverse();
                }
                category => self.dispatch_nested(node, category)?,
            }
        }
        Ok(())
    }

    fn dispatch_nested(&mut self, node: Node<'t>, category: NodeCategory) -> TokenizerResult<()> {
        self.depth += 1;
        if self.depth > self.limits.max_depth {
            let span = self.tree.span_of(node);
            return Err(TokenizerError::MaxDepthExceeded {
                limit: self.limits.max_depth,
                line: span.start.line,
                column: span.start.column,
            });
        }
        self.metrics.max_depth_reached = self.metrics.max_depth_reached.max(self.depth);

        let result = self.dispatch(node, category);
        self.depth -= 1;
        result
    }

    fn dispatch(&mut self, node: Node<'t>, category: NodeCategory) -> TokenizerResult<()> {
        match category {
            NodeCategory::FunctionDefinition => self.function_definition(node),
            NodeCategory::Lambda => self.lambda(node),
            NodeCategory::TypeDefinition(construct) => self.type_definition(node, construct),
            NodeCategory::Declaration => self.declaration(node),
            NodeCategory::If => self.if_statement(node),
            NodeCategory::For => self.for_statement(node),
            NodeCategory::RangeFor => self.range_for(node),
            NodeCategory::While => self.while_statement(node),
            NodeCategory::Do => self.do_statement(node),
            NodeCategory::Switch => self.switch_statement(node),
            NodeCategory::Case => self.case_statement(node),
            NodeCategory::Jump(kind) => self.jump(node, kind),
            NodeCategory::Try => self.try_statement(node),
            NodeCategory::Call => self.call(node),
            NodeCategory::Assignment => self.assignment(node),
            NodeCategory::New => self.new_expression(node),
            NodeCategory::FieldInitializer => self.field_initializer(node),
            NodeCategory::Transparent => self.visit_children(node),
        }
    }

    fn transparent(&mut self, node: Node<'t>) {
        if node.named_child_count() > 0 && node.kind() != "translation_unit" {
            self.metrics.transparent_nodes += 1;
            if self.limits.log_transparent_nodes {
                log_debug!(code = codes::tokenization::TRANSPARENT_NODE,
                    "No rule for node, visiting children",
                    "kind" => node.kind(),
                    "line" => node.start_position().row + 1
                );
            }
        }
    }

    pub(super) fn visit_children(&mut self, node: Node<'t>) -> TokenizerResult<()> {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.visit(child)?;
        }
        Ok(())
    }

    /// Visit the child stored under `field`, if any
    pub(super) fn visit_field(&mut self, node: Node<'t>, field: &str) -> TokenizerResult<()> {
        match node.child_by_field_name(field) {
            Some(child) => self.visit(child),
            None => Ok(()),
        }
    }

    /// Visit named children except those stored under one of `skip`
    pub(super) fn visit_children_except(
        &mut self,
        node: Node<'t>,
        skip: &[&str],
    ) -> TokenizerResult<()> {
        let mut cursor = node.walk();
        let children: Vec<(Option<&'static str>, Node<'t>)> = node
            .children(&mut cursor)
            .enumerate()
            .map(|(i, child)| (node.field_name_for_child(i as u32), child))
            .collect();

        for (field, child) in children {
            if field.is_some_and(|f| skip.contains(&f)) {
                continue;
            }
            self.visit(child)?;
        }
        Ok(())
    }

    pub(super) fn emit(
        &mut self,
        kind: TokenKind,
        node: Node<'t>,
        name: Option<&str>,
    ) -> TokenizerResult<()> {
        let span = self.tree.span_of(node);
        self.builder.unit(kind, &span, name)?;
        Ok(())
    }

    pub(super) fn open(
        &mut self,
        construct: ConstructKind,
        node: Node<'t>,
        name: Option<&str>,
    ) -> TokenizerResult<()> {
        let span = self.tree.span_of(node);
        if self.builder.depth() >= self.limits.max_construct_nesting {
            return Err(TokenizerError::MaxDepthExceeded {
                limit: self.limits.max_construct_nesting,
                line: span.start.line,
                column: span.start.column,
            });
        }
        self.builder.open(construct, &span, name)?;
        self.metrics.max_construct_depth = self.metrics.max_construct_depth.max(self.builder.depth());
        Ok(())
    }

    /// Close at the last character of `node`
    pub(super) fn close(&mut self, construct: ConstructKind, node: Node<'t>) -> TokenizerResult<()> {
        let span = self.end_span(node);
        self.builder.close(construct, &span)?;
        Ok(())
    }

    /// Run `body` between a BEGIN and END for `construct`
    pub(super) fn enclosed<F>(
        &mut self,
        construct: ConstructKind,
        node: Node<'t>,
        name: Option<&str>,
        body: F,
    ) -> TokenizerResult<()>
    where
        F: FnOnce(&mut Self) -> TokenizerResult<()>,
    {
        self.open(construct, node, name)?;
        body(self)?;
        self.close(construct, node)
    }

    fn end_span(&self, node: Node<'t>) -> Span {
        let end = node.end_byte();
        let start = end.saturating_sub(1).max(node.start_byte());
        self.tree.source_map().span_between(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_covers_rule_families() {
        assert_eq!(
            NodeCategory::classify("function_definition"),
            NodeCategory::FunctionDefinition
        );
        assert_eq!(
            NodeCategory::classify("struct_specifier"),
            NodeCategory::TypeDefinition(ConstructKind::Class)
        );
        assert_eq!(
            NodeCategory::classify("co_return_statement"),
            NodeCategory::Jump(TokenKind::Return)
        );
        assert_eq!(
            NodeCategory::classify("update_expression"),
            NodeCategory::Assignment
        );
    }

    #[test]
    fn test_unknown_kinds_are_transparent() {
        for kind in ["namespace_definition", "compound_statement", "binary_expression", "made_up"] {
            assert_eq!(NodeCategory::classify(kind), NodeCategory::Transparent);
        }
    }
}
