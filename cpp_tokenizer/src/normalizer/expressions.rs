//! Calls, assignments and allocations
//!
//! All call spellings (`f()`, `obj.f()`, `p->f()`, `C::f()`, `f<T>()`)
//! collapse onto `APPLY`; every assignment operator and `++`/`--` onto
//! `ASSIGN`. Nested expressions follow in pre-order.

use super::error::TokenizerResult;
use super::walker::Walker;
use crate::tokens::TokenKind;
use tree_sitter::Node;

impl<'t> Walker<'t> {
    pub(super) fn call(&mut self, node: Node<'t>) -> TokenizerResult<()> {
        let name = node
            .child_by_field_name("function")
            .and_then(callee_identifier)
            .map(|n| self.text(n));
        self.emit(TokenKind::Apply, node, name)?;
        self.visit_children(node)
    }

    pub(super) fn assignment(&mut self, node: Node<'t>) -> TokenizerResult<()> {
        self.emit(TokenKind::Assign, node, None)?;
        self.visit_children(node)
    }

    /// `new T[n]` carries a `new_declarator`; everything else constructs
    /// a single object
    pub(super) fn new_expression(&mut self, node: Node<'t>) -> TokenizerResult<()> {
        let kind = if node.child_by_field_name("declarator").is_some() {
            TokenKind::Newarray
        } else {
            TokenKind::Newclass
        };
        let name = node.child_by_field_name("type").map(|t| self.text(t));
        self.emit(kind, node, name)?;
        self.visit_children_except(node, &["type"])
    }

    /// `: member(value)` in a constructor
    pub(super) fn field_initializer(&mut self, node: Node<'t>) -> TokenizerResult<()> {
        let name = node.named_child(0).map(|n| self.text(n));
        self.emit(TokenKind::Assign, node, name)?;
        self.visit_children(node)
    }
}

/// The bare name being called, looking through member access, scope
/// qualification and template arguments
fn callee_identifier(function: Node<'_>) -> Option<Node<'_>> {
    let mut current = function;
    loop {
        match current.kind() {
            "identifier" | "field_identifier" | "destructor_name" | "operator_name" => {
                return Some(current)
            }
            "field_expression" => current = current.child_by_field_name("field")?,
            "qualified_identifier" | "template_function" | "template_method" => {
                current = current.child_by_field_name("name")?
            }
            "parenthesized_expression" => current = current.named_child(0)?,
            _ => return None,
        }
    }
}
