//! Callable bodies, branches, loops, switch and jumps

use super::declarations::{declared_identifier, find_function_declarator};
use super::error::TokenizerResult;
use super::walker::Walker;
use crate::tokens::{ConstructKind, TokenKind};
use tree_sitter::Node;

impl<'t> Walker<'t> {
    /// `FUNCTION_BEGIN`, parameters, member initializers, body,
    /// `FUNCTION_END`. Definitions without a body emit nothing.
    pub(super) fn function_definition(&mut self, node: Node<'t>) -> TokenizerResult<()> {
        let Some(body) = function_body(node) else {
            return Ok(());
        };

        let function_declarator = node
            .child_by_field_name("declarator")
            .and_then(find_function_declarator);
        let name = function_declarator
            .and_then(|f| f.child_by_field_name("declarator"))
            .map(|n| self.text(n));

        self.enclosed(ConstructKind::Function, node, name, |w| {
            if let Some(declarator) = function_declarator {
                w.parameters(declarator)?;
            }

            let mut cursor = node.walk();
            let initializer_lists: Vec<Node<'t>> = node
                .named_children(&mut cursor)
                .filter(|c| c.kind() == "field_initializer_list")
                .collect();
            for list in initializer_lists {
                w.visit_children(list)?;
            }

            w.visit(body)
        })
    }

    pub(super) fn lambda(&mut self, node: Node<'t>) -> TokenizerResult<()> {
        let declarator = node.child_by_field_name("declarator");
        self.enclosed(ConstructKind::Function, node, None, |w| {
            w.visit_field(node, "captures")?;
            if let Some(declarator) = declarator {
                w.parameters(declarator)?;
            }
            w.visit_field(node, "body")
        })
    }

    /// `VARDEF` for every named parameter of a function or lambda declarator
    pub(super) fn parameters(&mut self, declarator: Node<'t>) -> TokenizerResult<()> {
        match declarator.child_by_field_name("parameters") {
            Some(list) => self.parameter_list(list),
            None => Ok(()),
        }
    }

    pub(super) fn parameter_list(&mut self, list: Node<'t>) -> TokenizerResult<()> {
        let mut cursor = list.walk();
        let params: Vec<Node<'t>> = list.named_children(&mut cursor).collect();

        for param in params {
            if !matches!(
                param.kind(),
                "parameter_declaration"
                    | "optional_parameter_declaration"
                    | "variadic_parameter_declaration"
            ) {
                continue;
            }

            if let Some(declarator) = param.child_by_field_name("declarator") {
                if let Some(ident) = declared_identifier(declarator) {
                    let name = self.text(ident);
                    self.emit(TokenKind::Vardef, param, Some(name))?;
                }
                self.visit_children(declarator)?;
            }
            self.visit_field(param, "default_value")?;
        }
        Ok(())
    }

    /// `IF_BEGIN cond then IF_END`, then `ELSE_BEGIN else ELSE_END` when an
    /// else branch exists. `else if` nests inside the else pair.
    pub(super) fn if_statement(&mut self, node: Node<'t>) -> TokenizerResult<()> {
        let consequence = node.child_by_field_name("consequence");

        self.open(ConstructKind::If, node, None)?;
        self.visit_field(node, "condition")?;
        if let Some(then_branch) = consequence {
            self.visit(then_branch)?;
        }
        self.close(ConstructKind::If, consequence.unwrap_or(node))?;

        if let Some(alternative) = node.child_by_field_name("alternative") {
            self.enclosed(ConstructKind::Else, alternative, None, |w| {
                if alternative.kind() == "else_clause" {
                    w.visit_children(alternative)
                } else {
                    w.visit(alternative)
                }
            })?;
        }
        Ok(())
    }

    pub(super) fn for_statement(&mut self, node: Node<'t>) -> TokenizerResult<()> {
        self.enclosed(ConstructKind::For, node, None, |w| w.visit_children(node))
    }

    /// Range-based `for`; the loop variable is a definition
    pub(super) fn range_for(&mut self, node: Node<'t>) -> TokenizerResult<()> {
        self.enclosed(ConstructKind::For, node, None, |w| {
            w.visit_field(node, "initializer")?;
            if let Some(declarator) = node.child_by_field_name("declarator") {
                w.vardef(declarator)?;
            }
            w.visit_field(node, "right")?;
            w.visit_field(node, "body")
        })
    }

    pub(super) fn while_statement(&mut self, node: Node<'t>) -> TokenizerResult<()> {
        self.enclosed(ConstructKind::While, node, None, |w| w.visit_children(node))
    }

    pub(super) fn do_statement(&mut self, node: Node<'t>) -> TokenizerResult<()> {
        self.enclosed(ConstructKind::Do, node, None, |w| w.visit_children(node))
    }

    pub(super) fn switch_statement(&mut self, node: Node<'t>) -> TokenizerResult<()> {
        self.enclosed(ConstructKind::Switch, node, None, |w| w.visit_children(node))
    }

    /// `case` and `default` alike. Statements under the label belong to the
    /// label node, so fallthrough needs no special handling.
    pub(super) fn case_statement(&mut self, node: Node<'t>) -> TokenizerResult<()> {
        self.emit(TokenKind::Case, node, None)?;
        self.visit_children_except(node, &["value"])
    }

    /// `break`, `continue`, `goto`, `return` and `throw`
    pub(super) fn jump(&mut self, node: Node<'t>, kind: TokenKind) -> TokenizerResult<()> {
        let label = match kind {
            TokenKind::Goto => node.child_by_field_name("label").map(|l| self.text(l)),
            _ => None,
        };
        self.emit(kind, node, label)?;
        self.visit_children_except(node, &["label"])
    }
}

/// Body of a function definition: a compound statement or a function try
/// block. `= default`, `= delete` and pure virtual declarations have none.
fn function_body(node: Node<'_>) -> Option<Node<'_>> {
    if let Some(body) = node.child_by_field_name("body") {
        return Some(body);
    }
    let mut cursor = node.walk();
    let body = node
        .named_children(&mut cursor)
        .find(|c| c.kind() == "try_statement");
    body
}
