//! `try` blocks and their handlers

use super::error::TokenizerResult;
use super::walker::Walker;
use crate::tokens::ConstructKind;
use tree_sitter::Node;

impl<'t> Walker<'t> {
    /// `TRY_BEGIN body TRY_END`, then one `CATCH` pair per handler
    pub(super) fn try_statement(&mut self, node: Node<'t>) -> TokenizerResult<()> {
        let mut cursor = node.walk();
        let (handlers, protected): (Vec<Node<'t>>, Vec<Node<'t>>) = node
            .named_children(&mut cursor)
            .partition(|c| c.kind() == "catch_clause");

        self.open(ConstructKind::Try, node, None)?;
        for child in &protected {
            self.visit(*child)?;
        }
        self.close(ConstructKind::Try, protected.last().copied().unwrap_or(node))?;

        for handler in handlers {
            self.catch_clause(handler)?;
        }
        Ok(())
    }

    /// `catch (...)` declares nothing
    fn catch_clause(&mut self, node: Node<'t>) -> TokenizerResult<()> {
        self.enclosed(ConstructKind::Catch, node, None, |w| {
            if let Some(params) = node.child_by_field_name("parameters") {
                w.parameter_list(params)?;
            }
            w.visit_field(node, "body")
        })
    }
}
