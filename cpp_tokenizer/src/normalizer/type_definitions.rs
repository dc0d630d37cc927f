//! `class`, `struct`, `union` and `enum` bodies

use super::error::TokenizerResult;
use super::walker::Walker;
use crate::tokens::ConstructKind;
use tree_sitter::Node;

impl<'t> Walker<'t> {
    /// Only specifiers with a body open a construct; `class A *p;` and
    /// forward declarations emit nothing. Enumerators are not tokenized.
    pub(super) fn type_definition(
        &mut self,
        node: Node<'t>,
        construct: ConstructKind,
    ) -> TokenizerResult<()> {
        let Some(body) = node.child_by_field_name("body") else {
            return Ok(());
        };
        let name = node.child_by_field_name("name").map(|n| self.text(n));

        self.enclosed(construct, node, name, |w| match construct {
            ConstructKind::Enum => Ok(()),
            _ => w.visit_children(body),
        })
    }
}
