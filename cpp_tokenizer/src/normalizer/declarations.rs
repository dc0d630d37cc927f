//! Variable declarations and declarator helpers
//!
//! One `VARDEF` per declared name, left to right. An `=` initializer adds an
//! `ASSIGN` right after its `VARDEF`, followed by the initializer's own
//! tokens. Brace and parenthesis initialization emit no `ASSIGN`. Function
//! prototypes are not variables and emit nothing.

use super::error::TokenizerResult;
use super::walker::Walker;
use crate::tokens::TokenKind;
use tree_sitter::Node;

impl<'t> Walker<'t> {
    /// `declaration` and `field_declaration`
    pub(super) fn declaration(&mut self, node: Node<'t>) -> TokenizerResult<()> {
        let mut cursor = node.walk();
        let children: Vec<(Option<&'static str>, Node<'t>)> = node
            .children(&mut cursor)
            .enumerate()
            .map(|(i, child)| (node.field_name_for_child(i as u32), child))
            .collect();

        // Trailing `= value` in field and condition declarations belongs to
        // the last declarator, and only counts when that declared a variable.
        let mut last_was_variable = false;

        for (field, child) in children {
            match (field, child.kind()) {
                (Some("type"), _) => self.visit(child)?,
                (Some("declarator"), "init_declarator") => {
                    self.init_declarator(child)?;
                    last_was_variable = false;
                }
                (Some("declarator"), _) => {
                    last_was_variable = declares_variable(child);
                    if last_was_variable {
                        self.vardef(child)?;
                    }
                }
                (None, "=") if last_was_variable => self.emit(TokenKind::Assign, child, None)?,
                (Some("value") | Some("default_value"), _) if last_was_variable => {
                    self.visit(child)?
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn init_declarator(&mut self, node: Node<'t>) -> TokenizerResult<()> {
        match node.child_by_field_name("declarator") {
            Some(declarator) => self.vardef(declarator)?,
            None => self.emit(TokenKind::Vardef, node, None)?,
        }

        let mut cursor = node.walk();
        let equals = node.children(&mut cursor).find(|c| c.kind() == "=");
        if let Some(equals) = equals {
            self.emit(TokenKind::Assign, equals, None)?;
        }

        self.visit_field(node, "value")
    }

    /// `VARDEF`, then whatever the declarator itself contains: array
    /// dimensions, attribute arguments, function-pointer parameters
    pub(super) fn vardef(&mut self, declarator: Node<'t>) -> TokenizerResult<()> {
        let name = declared_identifier(declarator).map(|n| self.text(n));
        self.emit(TokenKind::Vardef, declarator, name)?;
        self.visit_children(declarator)
    }
}

/// Step through pointer, reference and other wrappers to the next declarator
fn inner_declarator(node: Node<'_>) -> Option<Node<'_>> {
    node.child_by_field_name("declarator").or_else(|| {
        node.named_child_count()
            .checked_sub(1)
            .and_then(|last| node.named_child(last))
    })
}

/// The `function_declarator` a declarator ultimately wraps, if any
pub(super) fn find_function_declarator(declarator: Node<'_>) -> Option<Node<'_>> {
    let mut current = declarator;
    loop {
        match current.kind() {
            "function_declarator" | "abstract_function_declarator" => return Some(current),
            "pointer_declarator"
            | "reference_declarator"
            | "attributed_declarator"
            | "parenthesized_declarator" => current = inner_declarator(current)?,
            _ => return None,
        }
    }
}

/// A declarator names a variable unless it is a plain function prototype.
/// `int (*fp)(int)` is a variable: its function declarator wraps a
/// parenthesized one.
pub(super) fn declares_variable(declarator: Node<'_>) -> bool {
    match find_function_declarator(declarator) {
        Some(function) => function
            .child_by_field_name("declarator")
            .is_some_and(|d| d.kind() == "parenthesized_declarator"),
        None => true,
    }
}

/// The identifier a declarator introduces. Abstract declarators (unnamed
/// parameters) have none.
pub(super) fn declared_identifier(declarator: Node<'_>) -> Option<Node<'_>> {
    let mut current = declarator;
    loop {
        match current.kind() {
            "identifier" | "field_identifier" | "type_identifier" | "destructor_name"
            | "operator_name" => return Some(current),
            "qualified_identifier" | "template_function" => {
                current = current.child_by_field_name("name")?
            }
            kind if kind.starts_with("abstract_") => return None,
            "pointer_declarator"
            | "reference_declarator"
            | "attributed_declarator"
            | "parenthesized_declarator"
            | "array_declarator"
            | "function_declarator"
            | "init_declarator"
            | "variadic_declarator"
            | "structured_binding_declarator" => current = inner_declarator(current)?,
            _ => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{parse_cpp, SyntaxTree};

    fn first_declarator(tree: &SyntaxTree) -> Node<'_> {
        let declaration = tree.root_node().named_child(0).unwrap();
        declaration.child_by_field_name("declarator").unwrap()
    }

    #[test]
    fn test_prototype_is_not_a_variable() {
        let tree = parse_cpp("t.cpp", "int *make(int n);").unwrap();
        let declarator = first_declarator(&tree);
        assert!(find_function_declarator(declarator).is_some());
        assert!(!declares_variable(declarator));
    }

    #[test]
    fn test_function_pointer_is_a_variable() {
        let tree = parse_cpp("t.cpp", "int (*handler)(int);").unwrap();
        let declarator = first_declarator(&tree);
        assert!(declares_variable(declarator));
        let ident = declared_identifier(declarator).unwrap();
        assert_eq!(tree.text_of(ident), "handler");
    }

    #[test]
    fn test_identifier_through_wrappers() {
        let tree = parse_cpp("t.cpp", "const char *names[4];").unwrap();
        let ident = declared_identifier(first_declarator(&tree)).unwrap();
        assert_eq!(tree.text_of(ident), "names");
    }
}
