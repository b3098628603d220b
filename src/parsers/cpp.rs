//! C++ syntax rules for tree-sitter
//!
//! Names of functions and variables sit inside declarator chains
//! (`int *const &x`, `Foo::bar(...)`), so [`declarator_name`] unwraps them
//! down to the identifier.

use super::{identifier_at, node_text, NodeRole, SyntaxRules};
use crate::models::{BlockKind, Identifier};
use tree_sitter::Node;

pub(super) struct CppRules;

impl SyntaxRules for CppRules {
    fn grammar(&self) -> tree_sitter::Language {
        tree_sitter_cpp::LANGUAGE.into()
    }

    fn label(&self) -> &'static str {
        "C++"
    }

    fn role(&self, node: Node<'_>, _source: &[u8]) -> NodeRole {
        match node.kind() {
            "function_definition" => NodeRole::Block(BlockKind::Function),
            // Only definitions with a body; `struct Foo x;` is a type reference
            "class_specifier" | "struct_specifier" if node.child_by_field_name("body").is_some() => {
                NodeRole::Block(BlockKind::Class)
            }

            "if_statement" | "conditional_expression" => NodeRole::Block(BlockKind::If),
            "for_statement" | "for_range_loop" | "while_statement" | "do_statement" => {
                NodeRole::Block(BlockKind::Loop)
            }
            "catch_clause" => NodeRole::Block(BlockKind::Try),
            "case_statement" => {
                if node.child_by_field_name("value").is_some() {
                    NodeRole::Block(BlockKind::Case)
                } else {
                    NodeRole::Nest
                }
            }
            "binary_expression" if is_logical_operator(node) => {
                NodeRole::Block(BlockKind::BooleanOperator)
            }

            "else_clause" => NodeRole::Nest,

            _ => NodeRole::Transparent,
        }
    }

    fn is_comment(&self, node: Node<'_>) -> bool {
        node.kind() == "comment"
    }

    fn is_literal(&self, kind: &str) -> bool {
        matches!(
            kind,
            "string_literal" | "raw_string_literal" | "char_literal" | "concatenated_string"
        )
    }

    fn block_name(&self, node: Node<'_>, source: &[u8]) -> Option<String> {
        let named = match node.kind() {
            "function_definition" => node
                .child_by_field_name("declarator")
                .and_then(declarator_name),
            _ => node.child_by_field_name("name"),
        }?;
        node_text(named, source).map(|s| s.trim().to_string())
    }

    fn declarations(&self, node: Node<'_>, source: &[u8], out: &mut Vec<Identifier>) {
        match node.kind() {
            "function_definition"
            | "parameter_declaration"
            | "optional_parameter_declaration"
            | "for_range_loop" => {
                if let Some(name) = node
                    .child_by_field_name("declarator")
                    .and_then(declarator_name)
                {
                    out.extend(identifier_at(name, source));
                }
            }
            // `int a = 1, *b;` has several declarators
            "declaration" | "field_declaration" => {
                let mut cursor = node.walk();
                for declarator in node.children_by_field_name("declarator", &mut cursor) {
                    if let Some(name) = declarator_name(declarator) {
                        out.extend(identifier_at(name, source));
                    }
                }
            }
            "class_specifier" | "struct_specifier"
                if node.child_by_field_name("body").is_some() =>
            {
                if let Some(name) = node.child_by_field_name("name") {
                    out.extend(identifier_at(name, source));
                }
            }
            _ => {}
        }
    }
}

fn is_logical_operator(node: Node<'_>) -> bool {
    node.child_by_field_name("operator")
        .is_some_and(|op| matches!(op.kind(), "&&" | "||" | "and" | "or"))
}

/// Unwrap pointer, reference, array, init and function declarators down to the
/// declared name. Qualified names resolve to their last segment.
fn declarator_name(declarator: Node<'_>) -> Option<Node<'_>> {
    let mut current = declarator;
    // Bounded: declarator chains are short
    for _ in 0..32 {
        match current.kind() {
            "identifier" | "field_identifier" | "destructor_name" | "operator_name" => {
                return Some(current);
            }
            "qualified_identifier" => {
                current = current.child_by_field_name("name")?;
            }
            _ => {
                current = match current.child_by_field_name("declarator") {
                    Some(inner) => inner,
                    // reference_declarator has no field; the declarator is its last named child
                    None => {
                        let count = current.named_child_count();
                        current.named_child(count.checked_sub(1)?)?
                    }
                };
            }
        }
    }
    None
}
