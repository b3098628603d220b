//! Java syntax rules for tree-sitter

use super::{field_text, identifier_at, node_text, NodeRole, SyntaxRules};
use crate::models::{BlockKind, Identifier};
use tree_sitter::Node;

pub(super) struct JavaRules;

impl SyntaxRules for JavaRules {
    fn grammar(&self) -> tree_sitter::Language {
        tree_sitter_java::LANGUAGE.into()
    }

    fn label(&self) -> &'static str {
        "Java"
    }

    fn role(&self, node: Node<'_>, source: &[u8]) -> NodeRole {
        match node.kind() {
            "method_declaration" | "constructor_declaration" | "compact_constructor_declaration" => {
                NodeRole::Block(BlockKind::Function)
            }
            "class_declaration"
            | "interface_declaration"
            | "enum_declaration"
            | "record_declaration"
            | "annotation_type_declaration" => NodeRole::Block(BlockKind::Class),

            "if_statement" | "ternary_expression" => NodeRole::Block(BlockKind::If),
            "for_statement" | "enhanced_for_statement" | "while_statement" | "do_statement" => {
                NodeRole::Block(BlockKind::Loop)
            }
            "catch_clause" => NodeRole::Block(BlockKind::Try),
            // One path per `case` label, as in C++: stacked `case 1: case 2:`
            // labels parse as separate groups. `case 1, 2 ->` is one label.
            "switch_block_statement_group" | "switch_rule" => {
                if is_default_arm(node, source) {
                    NodeRole::Nest
                } else {
                    NodeRole::Block(BlockKind::Case)
                }
            }
            "binary_expression" if is_logical_operator(node) => {
                NodeRole::Block(BlockKind::BooleanOperator)
            }

            "finally_clause" => NodeRole::Nest,

            _ => NodeRole::Transparent,
        }
    }

    fn is_comment(&self, node: Node<'_>) -> bool {
        matches!(node.kind(), "line_comment" | "block_comment")
    }

    fn is_literal(&self, kind: &str) -> bool {
        matches!(kind, "string_literal" | "character_literal" | "text_block")
    }

    fn block_name(&self, node: Node<'_>, source: &[u8]) -> Option<String> {
        field_text(node, "name", source)
    }

    fn declarations(&self, node: Node<'_>, source: &[u8], out: &mut Vec<Identifier>) {
        match node.kind() {
            "method_declaration"
            | "constructor_declaration"
            | "compact_constructor_declaration"
            | "class_declaration"
            | "interface_declaration"
            | "enum_declaration"
            | "record_declaration"
            | "annotation_type_declaration"
            | "enum_constant"
            | "formal_parameter"
            | "catch_formal_parameter"
            | "variable_declarator"
            | "enhanced_for_statement"
            | "resource" => {
                if let Some(name) = node.child_by_field_name("name") {
                    out.extend(identifier_at(name, source));
                }
            }
            "lambda_expression" => {
                if let Some(params) = node.child_by_field_name("parameters") {
                    match params.kind() {
                        "identifier" => out.extend(identifier_at(params, source)),
                        "inferred_parameters" => {
                            let mut cursor = params.walk();
                            for param in params.named_children(&mut cursor) {
                                if param.kind() == "identifier" {
                                    out.extend(identifier_at(param, source));
                                }
                            }
                        }
                        // formal_parameters are picked up as formal_parameter nodes
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }
}

fn is_logical_operator(node: Node<'_>) -> bool {
    node.child_by_field_name("operator")
        .is_some_and(|op| matches!(op.kind(), "&&" | "||"))
}

/// An arm whose only labels are `default`
fn is_default_arm(node: Node<'_>, source: &[u8]) -> bool {
    let mut cursor = node.walk();
    let mut labels = node
        .children(&mut cursor)
        .filter(|c| c.kind() == "switch_label")
        .peekable();
    if labels.peek().is_none() {
        return false;
    }
    labels.all(|label| {
        node_text(label, source).is_some_and(|text| text.trim_start().starts_with("default"))
    })
}
