//! Python syntax rules for tree-sitter

use super::{collect_pattern_names, field_text, identifier_at, node_text, NodeRole, SyntaxRules};
use crate::models::{BlockKind, Identifier};
use tree_sitter::Node;

pub(super) struct PythonRules;

fn is_name(kind: &str) -> bool {
    kind == "identifier"
}

/// Fields of patterns that hold values or annotations rather than bindings
const SKIP_FIELDS: &[&str] = &["value", "type", "attribute", "object", "subscript"];

impl SyntaxRules for PythonRules {
    fn grammar(&self) -> tree_sitter::Language {
        tree_sitter_python::LANGUAGE.into()
    }

    fn label(&self) -> &'static str {
        "Python"
    }

    fn role(&self, node: Node<'_>, source: &[u8]) -> NodeRole {
        match node.kind() {
            "function_definition" => NodeRole::Block(BlockKind::Function),
            "class_definition" => NodeRole::Block(BlockKind::Class),

            "if_statement" | "elif_clause" | "conditional_expression" | "if_clause" => {
                NodeRole::Block(BlockKind::If)
            }
            "for_statement" | "while_statement" => NodeRole::Block(BlockKind::Loop),
            "except_clause" | "except_group_clause" => NodeRole::Block(BlockKind::Try),
            "case_clause" if !is_wildcard_case(node, source) => NodeRole::Block(BlockKind::Case),
            "boolean_operator" => NodeRole::Block(BlockKind::BooleanOperator),

            // `case _:`, `else:` and `finally:` bodies nest without adding a path
            "case_clause" | "else_clause" | "finally_clause" => NodeRole::Nest,

            _ => NodeRole::Transparent,
        }
    }

    fn is_if(&self, kind: &str) -> bool {
        matches!(kind, "if_statement" | "elif_clause")
    }

    fn is_comment(&self, node: Node<'_>) -> bool {
        match node.kind() {
            "comment" => true,
            // Docstrings: a statement that is only a string
            "expression_statement" => {
                node.named_child_count() == 1
                    && node.named_child(0).is_some_and(|c| c.kind() == "string")
            }
            _ => false,
        }
    }

    fn is_literal(&self, kind: &str) -> bool {
        matches!(kind, "string" | "concatenated_string")
    }

    fn block_name(&self, node: Node<'_>, source: &[u8]) -> Option<String> {
        field_text(node, "name", source)
    }

    fn declarations(&self, node: Node<'_>, source: &[u8], out: &mut Vec<Identifier>) {
        match node.kind() {
            "function_definition" | "class_definition" => {
                if let Some(name) = node.child_by_field_name("name") {
                    out.extend(identifier_at(name, source));
                }
            }
            "parameters" | "lambda_parameters" => {
                collect_pattern_names(node, source, is_name, SKIP_FIELDS, out);
            }
            "assignment" | "for_statement" | "for_in_clause" => {
                if let Some(target) = node.child_by_field_name("left") {
                    collect_pattern_names(target, source, is_name, SKIP_FIELDS, out);
                }
            }
            "named_expression" => {
                if let Some(name) = node.child_by_field_name("name") {
                    out.extend(identifier_at(name, source));
                }
            }
            // `with open(p) as f`
            "as_pattern" => {
                if let Some(alias) = node.child_by_field_name("alias") {
                    collect_pattern_names(alias, source, is_name, SKIP_FIELDS, out);
                }
            }
            // `except E as e`
            "except_clause" | "except_group_clause" => {
                if let Some(alias) = node.child_by_field_name("alias") {
                    collect_pattern_names(alias, source, is_name, SKIP_FIELDS, out);
                } else {
                    let mut cursor = node.walk();
                    let mut after_as = false;
                    for child in node.children(&mut cursor) {
                        if after_as && is_name(child.kind()) {
                            out.extend(identifier_at(child, source));
                        }
                        after_as = child.kind() == "as";
                    }
                }
            }
            _ => {}
        }
    }
}

fn is_wildcard_case(node: Node<'_>, source: &[u8]) -> bool {
    let mut cursor = node.walk();
    let first_pattern = node
        .named_children(&mut cursor)
        .find(|c| c.kind() == "case_pattern");
    first_pattern
        .and_then(|p| node_text(p, source))
        .is_some_and(|text| text.trim() == "_")
}
