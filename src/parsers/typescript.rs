//! TypeScript/JavaScript syntax rules for tree-sitter
//!
//! The JavaScript, TypeScript and TSX dialects share node kinds; only the
//! grammar differs. Arrow functions
//! and function expressions count as functions and take their name from the
//! binding they are assigned to.

use super::{collect_pattern_names, field_text, identifier_at, NodeRole, SyntaxRules};
use crate::models::{BlockKind, Identifier};
use tree_sitter::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    JavaScript,
    TypeScript,
    Tsx,
}

pub(super) struct ScriptRules {
    dialect: Dialect,
}

impl ScriptRules {
    pub(super) fn javascript() -> Self {
        Self {
            dialect: Dialect::JavaScript,
        }
    }

    pub(super) fn typescript() -> Self {
        Self {
            dialect: Dialect::TypeScript,
        }
    }

    pub(super) fn tsx() -> Self {
        Self {
            dialect: Dialect::Tsx,
        }
    }
}

fn is_name(kind: &str) -> bool {
    matches!(kind, "identifier" | "shorthand_property_identifier_pattern")
}

/// Default values, annotations and member targets are not bindings
const SKIP_FIELDS: &[&str] = &["right", "type", "object", "property", "index"];

fn is_logical_operator(node: Node<'_>) -> bool {
    node.child_by_field_name("operator")
        .is_some_and(|op| matches!(op.kind(), "&&" | "||"))
}

impl SyntaxRules for ScriptRules {
    fn grammar(&self) -> tree_sitter::Language {
        match self.dialect {
            Dialect::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Dialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Dialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    fn label(&self) -> &'static str {
        match self.dialect {
            Dialect::JavaScript => "JavaScript",
            Dialect::TypeScript => "TypeScript",
            Dialect::Tsx => "TSX",
        }
    }

    fn role(&self, node: Node<'_>, _source: &[u8]) -> NodeRole {
        // The `function` and `class` keywords share their kind with the
        // expression nodes they start
        if !node.is_named() {
            return NodeRole::Transparent;
        }
        match node.kind() {
            "function_declaration"
            | "generator_function_declaration"
            | "function_expression"
            | "function"
            | "generator_function"
            | "arrow_function"
            | "method_definition" => NodeRole::Block(BlockKind::Function),
            "class_declaration" | "abstract_class_declaration" | "class" => {
                NodeRole::Block(BlockKind::Class)
            }

            "if_statement" | "ternary_expression" => NodeRole::Block(BlockKind::If),
            "for_statement" | "for_in_statement" | "while_statement" | "do_statement" => {
                NodeRole::Block(BlockKind::Loop)
            }
            "catch_clause" => NodeRole::Block(BlockKind::Try),
            "switch_case" => NodeRole::Block(BlockKind::Case),
            "binary_expression" if is_logical_operator(node) => {
                NodeRole::Block(BlockKind::BooleanOperator)
            }

            "else_clause" | "switch_default" | "finally_clause" => NodeRole::Nest,

            _ => NodeRole::Transparent,
        }
    }

    fn is_comment(&self, node: Node<'_>) -> bool {
        matches!(node.kind(), "comment" | "html_comment")
    }

    fn is_literal(&self, kind: &str) -> bool {
        matches!(kind, "string" | "template_string" | "regex")
    }

    fn block_name(&self, node: Node<'_>, source: &[u8]) -> Option<String> {
        if let Some(name) = field_text(node, "name", source) {
            return Some(name);
        }
        // Anonymous functions and classes borrow the name they are bound to
        let parent = node.parent()?;
        match parent.kind() {
            "variable_declarator" | "public_field_definition" => {
                field_text(parent, "name", source)
            }
            "field_definition" => field_text(parent, "property", source),
            "pair" => field_text(parent, "key", source),
            "assignment_expression" => field_text(parent, "left", source),
            _ => None,
        }
    }

    fn declarations(&self, node: Node<'_>, source: &[u8], out: &mut Vec<Identifier>) {
        if !node.is_named() {
            return;
        }
        match node.kind() {
            "function_declaration"
            | "generator_function_declaration"
            | "function_expression"
            | "function"
            | "generator_function"
            | "class_declaration"
            | "abstract_class_declaration"
            | "class"
            | "method_definition"
            | "public_field_definition" => {
                if let Some(name) = node.child_by_field_name("name") {
                    out.extend(identifier_at(name, source));
                }
            }
            "field_definition" => {
                if let Some(name) = node.child_by_field_name("property") {
                    out.extend(identifier_at(name, source));
                }
            }
            "formal_parameters" => {
                let mut cursor = node.walk();
                for param in node.named_children(&mut cursor) {
                    let pattern = match param.kind() {
                        "required_parameter" | "optional_parameter" => {
                            param.child_by_field_name("pattern")
                        }
                        _ => Some(param),
                    };
                    if let Some(pattern) = pattern {
                        collect_pattern_names(pattern, source, is_name, SKIP_FIELDS, out);
                    }
                }
            }
            "arrow_function" => {
                if let Some(param) = node.child_by_field_name("parameter") {
                    out.extend(identifier_at(param, source));
                }
            }
            "variable_declarator" => {
                if let Some(name) = node.child_by_field_name("name") {
                    collect_pattern_names(name, source, is_name, SKIP_FIELDS, out);
                }
            }
            "for_in_statement" => {
                if let Some(left) = node.child_by_field_name("left") {
                    collect_pattern_names(left, source, is_name, SKIP_FIELDS, out);
                }
            }
            "catch_clause" => {
                if let Some(param) = node.child_by_field_name("parameter") {
                    collect_pattern_names(param, source, is_name, SKIP_FIELDS, out);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{BlockKind, Language};
    use crate::parsers::{parse, ParsedSource};
    use crate::pipeline::Budget;

    fn parse_js(source: &str) -> ParsedSource {
        parse(source, Language::JavaScript, &Budget::unlimited()).unwrap()
    }

    fn names(parsed: &ParsedSource) -> Vec<&str> {
        parsed.identifiers.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn test_switch_cases_and_default() {
        let parsed = parse_js(
            r#"
function route(action) {
  switch (action) {
    case "open":
      return 1;
    case "close":
      return 2;
    default:
      if (action) { return 3; }
  }
}
"#,
        );
        assert_eq!(parsed.count(BlockKind::Case), 2);
        let nested_if = parsed
            .blocks
            .iter()
            .find(|b| b.kind == BlockKind::If)
            .unwrap();
        assert_eq!(nested_if.depth, 2);
    }

    #[test]
    fn test_logical_operators_only() {
        let parsed = parse_js("const ok = a && b || c;\nconst sum = a + b;\nconst n = a ?? b;\n");
        assert_eq!(parsed.count(BlockKind::BooleanOperator), 2);
    }

    #[test]
    fn test_arrow_function_named_by_binding() {
        let parsed = parse_js("const handleClick = (event) => {\n  return event.target;\n};\n");
        let func = &parsed.blocks[0];
        assert_eq!(func.kind, BlockKind::Function);
        assert_eq!(func.name.as_deref(), Some("handleClick"));
        assert!(names(&parsed).contains(&"event"));
    }

    #[test]
    fn test_destructuring_and_loops() {
        let parsed = parse_js(
            r#"
function total({ items, tax = 0 }, [first, ...rest]) {
  let sum = 0;
  for (const item of items) {
    sum += item.price;
  }
  try {
    first.check();
  } catch (problem) {
    return -1;
  } finally {
    sum += tax;
  }
  return sum;
}
"#,
        );
        let found = names(&parsed);
        for expected in ["total", "items", "tax", "first", "rest", "sum", "item", "problem"] {
            assert!(found.contains(&expected), "missing {expected}: {found:?}");
        }
        assert!(!found.contains(&"price"));
        assert_eq!(parsed.count(BlockKind::Loop), 1);
        assert_eq!(parsed.count(BlockKind::Try), 1);
    }

    #[test]
    fn test_keywords_are_not_blocks() {
        let parsed = parse_js(
            r#"
function add(a, b) {
  return a + b;
}
class Cart {
  size() {
    return 0;
  }
}
const make = function () { return class {}; };
"#,
        );
        let functions: Vec<_> = parsed
            .blocks
            .iter()
            .filter(|b| b.kind == BlockKind::Function)
            .map(|b| b.name.as_deref().unwrap_or("<anonymous>"))
            .collect();
        assert_eq!(functions, vec!["add", "size", "make"]);
        assert_eq!(parsed.count(BlockKind::Class), 2);
    }

    #[test]
    fn test_tsx_accepts_jsx() {
        let source = r#"
export function App(props: { title: string }) {
  return <div className="app">{props.title ? props.title : "hi"}</div>;
}
"#;
        let parsed = parse(source, Language::Tsx, &Budget::unlimited()).unwrap();
        assert_eq!(parsed.count(BlockKind::Function), 1);
        assert_eq!(parsed.count(BlockKind::If), 1);
        assert!(names(&parsed).contains(&"App"));
        assert!(parse(source, Language::TypeScript, &Budget::unlimited()).is_err());
    }

    #[test]
    fn test_typescript_class_and_parameters() {
        let source = r#"
class Cart {
  private count: number = 0;
  add(quantity: number, label?: string): number {
    return quantity > 0 ? this.count + quantity : this.count;
  }
}
"#;
        let parsed = parse(source, Language::TypeScript, &Budget::unlimited()).unwrap();
        assert_eq!(parsed.count(BlockKind::Class), 1);
        assert_eq!(parsed.count(BlockKind::Function), 1);
        assert_eq!(parsed.count(BlockKind::If), 1);
        let found = names(&parsed);
        for expected in ["Cart", "count", "add", "quantity", "label"] {
            assert!(found.contains(&expected), "missing {expected}: {found:?}");
        }
        assert!(!found.contains(&"number"));
    }
}
