//! Source code parsers using tree-sitter
//!
//! Each supported language turns source text into the same normalized
//! structure: an ordered list of [`StructuralBlock`]s (functions, classes,
//! conditionals, loops, handlers, case arms, boolean operators) with their
//! nesting depth, the declared identifiers, and token counts for Halstead
//! measures.
//!
//! Dispatch is an explicit match on [`Language`]; each language module only
//! supplies a [`SyntaxRules`] implementation and the shared walker does the
//! traversal. All grammars are full tree-sitter grammars, so sources with
//! syntax errors are rejected rather than approximated.

mod cpp;
mod java;
mod python;
mod typescript;
mod walker;

use crate::error::AnalysisResult;
use crate::models::{BlockKind, Identifier, Language, StructuralBlock};
use crate::pipeline::Budget;
use tree_sitter::Node;

/// Parse `source` as `language` into its normalized structure
pub fn parse(source: &str, language: Language, budget: &Budget) -> AnalysisResult<ParsedSource> {
    match language {
        Language::Python => walker::parse_with(&python::PythonRules, source, budget),
        Language::JavaScript => walker::parse_with(
            &typescript::ScriptRules::javascript(),
            source,
            budget,
        ),
        Language::TypeScript => walker::parse_with(
            &typescript::ScriptRules::typescript(),
            source,
            budget,
        ),
        Language::Tsx => walker::parse_with(&typescript::ScriptRules::tsx(), source, budget),
        Language::Java => walker::parse_with(&java::JavaRules, source, budget),
        Language::Cpp => walker::parse_with(&cpp::CppRules, source, budget),
    }
}

/// Token counts gathered while walking the tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenCounts {
    pub distinct_operators: u32,
    pub distinct_operands: u32,
    pub total_operators: u32,
    pub total_operands: u32,
}

/// Normalized structure of one source file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSource {
    /// Blocks in source (pre-order) order
    pub blocks: Vec<StructuralBlock>,
    /// Declared names, one per distinct name, at its first declaring line
    pub identifiers: Vec<Identifier>,
    pub tokens: TokenCounts,
}

impl ParsedSource {
    pub fn count(&self, kind: BlockKind) -> usize {
        self.blocks.iter().filter(|b| b.kind == kind).count()
    }
}

/// How the walker treats a syntax node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeRole {
    /// No block; children stay at the same depth
    Transparent,
    /// No block, but children are one level deeper (`else`, `default`, `finally`)
    Nest,
    /// Records a block of this kind
    Block(BlockKind),
}

/// Language-specific knowledge consumed by the shared walker
pub(crate) trait SyntaxRules {
    fn grammar(&self) -> tree_sitter::Language;

    /// Display name used in error messages
    fn label(&self) -> &'static str;

    fn role(&self, node: Node<'_>, source: &[u8]) -> NodeRole;

    /// Node kinds that head or continue an if / else-if chain
    fn is_if(&self, kind: &str) -> bool {
        kind == "if_statement"
    }

    /// Comments and other nodes excluded from the token stream
    fn is_comment(&self, node: Node<'_>) -> bool;

    /// Literals counted as a single operand (strings, template literals)
    fn is_literal(&self, kind: &str) -> bool;

    /// Name of a Function or Class block
    fn block_name(&self, node: Node<'_>, source: &[u8]) -> Option<String>;

    /// Push the names declared directly by `node`
    fn declarations(&self, node: Node<'_>, source: &[u8], out: &mut Vec<Identifier>);
}

pub(crate) fn node_text<'s>(node: Node<'_>, source: &'s [u8]) -> Option<&'s str> {
    node.utf8_text(source).ok()
}

pub(crate) fn line_of(node: Node<'_>) -> u32 {
    node.start_position().row as u32 + 1
}

pub(crate) fn identifier_at(node: Node<'_>, source: &[u8]) -> Option<Identifier> {
    let name = node_text(node, source)?.trim();
    if name.is_empty() {
        return None;
    }
    Some(Identifier {
        name: name.to_string(),
        line: line_of(node),
    })
}

/// Text of the named field, if present
pub(crate) fn field_text(node: Node<'_>, field: &str, source: &[u8]) -> Option<String> {
    node.child_by_field_name(field)
        .and_then(|n| node_text(n, source))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Collect every name inside a binding pattern.
///
/// `is_name` selects the node kinds that are names; subtrees under
/// `skip_fields` (default values, type annotations) are not searched.
pub(crate) fn collect_pattern_names(
    pattern: Node<'_>,
    source: &[u8],
    is_name: fn(&str) -> bool,
    skip_fields: &[&str],
    out: &mut Vec<Identifier>,
) {
    let mut stack = vec![pattern];
    while let Some(node) = stack.pop() {
        if is_name(node.kind()) {
            if let Some(ident) = identifier_at(node, source) {
                out.push(ident);
            }
            continue;
        }
        let mut cursor = node.walk();
        let mut children = Vec::new();
        if cursor.goto_first_child() {
            loop {
                let skip = cursor
                    .field_name()
                    .is_some_and(|field| skip_fields.contains(&field));
                if !skip {
                    children.push(cursor.node());
                }
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }
        stack.extend(children.into_iter().rev());
    }
}
