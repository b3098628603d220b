//! Shared tree walk producing the normalized structure
//!
//! Depth rules:
//! - control blocks (If, Loop, Try handler, Case arm) sit one level below the
//!   enclosing control depth, and their bodies inherit that level
//! - Function and Class blocks take the depth of their position and do not
//!   add a level themselves
//! - `elif` / `else if` continue their chain at the head `if`'s level
//! - a loop's `else` body sits at the loop body's level
//! - BooleanOperator blocks take the depth of the surrounding expression
//!
//! The walk is iterative, so deeply nested sources cannot overflow the stack.

use super::{line_of, node_text, NodeRole, ParsedSource, SyntaxRules, TokenCounts};
use crate::error::{AnalysisError, AnalysisResult};
use crate::models::{BlockKind, Identifier, StructuralBlock};
use crate::pipeline::Budget;
use rustc_hash::FxHashSet;
use tracing::debug;
use tree_sitter::{Node, ParseOptions, ParseState, Parser, Point};

/// Nodes visited between budget checks
const CHECK_INTERVAL: usize = 512;

pub(super) fn parse_with<R: SyntaxRules>(
    rules: &R,
    source: &str,
    budget: &Budget,
) -> AnalysisResult<ParsedSource> {
    budget.check()?;

    let mut parser = Parser::new();
    parser.set_language(&rules.grammar()).map_err(|e| {
        AnalysisError::Internal(format!("failed to set {} language: {}", rules.label(), e))
    })?;

    // The progress callback halts tree-sitter once the budget runs out
    let bytes = source.as_bytes();
    let mut read = |offset: usize, _: Point| bytes.get(offset..).unwrap_or_default();
    let mut halt = |_: &ParseState| budget.check().is_err();
    let options = ParseOptions::new().progress_callback(&mut halt);
    let Some(tree) = parser.parse_with_options(&mut read, None, Some(options)) else {
        budget.check()?;
        return Err(AnalysisError::Internal(format!(
            "{} parser returned no tree",
            rules.label()
        )));
    };

    let root = tree.root_node();
    if root.has_error() {
        return Err(first_syntax_error(root, source.as_bytes()));
    }
    budget.check()?;

    walk(rules, root, source.as_bytes(), budget)
}

#[derive(Clone, Copy)]
struct Frame<'t> {
    node: Node<'t>,
    /// Control depth of the context this node lives in
    depth: u32,
    /// Innermost enclosing Function block
    owner: Option<usize>,
    /// Node is the `else` of an if chain; an `if` directly inside continues the chain
    else_chain: bool,
    /// Inside a comment or literal; no more tokens are counted
    quiet: bool,
}

#[derive(Default)]
struct TokenTally<'s> {
    operators: FxHashSet<&'s str>,
    operands: FxHashSet<&'s str>,
    total_operators: u32,
    total_operands: u32,
}

impl<'s> TokenTally<'s> {
    fn operator(&mut self, text: &'s str) {
        self.operators.insert(text);
        self.total_operators += 1;
    }

    fn operand(&mut self, text: &'s str) {
        self.operands.insert(text);
        self.total_operands += 1;
    }

    fn finish(self) -> TokenCounts {
        TokenCounts {
            distinct_operators: self.operators.len() as u32,
            distinct_operands: self.operands.len() as u32,
            total_operators: self.total_operators,
            total_operands: self.total_operands,
        }
    }
}

fn walk<'t, 's, R: SyntaxRules>(
    rules: &R,
    root: Node<'t>,
    source: &'s [u8],
    budget: &Budget,
) -> AnalysisResult<ParsedSource> {
    let mut blocks: Vec<StructuralBlock> = Vec::new();
    let mut identifiers: Vec<Identifier> = Vec::new();
    let mut tokens = TokenTally::default();

    let mut stack = vec![Frame {
        node: root,
        depth: 0,
        owner: None,
        else_chain: false,
        quiet: false,
    }];
    let mut children: Vec<(Option<&'static str>, Node<'t>)> = Vec::new();
    let mut visited = 0usize;

    while let Some(frame) = stack.pop() {
        visited += 1;
        if visited % CHECK_INTERVAL == 0 {
            budget.check()?;
        }

        let node = frame.node;
        let kind = node.kind();

        let mut quiet = frame.quiet || rules.is_comment(node);
        if !quiet {
            if rules.is_literal(kind) {
                if let Some(text) = node_text(node, source) {
                    tokens.operand(text);
                }
                quiet = true;
            } else if node.child_count() == 0 {
                if let Some(text) = node_text(node, source).filter(|t| !t.trim().is_empty()) {
                    if node.is_named() {
                        tokens.operand(text);
                    } else {
                        tokens.operator(text);
                    }
                }
            }
        }

        rules.declarations(node, source, &mut identifiers);

        let role = rules.role(node, source);
        let (child_depth, owner) = match role {
            NodeRole::Transparent => (frame.depth, frame.owner),
            NodeRole::Nest => (frame.depth + 1, frame.owner),
            NodeRole::Block(block_kind) => {
                let depth = if block_kind.is_control_flow() {
                    frame.depth + 1
                } else {
                    frame.depth
                };
                let name = match block_kind {
                    BlockKind::Function | BlockKind::Class => rules.block_name(node, source),
                    _ => None,
                };
                let index = blocks.len();
                blocks.push(StructuralBlock {
                    kind: block_kind,
                    depth,
                    start_line: line_of(node),
                    end_line: node.end_position().row as u32 + 1,
                    name,
                    enclosing_function: frame.owner,
                });
                let owner = if block_kind == BlockKind::Function {
                    Some(index)
                } else {
                    frame.owner
                };
                (depth, owner)
            }
        };

        children.clear();
        let mut cursor = node.walk();
        if cursor.goto_first_child() {
            loop {
                children.push((cursor.field_name(), cursor.node()));
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }

        let chain_head = role == NodeRole::Block(BlockKind::If) && rules.is_if(kind);
        let loop_head = role == NodeRole::Block(BlockKind::Loop);

        // Reverse so children pop in source order
        for &(field, child) in children.iter().rev() {
            let child_kind = child.kind();
            let mut depth = child_depth;
            let mut else_chain = false;

            if chain_head
                && (field == Some("alternative")
                    || child_kind == "else_clause"
                    || child_kind == "elif_clause")
            {
                if rules.is_if(child_kind) {
                    depth = frame.depth;
                } else if child_kind == "else_clause" {
                    depth = frame.depth;
                    else_chain = true;
                }
            } else if loop_head && child_kind == "else_clause" {
                depth = frame.depth;
            } else if frame.else_chain && rules.is_if(child_kind) {
                depth = frame.depth;
            }

            stack.push(Frame {
                node: child,
                depth,
                owner,
                else_chain,
                quiet,
            });
        }
    }

    let identifiers = dedup_identifiers(identifiers);
    debug!(
        "{}: {} blocks, {} identifiers, {} nodes",
        rules.label(),
        blocks.len(),
        identifiers.len(),
        visited
    );

    Ok(ParsedSource {
        blocks,
        identifiers,
        tokens: tokens.finish(),
    })
}

/// Keep the first declaration of each name
fn dedup_identifiers(identifiers: Vec<Identifier>) -> Vec<Identifier> {
    let mut seen = FxHashSet::default();
    let mut unique: Vec<Identifier> = identifiers
        .into_iter()
        .filter(|ident| seen.insert(ident.name.clone()))
        .collect();
    unique.sort_by_key(|ident| ident.line);
    unique
}

/// Locate the first ERROR or MISSING node in source order
fn first_syntax_error(root: Node<'_>, source: &[u8]) -> AnalysisError {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_missing() {
            return AnalysisError::Parse {
                line: node.start_position().row + 1,
                reason: format!("missing `{}`", node.kind()),
            };
        }
        if node.is_error() {
            let snippet = node_text(node, source)
                .map(str::trim)
                .filter(|t| !t.is_empty() && t.len() <= 24 && !t.contains('\n'));
            let reason = match snippet {
                Some(text) => format!("unexpected `{}`", text),
                None => "unexpected syntax".to_string(),
            };
            return AnalysisError::Parse {
                line: node.start_position().row + 1,
                reason,
            };
        }

        let mut cursor = node.walk();
        let erroneous: Vec<Node<'_>> = node
            .children(&mut cursor)
            .filter(|c| c.has_error() || c.is_missing())
            .collect();
        stack.extend(erroneous.into_iter().rev());
    }

    // has_error() was true but no node was found
    AnalysisError::Parse {
        line: 1,
        reason: "unexpected syntax".to_string(),
    }
}
