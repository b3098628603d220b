//! Complexity Analyzer
//!
//! Reduces the block sequence produced by the parser to cyclomatic and
//! cognitive complexity plus nesting statistics, for the whole file and per
//! function.
//!
//! - cyclomatic = 1 + every decision block (if, loop, handler, case arm,
//!   boolean operator)
//! - cognitive = each control block contributes its depth (1 at the top
//!   level, +1 per enclosing level); each boolean operator adds 1

use super::lexical::LineProfile;
use crate::models::{BlockKind, FunctionMetrics, StructuralBlock};

/// File-level complexity figures
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComplexityMetrics {
    pub cyclomatic: u32,
    pub cognitive: u32,
    pub max_nesting: u32,
    /// Mean block depth, 0 when there are no blocks
    pub avg_nesting: f64,
}

/// Complexity of one run of blocks, with depths taken relative to `base_depth`
fn tally<'a>(blocks: impl Iterator<Item = &'a StructuralBlock>, base_depth: u32) -> (u32, u32, u32) {
    let mut cyclomatic = 1u32;
    let mut cognitive = 0u32;
    let mut max_nesting = 0u32;

    for block in blocks {
        if block.kind.is_decision() {
            cyclomatic = cyclomatic.saturating_add(1);
        }
        let depth = block.depth.saturating_sub(base_depth);
        if block.kind.is_control_flow() {
            cognitive = cognitive.saturating_add(depth.max(1));
        } else if block.kind == BlockKind::BooleanOperator {
            cognitive = cognitive.saturating_add(1);
        }
        max_nesting = max_nesting.max(depth);
    }

    (cyclomatic, cognitive, max_nesting)
}

pub fn analyze_complexity(blocks: &[StructuralBlock]) -> ComplexityMetrics {
    let (cyclomatic, cognitive, max_nesting) = tally(blocks.iter(), 0);

    let avg_nesting = if blocks.is_empty() {
        0.0
    } else {
        let total: u64 = blocks.iter().map(|b| u64::from(b.depth)).sum();
        super::round_to(total as f64 / blocks.len() as f64, 2)
    };

    ComplexityMetrics {
        cyclomatic,
        cognitive,
        max_nesting,
        avg_nesting,
    }
}

/// `block` sits inside the function at `function`, directly or through
/// nested functions
fn owned_by(blocks: &[StructuralBlock], block: &StructuralBlock, function: usize) -> bool {
    let mut owner = block.enclosing_function;
    while let Some(idx) = owner {
        if idx == function {
            return true;
        }
        // Owners always precede the blocks they own
        if idx < function {
            return false;
        }
        owner = blocks.get(idx).and_then(|b| b.enclosing_function);
    }
    false
}

/// Per-function metrics, in source order.
///
/// A function owns the blocks whose enclosing-function chain reaches it,
/// including those of nested functions. Blocks are in pre-order, so they
/// follow the function contiguously. Depths are relative to the function.
pub fn function_metrics(blocks: &[StructuralBlock], lines: &LineProfile) -> Vec<FunctionMetrics> {
    blocks
        .iter()
        .enumerate()
        .filter(|(_, b)| b.kind == BlockKind::Function)
        .map(|(idx, func)| {
            let body = blocks[idx + 1..]
                .iter()
                .take_while(|b| owned_by(blocks, b, idx));
            let (cyclomatic, cognitive, max_nesting) = tally(body, func.depth);

            FunctionMetrics {
                name: func
                    .name
                    .clone()
                    .unwrap_or_else(|| "<anonymous>".to_string()),
                start_line: func.start_line,
                end_line: func.end_line,
                length: lines.code_lines_between(func.start_line, func.end_line),
                cyclomatic_complexity: cyclomatic,
                cognitive_complexity: cognitive,
                max_nesting_depth: max_nesting,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::lexical::profile_lines;
    use crate::models::Language;
    use crate::pipeline::Budget;

    fn block(kind: BlockKind, depth: u32, start_line: u32, end_line: u32) -> StructuralBlock {
        StructuralBlock {
            kind,
            depth,
            start_line,
            end_line,
            name: None,
            enclosing_function: None,
        }
    }

    fn owned(mut block: StructuralBlock, function: usize) -> StructuralBlock {
        block.enclosing_function = Some(function);
        block
    }

    #[test]
    fn test_no_blocks() {
        let metrics = analyze_complexity(&[]);
        assert_eq!(metrics.cyclomatic, 1);
        assert_eq!(metrics.cognitive, 0);
        assert_eq!(metrics.max_nesting, 0);
        assert_eq!(metrics.avg_nesting, 0.0);
    }

    #[test]
    fn test_if_with_nested_loop() {
        let blocks = vec![
            block(BlockKind::Function, 0, 1, 10),
            block(BlockKind::If, 1, 2, 8),
            block(BlockKind::Loop, 2, 3, 7),
        ];
        let metrics = analyze_complexity(&blocks);
        assert_eq!(metrics.cyclomatic, 3);
        assert_eq!(metrics.cognitive, 3);
        assert_eq!(metrics.max_nesting, 2);
        assert_eq!(metrics.avg_nesting, 1.0);
    }

    #[test]
    fn test_boolean_operators_flat_increment() {
        let blocks = vec![
            block(BlockKind::If, 1, 1, 3),
            block(BlockKind::BooleanOperator, 1, 1, 1),
            block(BlockKind::BooleanOperator, 1, 1, 1),
            block(BlockKind::Case, 2, 2, 2),
        ];
        let metrics = analyze_complexity(&blocks);
        assert_eq!(metrics.cyclomatic, 5);
        assert_eq!(metrics.cognitive, 1 + 1 + 1 + 2);
    }

    #[test]
    fn test_function_metrics_relative_depth() {
        let source = "class A:\n    def run(self):\n        if self.ready:\n            for x in self.items:\n                pass\n        return 1\n\ndef empty():\n    pass\n";
        let profile = profile_lines(source, Language::Python, &Budget::unlimited()).unwrap();
        let mut run = block(BlockKind::Function, 0, 2, 6);
        run.name = Some("run".into());
        let mut empty = block(BlockKind::Function, 0, 8, 9);
        empty.name = Some("empty".into());
        let blocks = vec![
            block(BlockKind::Class, 0, 1, 6),
            run,
            owned(block(BlockKind::If, 1, 3, 5), 1),
            owned(block(BlockKind::Loop, 2, 4, 5), 1),
            empty,
        ];

        let functions = function_metrics(&blocks, &profile);
        assert_eq!(functions.len(), 2);

        assert_eq!(functions[0].name, "run");
        assert_eq!(functions[0].cyclomatic_complexity, 3);
        assert_eq!(functions[0].cognitive_complexity, 3);
        assert_eq!(functions[0].max_nesting_depth, 2);
        assert_eq!(functions[0].length, 5);

        assert_eq!(functions[1].name, "empty");
        assert_eq!(functions[1].cyclomatic_complexity, 1);
        assert_eq!(functions[1].cognitive_complexity, 0);
        assert_eq!(functions[1].max_nesting_depth, 0);
        assert_eq!(functions[1].length, 2);
    }

    #[test]
    fn test_function_inside_loop_measured_from_its_own_depth() {
        let source = "for a in b:\n    def inner():\n        if a:\n            pass\n";
        let profile = profile_lines(source, Language::Python, &Budget::unlimited()).unwrap();
        let blocks = vec![
            block(BlockKind::Loop, 1, 1, 4),
            block(BlockKind::Function, 1, 2, 4),
            owned(block(BlockKind::If, 2, 3, 4), 1),
        ];
        let functions = function_metrics(&blocks, &profile);
        assert_eq!(functions[0].name, "<anonymous>");
        assert_eq!(functions[0].cognitive_complexity, 1);
        assert_eq!(functions[0].max_nesting_depth, 1);
    }

    #[test]
    fn test_functions_sharing_a_line_keep_their_own_blocks() {
        let source = "function a() { if (x) {} } function b() { while (y) { if (z) {} } }\n";
        let profile = profile_lines(source, Language::JavaScript, &Budget::unlimited()).unwrap();
        let mut a = block(BlockKind::Function, 0, 1, 1);
        a.name = Some("a".into());
        let mut b = block(BlockKind::Function, 0, 1, 1);
        b.name = Some("b".into());
        let blocks = vec![
            a,
            owned(block(BlockKind::If, 1, 1, 1), 0),
            b,
            owned(block(BlockKind::Loop, 1, 1, 1), 2),
            owned(block(BlockKind::If, 2, 1, 1), 2),
        ];

        let functions = function_metrics(&blocks, &profile);
        assert_eq!(functions[0].name, "a");
        assert_eq!(functions[0].cyclomatic_complexity, 2);
        assert_eq!(functions[0].cognitive_complexity, 1);
        assert_eq!(functions[1].name, "b");
        assert_eq!(functions[1].cyclomatic_complexity, 3);
        assert_eq!(functions[1].cognitive_complexity, 3);
        assert_eq!(functions[1].max_nesting_depth, 2);
    }

    #[test]
    fn test_nested_function_blocks_count_toward_outer() {
        let blocks = vec![
            block(BlockKind::Function, 0, 1, 6),
            owned(block(BlockKind::Function, 0, 2, 4), 0),
            owned(block(BlockKind::If, 1, 3, 4), 1),
            owned(block(BlockKind::Loop, 1, 5, 6), 0),
        ];
        let functions = function_metrics(&blocks, &LineProfile::default());
        assert_eq!(functions[0].cyclomatic_complexity, 3);
        assert_eq!(functions[1].cyclomatic_complexity, 2);
    }
}
