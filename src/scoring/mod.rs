//! Score Composer
//!
//! Turns analyzer outputs into the final [`MetricRecord`]:
//!
//! ```text
//! MI          = maintainability index (Halstead volume, cyclomatic, code lines, comment ratio)
//! rank        = A >= 85, B >= 65, C >= 45, D >= 25, else F
//! readability = weighted blend of seven 0-100 sub-scores (see [`readability`])
//! suggestions = threshold rules in fixed order (see [`suggestions`])
//! ```
//!
//! Weights and thresholds come from the language's [`LanguageThresholds`].

mod maintainability;
mod readability;
mod suggestions;

pub use maintainability::maintainability_index;
pub use readability::{readability, ReadabilityBreakdown};
pub use suggestions::suggest;

use crate::config::LanguageThresholds;
use crate::metrics::{round_to, ComplexityMetrics, TextMetrics};
use crate::models::{FunctionMetrics, HalsteadMetrics, Language, MaintainabilityRank, MetricRecord};
use tracing::debug;

/// Structure-derived inputs that are not part of the complexity figures
#[derive(Debug, Clone, Default)]
pub struct StructureSummary {
    pub functions: Vec<FunctionMetrics>,
    pub class_count: usize,
    pub halstead: HalsteadMetrics,
}

/// Compose the per-file record
pub fn compose(
    language: Language,
    complexity: &ComplexityMetrics,
    text: TextMetrics,
    structure: StructureSummary,
    thresholds: &LanguageThresholds,
) -> MetricRecord {
    let maintainability_index = maintainability_index(
        structure.halstead.volume,
        complexity.cyclomatic,
        text.code_lines,
        text.comment_ratio(),
    );
    let maintainability_rank = MaintainabilityRank::from_index(maintainability_index);

    let function_count = structure.functions.len();
    let breakdown = readability(
        maintainability_index,
        complexity,
        function_count,
        &text,
        thresholds,
    );
    debug!(
        "Readability {:.1}: mi={:.1} complexity={:.1} cognitive={:.1} nesting={:.1} naming={:.1} comments={:.1} duplication={:.1}",
        breakdown.score,
        breakdown.maintainability,
        breakdown.complexity,
        breakdown.cognitive,
        breakdown.nesting,
        breakdown.naming,
        breakdown.comments,
        breakdown.duplication
    );

    let suggestions = suggest(
        complexity,
        &structure.functions,
        &text,
        maintainability_rank,
        thresholds,
    );

    let max_function_length = structure
        .functions
        .iter()
        .map(|f| f.length)
        .max()
        .unwrap_or(0);
    let avg_function_length = if function_count == 0 {
        0.0
    } else {
        let total: usize = structure.functions.iter().map(|f| f.length).sum();
        round_to(total as f64 / function_count as f64, 2)
    };

    let TextMetrics {
        lines_of_code,
        code_lines,
        comment_lines,
        blank_lines,
        total_lines,
        comment_density,
        duplication,
        naming,
    } = text;

    MetricRecord {
        language,
        readability_score: breakdown.score,
        cyclomatic_complexity: complexity.cyclomatic,
        cognitive_complexity: complexity.cognitive,
        maintainability_index,
        maintainability_rank,
        lines_of_code,
        code_lines,
        comment_lines,
        blank_lines,
        total_lines,
        comment_density,
        duplication_percentage: duplication.percentage,
        duplicated_blocks: duplication.blocks,
        avg_name_length: naming.avg_name_length,
        sorted_name_lengths: naming.sorted_name_lengths,
        single_letter_warnings: naming.single_letter_warnings,
        unclear_name_flags: naming.unclear_name_flags,
        long_name_flags: naming.long_name_flags,
        max_nesting_depth: complexity.max_nesting,
        avg_nesting_depth: complexity.avg_nesting,
        function_count,
        class_count: structure.class_count,
        avg_function_length,
        max_function_length,
        functions: structure.functions,
        halstead: structure.halstead,
        suggestions,
    }
}
