//! Readability blend
//!
//! Seven sub-scores, each in [0, 100], combined with the language's weights:
//!
//! ```text
//! maintainability = clamp(MI, 0, 100)
//! complexity      = inverted(extra branches per function + 1, floor 1, max_complexity)
//! cognitive       = inverted(cognitive per function, floor 0, max_cognitive_complexity)
//! nesting         = inverted(max depth, floor 1, max_nesting_depth)
//! naming          = 100 * (1 - outlier identifiers / identifiers) * length fit
//! length fit      = 1 - 0.5 * min(1, |avg name length - ideal| / ideal)
//! comments        = 100 * min(1, density / min_comment_density)
//! duplication     = 100 - duplication percentage
//!
//! inverted(v, floor, limit) = 100 * (1 - min(1, max(0, v - floor) / (2 * limit)))
//! ```
//!
//! A value at the threshold scores 50; twice the threshold scores 0.

use crate::config::LanguageThresholds;
use crate::metrics::{round_to, ComplexityMetrics, TextMetrics};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadabilityBreakdown {
    pub maintainability: f64,
    pub complexity: f64,
    pub cognitive: f64,
    pub nesting: f64,
    pub naming: f64,
    pub comments: f64,
    pub duplication: f64,
    /// Weighted blend, clamped to [0, 100] and rounded to one decimal
    pub score: f64,
}

fn inverted(value: f64, floor: f64, limit: f64) -> f64 {
    let span = 2.0 * limit.max(1.0);
    100.0 * (1.0 - ((value - floor).max(0.0) / span).min(1.0))
}

pub fn readability(
    maintainability_index: f64,
    complexity: &ComplexityMetrics,
    function_count: usize,
    text: &TextMetrics,
    thresholds: &LanguageThresholds,
) -> ReadabilityBreakdown {
    let units = function_count.max(1) as f64;

    let maintainability = maintainability_index.clamp(0.0, 100.0);
    let branches_per_unit = f64::from(complexity.cyclomatic.saturating_sub(1)) / units + 1.0;
    let complexity_score = inverted(
        branches_per_unit,
        1.0,
        f64::from(thresholds.max_complexity),
    );
    let cognitive = inverted(
        f64::from(complexity.cognitive) / units,
        0.0,
        f64::from(thresholds.max_cognitive_complexity),
    );
    let nesting = inverted(
        f64::from(complexity.max_nesting),
        1.0,
        f64::from(thresholds.max_nesting_depth),
    );
    let naming = 100.0
        * (1.0 - text.naming.outlier_ratio())
        * text.naming.length_fit(thresholds.ideal_avg_name_length);
    let comments = if thresholds.min_comment_density <= 0.0 {
        100.0
    } else {
        100.0 * (text.comment_density / thresholds.min_comment_density).min(1.0)
    };
    let duplication = 100.0 - text.duplication.percentage.clamp(0.0, 100.0);

    let w = &thresholds.weights;
    let blended = w.maintainability * maintainability
        + w.complexity * complexity_score
        + w.cognitive * cognitive
        + w.nesting * nesting
        + w.naming * naming
        + w.comments * comments
        + w.duplication * duplication;

    ReadabilityBreakdown {
        maintainability,
        complexity: complexity_score,
        cognitive,
        nesting,
        naming,
        comments,
        duplication,
        score: round_to(blended.clamp(0.0, 100.0), 1),
    }
}
