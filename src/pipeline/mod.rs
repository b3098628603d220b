//! Analysis pipeline
//!
//! Single file:
//! 1. Validate (non-empty, within the size limit)
//! 2. Parse into structural blocks and, in parallel, classify lines
//! 3. Complexity, per-function metrics, text metrics, Halstead counts
//! 4. Compose the [`MetricRecord`]
//!
//! Batches fan the single-file pipeline out over a bounded rayon pool (see
//! [`batch`]). Every stage is a pure function of its input.

mod batch;
mod budget;

pub use batch::{analyze_batch, BatchFile};
pub use budget::{Budget, CancelFlag};

use crate::config::EngineConfig;
use crate::error::{AnalysisError, AnalysisResult};
use crate::metrics::{self, analyze_complexity, analyze_text, function_metrics, profile_lines};
use crate::models::{BlockKind, MetricRecord, SourceUnit};
use crate::parsers;
use crate::scoring::{compose, StructureSummary};
use tracing::debug;

/// Run the full single-file pipeline
pub fn analyze_source(
    unit: &SourceUnit<'_>,
    config: &EngineConfig,
    budget: &Budget,
) -> AnalysisResult<MetricRecord> {
    if unit.code.trim().is_empty() {
        return Err(AnalysisError::EmptySource);
    }
    if config.max_source_bytes > 0 && unit.code.len() > config.max_source_bytes {
        return Err(AnalysisError::SourceTooLarge {
            bytes: unit.code.len(),
            limit: config.max_source_bytes,
        });
    }
    budget.check()?;

    let (parsed, lines) = rayon::join(
        || parsers::parse(unit.code, unit.language, budget),
        || profile_lines(unit.code, unit.language, budget),
    );
    let parsed = parsed?;
    let lines = lines?;
    budget.check()?;

    let complexity = analyze_complexity(&parsed.blocks);
    let functions = function_metrics(&parsed.blocks, &lines);
    let text = analyze_text(&lines, &parsed.identifiers, config);
    let structure = StructureSummary {
        functions,
        class_count: parsed.count(BlockKind::Class),
        halstead: metrics::halstead::from_counts(&parsed.tokens),
    };

    let record = compose(
        unit.language,
        &complexity,
        text,
        structure,
        &config.thresholds_for(unit.language),
    );
    debug!(
        "Analyzed {} ({}): readability={:.1} cc={} cognitive={} mi={:.2}",
        unit.label(),
        unit.language,
        record.readability_score,
        record.cyclomatic_complexity,
        record.cognitive_complexity,
        record.maintainability_index
    );
    Ok(record)
}
