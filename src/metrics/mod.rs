//! Metric analyzers
//!
//! - [`complexity`]: cyclomatic/cognitive complexity and nesting from the block sequence
//! - [`lexical`]: per-line code/comment/blank classification
//! - [`duplication`]: shingle hashing over code lines
//! - [`naming`]: identifier length distribution and naming flags
//! - [`halstead`]: vocabulary, length and volume from token counts
//!
//! [`analyze_text`] bundles the lexical, duplication and naming passes.

pub mod complexity;
pub mod duplication;
pub mod halstead;
pub mod lexical;
pub mod naming;

pub use complexity::{analyze_complexity, function_metrics, ComplexityMetrics};
pub use duplication::{detect_duplication, DuplicationReport};
pub use lexical::{profile_lines, LineProfile};
pub use naming::{naming_stats, NamingStats};

use crate::config::EngineConfig;
use crate::models::Identifier;

/// Round to a fixed number of decimal places
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Output of the textual analysis of one file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextMetrics {
    /// Non-blank lines
    pub lines_of_code: usize,
    pub code_lines: usize,
    pub comment_lines: usize,
    pub blank_lines: usize,
    pub total_lines: usize,
    /// comment_lines / lines_of_code x 100
    pub comment_density: f64,
    pub duplication: DuplicationReport,
    pub naming: NamingStats,
}

impl TextMetrics {
    /// comment_lines / lines_of_code as a fraction in [0, 1]
    pub fn comment_ratio(&self) -> f64 {
        if self.lines_of_code == 0 {
            0.0
        } else {
            self.comment_lines as f64 / self.lines_of_code as f64
        }
    }
}

/// Line counts, comment density, duplication and identifier statistics
pub fn analyze_text(
    lines: &LineProfile,
    identifiers: &[Identifier],
    config: &EngineConfig,
) -> TextMetrics {
    let lines_of_code = lines.lines_of_code();
    let comment_lines = lines.comment_lines();
    let total_lines = lines.total_lines();

    let comment_density = if lines_of_code == 0 {
        0.0
    } else {
        round_to(comment_lines as f64 / lines_of_code as f64 * 100.0, 2).clamp(0.0, 100.0)
    };

    TextMetrics {
        lines_of_code,
        code_lines: lines.code_lines(),
        comment_lines,
        blank_lines: total_lines - lines_of_code,
        total_lines,
        comment_density,
        duplication: detect_duplication(
            lines,
            config.effective_shingle_size(),
            config.min_shingle_alnum,
        ),
        naming: naming_stats(identifiers, config.max_identifier_length),
    }
}
