//! Halstead measures over the parser's token counts
//!
//! ```text
//! n = n1 + n2        vocabulary
//! N = N1 + N2        length
//! V = N * log2(n)    volume
//! ```

use crate::models::HalsteadMetrics;
use crate::parsers::TokenCounts;

/// Derive Halstead measures from distinct/total operator and operand counts.
/// Zero vocabulary yields zero volume rather than `log2(0)`.
pub fn from_counts(counts: &TokenCounts) -> HalsteadMetrics {
    let vocabulary = counts.distinct_operators + counts.distinct_operands;
    let length = counts.total_operators + counts.total_operands;

    let volume = if vocabulary > 0 {
        f64::from(length) * f64::from(vocabulary).log2()
    } else {
        0.0
    };

    HalsteadMetrics {
        distinct_operators: counts.distinct_operators,
        distinct_operands: counts.distinct_operands,
        total_operators: counts.total_operators,
        total_operands: counts.total_operands,
        vocabulary,
        length,
        volume: super::round_to(volume, 2),
    }
}
