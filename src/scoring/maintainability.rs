//! Maintainability Index
//!
//! ```text
//! MI = MAX(0, (171 - 5.2 * ln(V) - 0.23 * CC - 16.2 * ln(SLOC) + 50 * sin(sqrt(2.4 * CM))) * 100 / 171)
//! ```
//!
//! - V = Halstead volume, floored at 1
//! - CC = cyclomatic complexity
//! - SLOC = code lines, floored at 1
//! - CM = comment lines / non-blank lines, as a fraction in [0, 1]
//!
//! `sqrt(2.4)` is below `pi/2`, so the comment term only grows with CM.
//! There is no upper clamp: tiny, well-commented files can exceed 100.

use crate::metrics::round_to;

pub fn maintainability_index(
    halstead_volume: f64,
    cyclomatic_complexity: u32,
    code_lines: usize,
    comment_ratio: f64,
) -> f64 {
    let volume = halstead_volume.max(1.0);
    let sloc = (code_lines as f64).max(1.0);
    let cm = comment_ratio.clamp(0.0, 1.0);

    let raw = 171.0 - 5.2 * volume.ln() - 0.23 * f64::from(cyclomatic_complexity)
        - 16.2 * sloc.ln()
        + 50.0 * (2.4 * cm).sqrt().sin();

    round_to((raw * 100.0 / 171.0).max(0.0), 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trivial_file_exceeds_100_with_comments() {
        let mi = maintainability_index(0.0, 1, 1, 1.0);
        assert!(mi > 100.0, "{mi}");
    }

    #[test]
    fn test_floors_avoid_negative_logs() {
        let mi = maintainability_index(0.0, 1, 0, 0.0);
        assert_eq!(mi, round_to((171.0 - 0.23) * 100.0 / 171.0, 2));
    }

    #[test]
    fn test_large_complex_code_is_clamped_at_zero() {
        assert_eq!(maintainability_index(5_000_000.0, 400, 100_000, 0.0), 0.0);
    }

    #[test]
    fn test_comments_never_lower_the_index() {
        let mut previous = maintainability_index(900.0, 6, 60, 0.0);
        for step in 1..=20 {
            let ratio = f64::from(step) / 20.0;
            let mi = maintainability_index(900.0, 6, 60, ratio);
            assert!(mi >= previous, "ratio {ratio}: {mi} < {previous}");
            previous = mi;
        }
    }

    #[test]
    fn test_complexity_lowers_the_index() {
        let simple = maintainability_index(500.0, 1, 30, 0.1);
        let branchy = maintainability_index(500.0, 25, 30, 0.1);
        assert!(branchy < simple);
    }
}
