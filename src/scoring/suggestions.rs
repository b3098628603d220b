//! Threshold rules that turn metrics into improvement suggestions
//!
//! Rules run in a fixed order and fire independently, so the same metrics
//! always produce the same list.

use crate::config::LanguageThresholds;
use crate::metrics::{ComplexityMetrics, TextMetrics};
use crate::models::{FunctionMetrics, MaintainabilityRank};

/// Longest name list spelled out in one suggestion
const MAX_LISTED_NAMES: usize = 5;

fn list_names(names: &[String]) -> String {
    let shown: Vec<&str> = names
        .iter()
        .take(MAX_LISTED_NAMES)
        .map(String::as_str)
        .collect();
    if names.len() > MAX_LISTED_NAMES {
        format!(
            "{} and {} more",
            shown.join(", "),
            names.len() - MAX_LISTED_NAMES
        )
    } else {
        shown.join(", ")
    }
}

pub fn suggest(
    complexity: &ComplexityMetrics,
    functions: &[FunctionMetrics],
    text: &TextMetrics,
    rank: MaintainabilityRank,
    thresholds: &LanguageThresholds,
) -> Vec<String> {
    let mut out = Vec::new();

    // Branching
    if functions.is_empty() {
        if complexity.cyclomatic > thresholds.max_complexity {
            out.push(format!(
                "Reduce branching in this file (cyclomatic complexity {} exceeds {})",
                complexity.cyclomatic, thresholds.max_complexity
            ));
        }
    } else {
        for func in functions
            .iter()
            .filter(|f| f.cyclomatic_complexity > thresholds.max_complexity)
        {
            out.push(format!(
                "Reduce branching in function `{}` (cyclomatic complexity {} exceeds {})",
                func.name, func.cyclomatic_complexity, thresholds.max_complexity
            ));
        }
    }

    // Cognitive load
    if functions.is_empty() {
        if complexity.cognitive > thresholds.max_cognitive_complexity {
            out.push(format!(
                "Simplify the control flow of this file (cognitive complexity {} exceeds {})",
                complexity.cognitive, thresholds.max_cognitive_complexity
            ));
        }
    } else {
        for func in functions
            .iter()
            .filter(|f| f.cognitive_complexity > thresholds.max_cognitive_complexity)
        {
            out.push(format!(
                "Simplify the control flow of function `{}` (cognitive complexity {} exceeds {})",
                func.name, func.cognitive_complexity, thresholds.max_cognitive_complexity
            ));
        }
    }

    if complexity.max_nesting > thresholds.max_nesting_depth {
        out.push(format!(
            "Reduce nesting depth ({} levels, at most {} recommended); use early returns or extract helpers",
            complexity.max_nesting, thresholds.max_nesting_depth
        ));
    }

    for func in functions
        .iter()
        .filter(|f| f.length > thresholds.max_function_length)
    {
        out.push(format!(
            "Split function `{}` into smaller functions ({} lines, at most {} recommended)",
            func.name, func.length, thresholds.max_function_length
        ));
    }

    if text.lines_of_code > 0 && text.comment_density < thresholds.min_comment_density {
        out.push(format!(
            "Add documentation: comment density is {:.1}%, at least {:.1}% recommended",
            text.comment_density, thresholds.min_comment_density
        ));
    }

    if text.duplication.percentage > thresholds.max_duplication {
        out.push(format!(
            "Extract repeated blocks into shared functions ({:.1}% of code lines are duplicated)",
            text.duplication.percentage
        ));
    }

    let naming = &text.naming;
    if !naming.single_letter_warnings.is_empty() {
        out.push(format!(
            "Use descriptive names instead of single letters: {}",
            list_names(&naming.single_letter_warnings)
        ));
    }
    if !naming.unclear_name_flags.is_empty() {
        out.push(format!(
            "Replace vague names with specific ones: {}",
            list_names(&naming.unclear_name_flags)
        ));
    }
    if !naming.long_name_flags.is_empty() {
        out.push(format!(
            "Shorten overly long names: {}",
            list_names(&naming.long_name_flags)
        ));
    }

    if matches!(rank, MaintainabilityRank::D | MaintainabilityRank::F) {
        out.push(format!(
            "Maintainability rank {} ({}): break this file into smaller, focused units",
            rank,
            rank.description()
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{DuplicationReport, NamingStats};
    use crate::models::Language;

    fn quiet_text() -> TextMetrics {
        TextMetrics {
            lines_of_code: 10,
            code_lines: 8,
            comment_lines: 2,
            comment_density: 20.0,
            ..TextMetrics::default()
        }
    }

    fn function(name: &str, cyclomatic: u32, cognitive: u32, length: usize) -> FunctionMetrics {
        FunctionMetrics {
            name: name.to_string(),
            start_line: 1,
            end_line: 10,
            length,
            cyclomatic_complexity: cyclomatic,
            cognitive_complexity: cognitive,
            max_nesting_depth: 1,
        }
    }

    #[test]
    fn test_clean_code_has_no_suggestions() {
        let thresholds = LanguageThresholds::defaults(Language::Python);
        let out = suggest(
            &ComplexityMetrics::default(),
            &[function("load", 2, 1, 8)],
            &quiet_text(),
            MaintainabilityRank::A,
            &thresholds,
        );
        assert!(out.is_empty(), "{out:?}");
    }

    #[test]
    fn test_rules_fire_in_order() {
        let thresholds = LanguageThresholds::defaults(Language::Python);
        let complexity = ComplexityMetrics {
            cyclomatic: 30,
            cognitive: 40,
            max_nesting: 5,
            avg_nesting: 2.0,
        };
        let text = TextMetrics {
            lines_of_code: 100,
            code_lines: 100,
            comment_density: 2.0,
            duplication: DuplicationReport {
                percentage: 35.0,
                blocks: Vec::new(),
            },
            naming: NamingStats {
                identifier_count: 3,
                single_letter_warnings: vec!["q".into()],
                unclear_name_flags: vec!["tmp".into()],
                long_name_flags: vec!["x".repeat(40)],
                ..NamingStats::default()
            },
            ..TextMetrics::default()
        };
        let out = suggest(
            &complexity,
            &[function("process", 25, 30, 90), function("tiny", 1, 0, 3)],
            &text,
            MaintainabilityRank::F,
            &thresholds,
        );

        let prefixes = [
            "Reduce branching in function `process`",
            "Simplify the control flow of function `process`",
            "Reduce nesting depth",
            "Split function `process`",
            "Add documentation",
            "Extract repeated blocks",
            "Use descriptive names instead of single letters: q",
            "Replace vague names with specific ones: tmp",
            "Shorten overly long names",
            "Maintainability rank F",
        ];
        assert_eq!(out.len(), prefixes.len(), "{out:?}");
        for (line, prefix) in out.iter().zip(prefixes) {
            assert!(line.starts_with(prefix), "{line} !~ {prefix}");
        }
    }

    #[test]
    fn test_file_level_branching_without_functions() {
        let thresholds = LanguageThresholds::defaults(Language::JavaScript);
        let complexity = ComplexityMetrics {
            cyclomatic: 9,
            cognitive: 3,
            max_nesting: 1,
            avg_nesting: 1.0,
        };
        let out = suggest(
            &complexity,
            &[],
            &quiet_text(),
            MaintainabilityRank::B,
            &thresholds,
        );
        assert_eq!(
            out,
            vec!["Reduce branching in this file (cyclomatic complexity 9 exceeds 8)".to_string()]
        );
    }

    #[test]
    fn test_long_name_lists_truncated() {
        let names: Vec<String> = ["a", "b", "c", "d", "e", "f", "g"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(list_names(&names), "a, b, c, d, e and 2 more");
    }
}
