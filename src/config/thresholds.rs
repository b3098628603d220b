//! Per-language thresholds and readability weights
//!
//! Each language has different conventions, so function length, complexity
//! and documentation limits differ. Weights describe how the readability
//! score blends its sub-scores and always sum to 1.

use crate::models::Language;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Weights of the readability sub-scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadabilityWeights {
    pub maintainability: f64,
    pub complexity: f64,
    pub cognitive: f64,
    pub nesting: f64,
    pub naming: f64,
    pub comments: f64,
    pub duplication: f64,
}

impl ReadabilityWeights {
    const TOLERANCE: f64 = 1e-6;

    pub fn sum(&self) -> f64 {
        self.maintainability
            + self.complexity
            + self.cognitive
            + self.nesting
            + self.naming
            + self.comments
            + self.duplication
    }

    fn has_negative(&self) -> bool {
        [
            self.maintainability,
            self.complexity,
            self.cognitive,
            self.nesting,
            self.naming,
            self.comments,
            self.duplication,
        ]
        .iter()
        .any(|w| *w < 0.0 || !w.is_finite())
    }

    /// Rescale so the weights sum to 1.
    ///
    /// Returns `None` for weights that cannot be normalized (negative,
    /// non-finite, or all zero).
    pub fn normalized(&self) -> Option<Self> {
        let sum = self.sum();
        if self.has_negative() || sum <= 0.0 {
            return None;
        }
        if (sum - 1.0).abs() < Self::TOLERANCE {
            return Some(*self);
        }
        Some(Self {
            maintainability: self.maintainability / sum,
            complexity: self.complexity / sum,
            cognitive: self.cognitive / sum,
            nesting: self.nesting / sum,
            naming: self.naming / sum,
            comments: self.comments / sum,
            duplication: self.duplication / sum,
        })
    }
}

/// Limits used by scoring and suggestion rules for one language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageThresholds {
    pub max_function_length: usize,
    pub max_complexity: u32,
    pub max_cognitive_complexity: u32,
    /// Percentage
    pub min_comment_density: f64,
    pub ideal_avg_name_length: f64,
    pub max_nesting_depth: u32,
    /// Percentage
    pub max_duplication: f64,
    pub weights: ReadabilityWeights,
}

impl LanguageThresholds {
    pub fn defaults(language: Language) -> Self {
        match language {
            Language::Python => Self {
                max_function_length: 40,
                max_complexity: 10,
                max_cognitive_complexity: 15,
                min_comment_density: 15.0,
                ideal_avg_name_length: 12.0,
                max_nesting_depth: 3,
                max_duplication: 10.0,
                weights: ReadabilityWeights {
                    maintainability: 0.25,
                    complexity: 0.15,
                    cognitive: 0.15,
                    nesting: 0.15,
                    naming: 0.10,
                    comments: 0.10,
                    duplication: 0.10,
                },
            },
            // Smaller, more modular functions; comments weigh less
            Language::JavaScript => Self {
                max_function_length: 30,
                max_complexity: 8,
                max_cognitive_complexity: 12,
                min_comment_density: 10.0,
                ideal_avg_name_length: 8.0,
                max_nesting_depth: 3,
                max_duplication: 10.0,
                weights: ReadabilityWeights {
                    maintainability: 0.25,
                    complexity: 0.20,
                    cognitive: 0.15,
                    nesting: 0.15,
                    naming: 0.10,
                    comments: 0.05,
                    duplication: 0.10,
                },
            },
            // Types carry part of the documentation
            Language::TypeScript | Language::Tsx => Self {
                max_function_length: 35,
                max_complexity: 8,
                max_cognitive_complexity: 12,
                min_comment_density: 8.0,
                ideal_avg_name_length: 10.0,
                max_nesting_depth: 3,
                max_duplication: 10.0,
                weights: ReadabilityWeights {
                    maintainability: 0.25,
                    complexity: 0.20,
                    cognitive: 0.15,
                    nesting: 0.15,
                    naming: 0.10,
                    comments: 0.05,
                    duplication: 0.10,
                },
            },
            Language::Java => Self {
                max_function_length: 50,
                max_complexity: 12,
                max_cognitive_complexity: 18,
                min_comment_density: 20.0,
                ideal_avg_name_length: 15.0,
                max_nesting_depth: 4,
                max_duplication: 10.0,
                weights: ReadabilityWeights {
                    maintainability: 0.25,
                    complexity: 0.15,
                    cognitive: 0.15,
                    nesting: 0.10,
                    naming: 0.10,
                    comments: 0.15,
                    duplication: 0.10,
                },
            },
            Language::Cpp => Self {
                max_function_length: 50,
                max_complexity: 10,
                max_cognitive_complexity: 15,
                min_comment_density: 12.0,
                ideal_avg_name_length: 10.0,
                max_nesting_depth: 4,
                max_duplication: 10.0,
                weights: ReadabilityWeights {
                    maintainability: 0.25,
                    complexity: 0.15,
                    cognitive: 0.15,
                    nesting: 0.15,
                    naming: 0.10,
                    comments: 0.10,
                    duplication: 0.10,
                },
            },
        }
    }

    /// Apply user overrides on top of these thresholds
    pub fn apply(&mut self, language: Language, overrides: &ThresholdOverrides) {
        if let Some(v) = overrides.max_function_length {
            self.max_function_length = v;
        }
        if let Some(v) = overrides.max_complexity {
            self.max_complexity = v;
        }
        if let Some(v) = overrides.max_cognitive_complexity {
            self.max_cognitive_complexity = v;
        }
        if let Some(v) = overrides.min_comment_density {
            self.min_comment_density = v.clamp(0.0, 100.0);
        }
        if let Some(v) = overrides.ideal_avg_name_length {
            self.ideal_avg_name_length = v;
        }
        if let Some(v) = overrides.max_nesting_depth {
            self.max_nesting_depth = v;
        }
        if let Some(v) = overrides.max_duplication {
            self.max_duplication = v.clamp(0.0, 100.0);
        }
        if let Some(weights) = overrides.weights {
            match weights.normalized() {
                Some(w) => self.weights = w,
                None => warn!(
                    "Ignoring invalid readability weights for {} (sum {:.3})",
                    language,
                    weights.sum()
                ),
            }
        }
    }
}

/// Partial thresholds read from configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdOverrides {
    pub max_function_length: Option<usize>,
    pub max_complexity: Option<u32>,
    pub max_cognitive_complexity: Option<u32>,
    pub min_comment_density: Option<f64>,
    pub ideal_avg_name_length: Option<f64>,
    pub max_nesting_depth: Option<u32>,
    pub max_duplication: Option<f64>,
    pub weights: Option<ReadabilityWeights>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        for lang in Language::ALL {
            let t = LanguageThresholds::defaults(lang);
            assert!(
                (t.weights.sum() - 1.0).abs() < 1e-9,
                "{} weights sum to {}",
                lang,
                t.weights.sum()
            );
        }
    }

    #[test]
    fn test_overrides_apply() {
        let mut t = LanguageThresholds::defaults(Language::Python);
        let overrides = ThresholdOverrides {
            max_complexity: Some(5),
            min_comment_density: Some(150.0),
            ..Default::default()
        };
        t.apply(Language::Python, &overrides);
        assert_eq!(t.max_complexity, 5);
        assert_eq!(t.min_comment_density, 100.0);
        assert_eq!(t.max_function_length, 40);
    }

    #[test]
    fn test_weights_normalized() {
        let w = ReadabilityWeights {
            maintainability: 2.0,
            complexity: 1.0,
            cognitive: 1.0,
            nesting: 1.0,
            naming: 1.0,
            comments: 1.0,
            duplication: 1.0,
        };
        let n = w.normalized().unwrap();
        assert!((n.sum() - 1.0).abs() < 1e-9);
        assert!((n.maintainability - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let mut t = LanguageThresholds::defaults(Language::Java);
        let before = t.weights;
        let overrides = ThresholdOverrides {
            weights: Some(ReadabilityWeights {
                maintainability: -1.0,
                complexity: 1.0,
                cognitive: 0.0,
                nesting: 0.0,
                naming: 0.0,
                comments: 0.0,
                duplication: 0.0,
            }),
            ..Default::default()
        };
        t.apply(Language::Java, &overrides);
        assert_eq!(t.weights, before);
    }
}
