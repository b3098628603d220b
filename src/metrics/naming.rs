//! Identifier statistics

use crate::models::Identifier;
use std::collections::BTreeSet;

/// Single-letter names that are conventional (loop counters and coordinates)
pub const CONVENTIONAL_SHORT_NAMES: &[&str] = &["i", "j", "k", "x", "y", "z"];

/// Names that say nothing about what they hold
pub const VAGUE_NAMES: &[&str] = &["temp", "tmp", "data", "val", "value", "info", "item"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamingStats {
    pub identifier_count: usize,
    pub avg_name_length: f64,
    /// Ascending, one entry per identifier
    pub sorted_name_lengths: Vec<usize>,
    pub single_letter_warnings: Vec<String>,
    pub unclear_name_flags: Vec<String>,
    pub long_name_flags: Vec<String>,
}

impl NamingStats {
    /// Identifiers that are unconventionally short or excessively long
    pub fn outlier_count(&self) -> usize {
        self.single_letter_warnings.len() + self.long_name_flags.len()
    }

    /// Fraction of identifiers that are outliers; 0 with no identifiers
    pub fn outlier_ratio(&self) -> f64 {
        if self.identifier_count == 0 {
            0.0
        } else {
            (self.outlier_count() as f64 / self.identifier_count as f64).min(1.0)
        }
    }

    /// How close the mean name length is to `ideal`: 1 at the ideal, falling
    /// linearly to 0.5 at a deviation of `ideal` or more. 1 with no identifiers.
    pub fn length_fit(&self, ideal: f64) -> f64 {
        if self.identifier_count == 0 || ideal <= 0.0 {
            return 1.0;
        }
        let deviation = ((self.avg_name_length - ideal).abs() / ideal).min(1.0);
        1.0 - 0.5 * deviation
    }
}

/// `identifiers` holds each distinct declared name once
pub fn naming_stats(identifiers: &[Identifier], max_identifier_length: usize) -> NamingStats {
    let mut sorted_name_lengths: Vec<usize> = identifiers.iter().map(Identifier::len).collect();
    sorted_name_lengths.sort_unstable();

    let avg_name_length = if sorted_name_lengths.is_empty() {
        0.0
    } else {
        let total: usize = sorted_name_lengths.iter().sum();
        super::round_to(total as f64 / sorted_name_lengths.len() as f64, 2)
    };

    let mut single = BTreeSet::new();
    let mut vague = BTreeSet::new();
    let mut long = BTreeSet::new();
    for ident in identifiers {
        let name = ident.name.as_str();
        let len = ident.len();
        if len == 1 && !CONVENTIONAL_SHORT_NAMES.contains(&name) {
            single.insert(name.to_string());
        }
        if VAGUE_NAMES.contains(&name.to_lowercase().as_str()) {
            vague.insert(name.to_string());
        }
        if len > max_identifier_length {
            long.insert(name.to_string());
        }
    }

    NamingStats {
        identifier_count: identifiers.len(),
        avg_name_length,
        sorted_name_lengths,
        single_letter_warnings: single.into_iter().collect(),
        unclear_name_flags: vague.into_iter().collect(),
        long_name_flags: long.into_iter().collect(),
    }
}
