//! Shingle-based duplicate detection
//!
//! Code lines (comments stripped, whitespace collapsed) are grouped into
//! sliding windows of `shingle_size` lines and hashed with xxh3. Every line
//! covered by a window whose hash occurs more than once counts as duplicated.
//! Reformatted or renamed copies are not found.

use super::lexical::LineProfile;
use crate::models::DuplicatedBlock;
use rustc_hash::FxHashMap;
use xxhash_rust::xxh3::xxh3_64;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DuplicationReport {
    /// Duplicated code lines / code lines x 100
    pub percentage: f64,
    pub blocks: Vec<DuplicatedBlock>,
}

pub fn detect_duplication(
    lines: &LineProfile,
    shingle_size: usize,
    min_alnum: usize,
) -> DuplicationReport {
    let code: Vec<(u32, &str)> = lines
        .lines()
        .iter()
        .enumerate()
        .filter(|(_, l)| l.has_code)
        .map(|(idx, l)| (idx as u32 + 1, l.code.as_str()))
        .collect();

    let k = shingle_size.max(1);
    if code.len() < k {
        return DuplicationReport::default();
    }

    // window start -> positions sharing its hash, in source order
    let mut windows: FxHashMap<u64, Vec<usize>> = FxHashMap::default();
    let mut text = String::new();
    for start in 0..=code.len() - k {
        text.clear();
        for (_, line) in &code[start..start + k] {
            text.push_str(line);
            text.push('\n');
        }
        // Runs of closing braces and the like are not meaningful duplicates
        if text.chars().filter(|c| c.is_alphanumeric()).count() < min_alnum {
            continue;
        }
        windows.entry(xxh3_64(text.as_bytes())).or_default().push(start);
    }

    let mut covered = vec![false; code.len()];
    // (repeat start, first occurrence start)
    let mut repeats: Vec<(usize, usize)> = Vec::new();
    for positions in windows.values().filter(|p| p.len() > 1) {
        for &start in positions {
            covered[start..start + k].iter_mut().for_each(|c| *c = true);
        }
        repeats.extend(positions[1..].iter().map(|&start| (start, positions[0])));
    }
    repeats.sort_unstable();

    // Overlapping repeats merge into one block
    let mut blocks: Vec<DuplicatedBlock> = Vec::new();
    let mut block_start = 0usize;
    let mut block_end = 0usize;
    for (start, first) in repeats {
        match blocks.last_mut() {
            Some(last) if start < block_end => {
                block_end = block_end.max(start + k);
                last.lines = (block_end - block_start) as u32;
            }
            _ => {
                block_start = start;
                block_end = start + k;
                blocks.push(DuplicatedBlock {
                    line: code[start].0,
                    duplicate_of: code[first].0,
                    lines: k as u32,
                });
            }
        }
    }

    let duplicated = covered.iter().filter(|c| **c).count();
    let percentage = (duplicated as f64 / code.len() as f64 * 100.0).min(100.0);

    DuplicationReport {
        percentage: super::round_to(percentage, 2),
        blocks,
    }
}
