//! Text (terminal) reporter with colors and formatting
//!
//! Styling goes through `console`, which drops the escape codes when stdout
//! is not a terminal.

use crate::models::{BatchResult, FileStatus, MaintainabilityRank, MetricRecord};
use console::{style, StyledObject};

const RULE: &str = "──────────────────────────────────────";
const MAX_LISTED_FUNCTIONS: usize = 10;

fn rank_style(rank: MaintainabilityRank) -> StyledObject<String> {
    let s = style(rank.to_string()).bold();
    match rank {
        MaintainabilityRank::A => s.green(),
        MaintainabilityRank::B => s.green().bright(),
        MaintainabilityRank::C => s.yellow(),
        MaintainabilityRank::D => s.red().bright(),
        MaintainabilityRank::F => s.red(),
    }
}

fn format_score(score: f64) -> StyledObject<String> {
    let s = style(format!("{:.1}", score));
    if score >= 80.0 {
        s.green()
    } else if score >= 60.0 {
        s.yellow()
    } else {
        s.red()
    }
}

fn heading(out: &mut String, title: &str) {
    out.push_str(&format!("{}\n", style(title).bold()));
}

/// Render one record as formatted terminal output
pub fn render_record(record: &MetricRecord, label: &str) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "\n{} {} {}\n",
        style("codereader").bold(),
        label,
        style(format!("({})", record.language.display_name())).dim()
    ));
    out.push_str(&format!("{}\n", style(RULE).dim()));
    out.push_str(&format!(
        "Readability: {}/100  Maintainability: {:.2} {} {}\n",
        format_score(record.readability_score),
        record.maintainability_index,
        rank_style(record.maintainability_rank),
        style(format!("({})", record.maintainability_rank.description())).dim()
    ));
    out.push_str(&format!(
        "Lines: {}  Code: {}  Comments: {}  Blank: {}\n\n",
        record.total_lines, record.code_lines, record.comment_lines, record.blank_lines
    ));

    heading(&mut out, "COMPLEXITY");
    out.push_str(&format!(
        "  Cyclomatic: {}  Cognitive: {}  Max nesting: {}  Avg nesting: {:.2}\n",
        record.cyclomatic_complexity,
        record.cognitive_complexity,
        record.max_nesting_depth,
        record.avg_nesting_depth
    ));
    out.push_str(&format!(
        "  Functions: {}  Classes: {}  Avg function length: {:.1}  Longest: {}\n",
        record.function_count,
        record.class_count,
        record.avg_function_length,
        record.max_function_length
    ));
    out.push_str(&format!(
        "  Halstead volume: {:.2}  Vocabulary: {}  Length: {}\n\n",
        record.halstead.volume, record.halstead.vocabulary, record.halstead.length
    ));

    heading(&mut out, "TEXT");
    out.push_str(&format!(
        "  Comment density: {:.1}%  Duplication: {:.1}%",
        record.comment_density, record.duplication_percentage
    ));
    if !record.duplicated_blocks.is_empty() {
        out.push_str(&format!(
            "  {}",
            style(format!("({} repeated blocks)", record.duplicated_blocks.len())).dim()
        ));
    }
    out.push('\n');
    out.push_str(&format!(
        "  Identifiers: {}  Avg name length: {:.1}\n\n",
        record.sorted_name_lengths.len(),
        record.avg_name_length
    ));

    if !record.functions.is_empty() {
        heading(&mut out, "FUNCTIONS");
        out.push_str(&format!(
            "{}\n",
            style("  NAME                            LINES       CC  COG  NEST  LEN").dim()
        ));
        for f in record.functions.iter().take(MAX_LISTED_FUNCTIONS) {
            let name: String = f.name.chars().take(30).collect();
            out.push_str(&format!(
                "  {:<30}  {:>5}-{:<5} {:>3} {:>4} {:>5} {:>4}\n",
                name,
                f.start_line,
                f.end_line,
                f.cyclomatic_complexity,
                f.cognitive_complexity,
                f.max_nesting_depth,
                f.length
            ));
        }
        let remaining = record.functions.len().saturating_sub(MAX_LISTED_FUNCTIONS);
        if remaining > 0 {
            out.push_str(&format!(
                "  {}\n",
                style(format!("...and {} more (use --format json)", remaining)).dim()
            ));
        }
        out.push('\n');
    }

    if record.suggestions.is_empty() {
        out.push_str(&format!("{}\n", style("No suggestions. Looks good.").dim()));
    } else {
        heading(&mut out, "SUGGESTIONS");
        for (i, suggestion) in record.suggestions.iter().enumerate() {
            out.push_str(&format!("  {:>2}. {}\n", i + 1, suggestion));
        }
    }

    out
}

/// Render a batch summary with one line per file
pub fn render_batch(batch: &BatchResult) -> String {
    let mut out = String::new();

    out.push_str(&format!("\n{}\n", style("codereader batch").bold()));
    out.push_str(&format!("{}\n", style(RULE).dim()));
    out.push_str(&format!(
        "Files: {}  Analyzed: {}  Failed: {}  Lines of code: {}\n\n",
        batch.total_files, batch.analyzed_files, batch.failed_files, batch.total_lines
    ));

    if batch.analyzed_files > 0 {
        let avg = &batch.averages;
        heading(&mut out, "AVERAGES");
        out.push_str(&format!(
            "  Readability: {}  Maintainability: {:.2}  Cyclomatic: {:.2}  Cognitive: {:.2}\n",
            format_score(avg.readability_score),
            avg.maintainability_index,
            avg.cyclomatic_complexity,
            avg.cognitive_complexity
        ));
        out.push_str(&format!(
            "  Comment density: {:.1}%  Duplication: {:.1}%  Max nesting: {:.2}\n\n",
            avg.comment_density, avg.duplication_percentage, avg.max_nesting_depth
        ));

        let max = &batch.maxima;
        heading(&mut out, "MAXIMA");
        out.push_str(&format!(
            "  Cyclomatic: {}  Cognitive: {}  Nesting: {}  Duplication: {:.1}%\n\n",
            max.cyclomatic_complexity,
            max.cognitive_complexity,
            max.max_nesting_depth,
            max.duplication_percentage
        ));
    }

    if !batch.files.is_empty() {
        heading(&mut out, "FILES");
        for file in &batch.files {
            match &file.status {
                FileStatus::Ok { metrics } => out.push_str(&format!(
                    "  {} {:<40} readability {}  cc {:>3}  rank {}\n",
                    style("ok").green(),
                    file.filename,
                    format_score(metrics.readability_score),
                    metrics.cyclomatic_complexity,
                    rank_style(metrics.maintainability_rank)
                )),
                FileStatus::Error { kind, error } => out.push_str(&format!(
                    "  {} {:<40} {}\n",
                    style("!!").red(),
                    file.filename,
                    style(format!("{}: {}", kind, error)).dim()
                )),
            }
        }
    }

    out
}
