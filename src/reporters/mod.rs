//! Output reporters for codereader results
//!
//! Supports two output formats:
//! - `text` - Terminal output, styled when stdout is a terminal
//! - `json` - Machine-readable JSON

mod json;
mod text;

use crate::models::{BatchResult, MetricRecord};
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown format '{}'. Valid formats: text, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Render a single-file record
pub fn render_record(record: &MetricRecord, label: &str, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(text::render_record(record, label)),
        OutputFormat::Json => json::render(record),
    }
}

/// Render a batch result
pub fn render_batch(batch: &BatchResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(text::render_batch(batch)),
        OutputFormat::Json => json::render(batch),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::models::{Language, SourceUnit};
    use crate::pipeline::{analyze_batch, analyze_source, BatchFile, Budget, CancelFlag};

    pub(crate) const SAMPLE: &str = r#"# Order helpers
def summarize(orders):
    total = 0
    if orders:
        for order in orders:
            total += order.amount
    return total
"#;

    pub(crate) fn test_record() -> MetricRecord {
        analyze_source(
            &SourceUnit::new(SAMPLE, Language::Python),
            &EngineConfig::default(),
            &Budget::unlimited(),
        )
        .unwrap()
    }

    pub(crate) fn test_batch() -> BatchResult {
        let files = vec![
            BatchFile::new("orders.py", SAMPLE),
            BatchFile::new("broken.py", "def broken(:\n"),
        ];
        analyze_batch(&files, &EngineConfig::default(), &CancelFlag::new(), None).unwrap()
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert!(OutputFormat::from_str("sarif").is_err());
        assert_eq!(OutputFormat::default().to_string(), "text");
    }

    #[test]
    fn test_dispatch() {
        let record = test_record();
        let json = render_record(&record, "orders.py", OutputFormat::Json).unwrap();
        assert!(json.trim_start().starts_with('{'));
        let text = render_record(&record, "orders.py", OutputFormat::Text).unwrap();
        assert!(text.contains("orders.py"));
    }
}
