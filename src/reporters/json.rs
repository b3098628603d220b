//! JSON reporter
//!
//! Pretty-printed JSON of the record or batch, for piping to jq or storing
//! alongside a project/file identifier and timestamp.

use anyhow::Result;
use serde::Serialize;

pub fn render<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::{test_batch, test_record};

    #[test]
    fn test_record_json() {
        let record = test_record();
        let json_str = render(&record).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert_eq!(parsed["language"], "python");
        assert_eq!(parsed["cyclomatic_complexity"], 3);
        // 84.x for the sample function
        assert_eq!(parsed["maintainability_rank"], "B");
        assert_eq!(
            parsed["maintainability_rank"],
            serde_json::to_value(record.maintainability_rank).expect("rank JSON")
        );
        assert!(parsed["sorted_name_lengths"].is_array());
    }

    #[test]
    fn test_batch_json_keeps_order() {
        let json_str = render(&test_batch()).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        let files = parsed["files"].as_array().expect("files array");
        assert_eq!(files[0]["filename"], "orders.py");
        assert_eq!(files[0]["status"], "ok");
        assert_eq!(files[1]["filename"], "broken.py");
        assert_eq!(files[1]["status"], "error");
        assert_eq!(parsed["analyzed_files"], 1);
    }
}
