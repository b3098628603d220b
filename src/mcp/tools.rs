//! MCP Tool definitions
//!
//! Defines the available tools and their JSON schemas for the MCP protocol.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Tool definition for MCP
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub name: String,
    pub description: String,
    pub input_schema: ToolSchema,
}

/// JSON Schema for tool input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

impl ToolSchema {
    pub fn object() -> Self {
        Self {
            schema_type: "object".to_string(),
            properties: Some(BTreeMap::new()),
            required: None,
        }
    }

    pub fn with_property(mut self, name: &str, schema: Value) -> Self {
        if let Some(ref mut props) = self.properties {
            props.insert(name.to_string(), schema);
        }
        self
    }

    pub fn with_required(mut self, fields: Vec<&str>) -> Self {
        self.required = Some(fields.into_iter().map(String::from).collect());
        self
    }
}

fn language_property(description: &str) -> Value {
    json!({
        "type": "string",
        "description": description,
        "enum": ["python", "javascript", "typescript", "tsx", "java", "cpp"]
    })
}

/// Every tool the server exposes
pub fn available_tools() -> Vec<Tool> {
    vec![
        Tool {
            name: "analyze_code".to_string(),
            description: "Analyze one source file. Returns readability score, cyclomatic and cognitive complexity, maintainability index and rank, comment density, duplication, naming statistics and suggestions.".to_string(),
            input_schema: ToolSchema::object()
                .with_property("code", json!({
                    "type": "string",
                    "description": "Source code to analyze"
                }))
                .with_property("language", language_property("Language of the code (case-insensitive; aliases such as py, js, ts, c++ are accepted)"))
                .with_required(vec!["code", "language"]),
        },
        Tool {
            name: "analyze_batch".to_string(),
            description: "Analyze several files at once. Files that fail are reported individually; averages cover the files that succeeded.".to_string(),
            input_schema: ToolSchema::object()
                .with_property("language", language_property("Language for every file (default: inferred from each filename's extension)"))
                .with_property("files", json!({
                    "type": "array",
                    "description": "Files to analyze, in the order results should be returned",
                    "items": {
                        "type": "object",
                        "properties": {
                            "filename": { "type": "string" },
                            "content": { "type": "string" }
                        },
                        "required": ["filename", "content"]
                    }
                }))
                .with_required(vec!["files"]),
        },
        Tool {
            name: "list_languages".to_string(),
            description: "List supported languages with their file extensions and quality thresholds.".to_string(),
            input_schema: ToolSchema::object(),
        },
    ]
}
