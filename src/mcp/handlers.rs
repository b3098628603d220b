//! MCP Tool handlers
//!
//! Each handler unpacks its JSON arguments, calls the [`AnalysisService`]
//! and returns the result as JSON. Service failures are returned as
//! [`ServiceError`]s inside the `anyhow::Error` so the server can report
//! their kind.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::EngineConfig;
use crate::models::Language;
use crate::service::{AnalysisService, AnalyzeRequest, BatchRequest, UploadedFile};

/// State shared across tool calls
pub struct HandlerState {
    pub service: AnalysisService,
}

impl HandlerState {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            service: AnalysisService::new(config),
        }
    }
}

pub fn handle_analyze_code(state: &HandlerState, args: &Value) -> Result<Value> {
    let code = args
        .get("code")
        .and_then(|v| v.as_str())
        .context("Missing required argument: code")?;
    let language = args
        .get("language")
        .and_then(|v| v.as_str())
        .context("Missing required argument: language")?;

    let record = state.service.analyze(&AnalyzeRequest {
        code: code.to_string(),
        language: language.to_string(),
    })?;
    Ok(serde_json::to_value(record)?)
}

#[derive(Debug, Deserialize)]
struct BatchArgs {
    #[serde(default)]
    language: Option<String>,
    files: Vec<BatchFileArg>,
}

#[derive(Debug, Deserialize)]
struct BatchFileArg {
    filename: String,
    content: String,
}

pub fn handle_analyze_batch(state: &HandlerState, args: &Value) -> Result<Value> {
    let args: BatchArgs =
        serde_json::from_value(args.clone()).context("Invalid arguments for analyze_batch")?;

    let request = BatchRequest {
        language: args.language,
        files: args
            .files
            .into_iter()
            .map(|f| UploadedFile {
                filename: f.filename,
                content: f.content.into_bytes(),
            })
            .collect(),
    };

    let result = state.service.analyze_batch(&request)?;
    Ok(serde_json::to_value(result)?)
}

pub fn handle_list_languages(state: &HandlerState, _args: &Value) -> Result<Value> {
    let languages: Vec<Value> = Language::ALL
        .iter()
        .map(|&lang| {
            json!({
                "language": lang.as_str(),
                "name": lang.display_name(),
                "extensions": lang.extensions(),
                "thresholds": state.service.config().thresholds_for(lang),
            })
        })
        .collect();

    Ok(json!({ "languages": languages }))
}
