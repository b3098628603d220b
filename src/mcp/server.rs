//! MCP JSON-RPC Server over stdio
//!
//! Implements the Model Context Protocol using JSON-RPC 2.0 over stdin/stdout.
//! stdout carries only protocol messages; logs go to stderr.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Write};
use tracing::{debug, error, info};

use super::handlers::{self, HandlerState};
use super::tools::available_tools;
use crate::config::EngineConfig;
use crate::error::ServiceError;

const METHOD_NOT_FOUND: i64 = -32601;
const INTERNAL_ERROR: i64 = -32603;

/// MCP Server implementation
pub struct McpServer {
    state: HandlerState,
}

impl McpServer {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            state: HandlerState::new(config),
        }
    }

    /// Run the server, reading JSON-RPC messages from stdin until EOF
    pub fn run(&mut self) -> Result<()> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        self.serve(BufReader::new(stdin.lock()), stdout.lock())
    }

    /// Serve one message per line from `reader`, writing responses to `writer`
    pub fn serve<R: BufRead, W: Write>(&mut self, reader: R, mut writer: W) -> Result<()> {
        info!("codereader MCP server started");

        for line in reader.lines() {
            let line = line.context("Failed to read from stdin")?;
            if line.trim().is_empty() {
                continue;
            }

            debug!("Received: {}", line);

            match self.handle_message(&line) {
                Ok(Some(response)) => {
                    let response_str = serde_json::to_string(&response)?;
                    debug!("Sending: {}", response_str);
                    writeln!(writer, "{}", response_str)?;
                    writer.flush()?;
                }
                Ok(None) => {
                    // Notification, no response needed
                }
                Err(e) => {
                    error!("Error handling message: {}", e);
                    let error_response = json!({
                        "jsonrpc": "2.0",
                        "id": null,
                        "error": {
                            "code": INTERNAL_ERROR,
                            "message": e.to_string()
                        }
                    });
                    writeln!(writer, "{}", serde_json::to_string(&error_response)?)?;
                    writer.flush()?;
                }
            }
        }

        info!("stdin closed, shutting down");
        Ok(())
    }

    fn handle_message(&mut self, message: &str) -> Result<Option<Value>> {
        let request: JsonRpcRequest =
            serde_json::from_str(message).context("Invalid JSON-RPC request")?;

        let result = match request.method.as_str() {
            "initialize" => self.handle_initialize(&request.params),
            "initialized" | "notifications/initialized" => return Ok(None),
            "ping" => Ok(json!({})),
            "tools/list" => self.handle_list_tools(&request.params),
            "tools/call" => self.handle_call_tool(&request.params),
            "shutdown" => {
                info!("Shutdown requested");
                Ok(json!(null))
            }
            _ => {
                return Ok(Some(json!({
                    "jsonrpc": "2.0",
                    "id": request.id,
                    "error": {
                        "code": METHOD_NOT_FOUND,
                        "message": format!("Unknown method: {}", request.method)
                    }
                })));
            }
        };

        match result {
            Ok(value) => Ok(Some(json!({
                "jsonrpc": "2.0",
                "id": request.id,
                "result": value
            }))),
            Err(e) => Ok(Some(json!({
                "jsonrpc": "2.0",
                "id": request.id,
                "error": {
                    "code": INTERNAL_ERROR,
                    "message": e.to_string()
                }
            }))),
        }
    }

    fn handle_initialize(&self, _params: &Option<Value>) -> Result<Value> {
        Ok(json!({
            "protocolVersion": "2024-11-05",
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": "codereader",
                "version": env!("CARGO_PKG_VERSION")
            }
        }))
    }

    fn handle_list_tools(&self, _params: &Option<Value>) -> Result<Value> {
        Ok(json!({
            "tools": available_tools()
        }))
    }

    fn handle_call_tool(&mut self, params: &Option<Value>) -> Result<Value> {
        let params = params.as_ref().context("Missing params for tools/call")?;

        let name = params
            .get("name")
            .and_then(|v| v.as_str())
            .context("Missing tool name")?;

        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));

        debug!("Calling tool: {}", name);

        let result = match name {
            "analyze_code" => handlers::handle_analyze_code(&self.state, &arguments),
            "analyze_batch" => handlers::handle_analyze_batch(&self.state, &arguments),
            "list_languages" => handlers::handle_list_languages(&self.state, &arguments),
            _ => return Err(anyhow::anyhow!("Unknown tool: {}", name)),
        };

        match result {
            Ok(value) => Ok(json!({
                "content": [{
                    "type": "text",
                    "text": serde_json::to_string_pretty(&value)?
                }]
            })),
            Err(e) => {
                let body = match e.downcast_ref::<ServiceError>() {
                    Some(service) => json!({
                        "error": service.to_string(),
                        "kind": service.kind(),
                        "status": service.status_code()
                    }),
                    None => json!({ "error": e.to_string() }),
                };
                Ok(json!({
                    "content": [{
                        "type": "text",
                        "text": body.to_string()
                    }],
                    "isError": true
                }))
            }
        }
    }
}

/// JSON-RPC 2.0 Request
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    #[serde(default)]
    #[allow(dead_code)]
    jsonrpc: Option<String>,
    #[serde(default)]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Option<Value>,
}

/// Run the MCP server on stdin/stdout
pub fn run_server(config: EngineConfig) -> Result<()> {
    let mut server = McpServer::new(config);
    server.run()
}
