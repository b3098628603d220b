//! MCP server command handler

use anyhow::Result;
use codereader::config::EngineConfig;

/// Run the MCP server
pub fn run(config: EngineConfig) -> Result<()> {
    codereader::mcp::run_server(config)
}
