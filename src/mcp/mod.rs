//! MCP (Model Context Protocol) Server
//!
//! Exposes the analysis service to MCP clients via JSON-RPC 2.0 over stdio.
//!
//! # Usage
//!
//! ```bash
//! codereader serve
//! ```
//!
//! # Client Configuration
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "codereader": {
//!       "command": "codereader",
//!       "args": ["serve"]
//!     }
//!   }
//! }
//! ```
//!
//! # Tools
//!
//! - `analyze_code` - Metrics for one source text
//! - `analyze_batch` - Metrics for several files, with aggregates
//! - `list_languages` - Supported languages and their thresholds

mod handlers;
mod server;
mod tools;

pub use server::{run_server, McpServer};
