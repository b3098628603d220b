//! codereader - Code quality analysis engine
//!
//! Parses Python, JavaScript, TypeScript, Java and C++ sources with
//! tree-sitter and derives complexity, maintainability, duplication,
//! naming and readability metrics.
//!
//! ```no_run
//! use codereader::config::EngineConfig;
//! use codereader::service::{AnalysisService, AnalyzeRequest};
//!
//! let service = AnalysisService::new(EngineConfig::default());
//! let record = service.analyze(&AnalyzeRequest {
//!     code: "def add(a, b):\n    return a + b\n".into(),
//!     language: "python".into(),
//! })?;
//! println!("readability {}", record.readability_score);
//! # Ok::<(), codereader::error::ServiceError>(())
//! ```

pub mod config;
pub mod error;
pub mod mcp;
pub mod metrics;
pub mod models;
pub mod parsers;
pub mod pipeline;
pub mod reporters;
pub mod scoring;
pub mod service;
