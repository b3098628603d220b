//! Configuration module for codereader
//!
//! This module handles:
//! - Engine settings (workers, timeouts, size limits, duplication shingles)
//! - Per-language thresholds and readability weights
//! - Loading from `codereader.toml`, `.codereaderrc.json` and the environment

mod engine_config;
mod thresholds;

pub use engine_config::{
    load_config_file, load_engine_config, EngineConfig, ENV_MAX_SOURCE_BYTES, ENV_TIMEOUT_MS,
    ENV_WORKERS,
};
pub use thresholds::{LanguageThresholds, ReadabilityWeights, ThresholdOverrides};
