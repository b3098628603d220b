//! Engine configuration
//!
//! Configuration is an explicit value handed to the service at construction.
//! It is read from (highest priority first):
//! 1. Environment variables (`CODEREADER_WORKERS`, `CODEREADER_TIMEOUT_MS`,
//!    `CODEREADER_MAX_SOURCE_BYTES`)
//! 2. An explicit file passed with `--config`
//! 3. `codereader.toml` or `.codereaderrc.json` in the working directory
//! 4. `~/.config/codereader/config.toml`
//!
//! Example `codereader.toml`:
//!
//! ```toml
//! workers = 4
//! file_timeout_ms = 3000
//! shingle_size = 5
//!
//! [languages.python]
//! max_complexity = 8
//! min_comment_density = 10.0
//! ```

use super::thresholds::{LanguageThresholds, ThresholdOverrides};
use crate::models::Language;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

pub const ENV_WORKERS: &str = "CODEREADER_WORKERS";
pub const ENV_TIMEOUT_MS: &str = "CODEREADER_TIMEOUT_MS";
pub const ENV_MAX_SOURCE_BYTES: &str = "CODEREADER_MAX_SOURCE_BYTES";

fn default_timeout_ms() -> u64 {
    5_000
}

fn default_max_source_bytes() -> usize {
    2 * 1024 * 1024
}

fn default_shingle_size() -> usize {
    4
}

fn default_min_shingle_alnum() -> usize {
    4
}

fn default_max_identifier_length() -> usize {
    30
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Batch worker threads (0 = one per CPU core)
    #[serde(default)]
    pub workers: usize,

    /// Time limit for one file's analysis
    #[serde(default = "default_timeout_ms")]
    pub file_timeout_ms: u64,

    /// Larger sources are rejected before parsing
    #[serde(default = "default_max_source_bytes")]
    pub max_source_bytes: usize,

    /// Lines per duplication shingle
    #[serde(default = "default_shingle_size")]
    pub shingle_size: usize,

    /// Shingles with fewer alphanumeric characters are ignored (runs of braces)
    #[serde(default = "default_min_shingle_alnum")]
    pub min_shingle_alnum: usize,

    /// Longer identifiers count as naming outliers
    #[serde(default = "default_max_identifier_length")]
    pub max_identifier_length: usize,

    /// Per-language threshold overrides
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub languages: BTreeMap<Language, ThresholdOverrides>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            file_timeout_ms: default_timeout_ms(),
            max_source_bytes: default_max_source_bytes(),
            shingle_size: default_shingle_size(),
            min_shingle_alnum: default_min_shingle_alnum(),
            max_identifier_length: default_max_identifier_length(),
            languages: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    /// Thresholds for a language with overrides applied
    pub fn thresholds_for(&self, language: Language) -> LanguageThresholds {
        let mut thresholds = LanguageThresholds::defaults(language);
        if let Some(overrides) = self.languages.get(&language) {
            thresholds.apply(language, overrides);
        }
        thresholds
    }

    /// Worker count with 0 resolved to the number of available cores
    pub fn effective_workers(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }

    /// `None` when the timeout is disabled (0)
    pub fn file_timeout(&self) -> Option<Duration> {
        (self.file_timeout_ms > 0).then(|| Duration::from_millis(self.file_timeout_ms))
    }

    /// Shingle size, never below 1
    pub fn effective_shingle_size(&self) -> usize {
        self.shingle_size.max(1)
    }

    /// Apply environment overrides using `lookup` to read variables
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_WORKERS) {
            match raw.trim().parse::<usize>() {
                Ok(n) => self.workers = n,
                Err(_) => warn!("Ignoring {}={:?}: not a number", ENV_WORKERS, raw),
            }
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => self.file_timeout_ms = ms,
                Err(_) => warn!("Ignoring {}={:?}: not a number", ENV_TIMEOUT_MS, raw),
            }
        }
        if let Some(raw) = lookup(ENV_MAX_SOURCE_BYTES) {
            match raw.trim().parse::<usize>() {
                Ok(bytes) => self.max_source_bytes = bytes,
                Err(_) => warn!(
                    "Ignoring {}={:?}: not a number",
                    ENV_MAX_SOURCE_BYTES, raw
                ),
            }
        }
    }

    /// Render as TOML (used by `codereader config`)
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    /// Path of the per-user config file
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("codereader").join("config.toml"))
    }
}

/// Load configuration from a specific file (TOML or JSON by extension)
pub fn load_config_file(path: &Path) -> Result<EngineConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
        || path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with("rc.json"));
    let config = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON config: {}", path.display()))?
    } else {
        toml::from_str(&content)
            .with_context(|| format!("Invalid TOML config: {}", path.display()))?
    };
    Ok(config)
}

/// Find and load configuration for `dir`, falling back to defaults.
///
/// Malformed files are logged and skipped. Environment overrides are applied last.
pub fn load_engine_config(dir: &Path) -> EngineConfig {
    let mut candidates = vec![dir.join("codereader.toml"), dir.join(".codereaderrc.json")];
    if let Some(user_path) = EngineConfig::user_config_path() {
        candidates.push(user_path);
    }

    let mut config = None;
    for path in candidates.iter().filter(|p| p.exists()) {
        match load_config_file(path) {
            Ok(loaded) => {
                debug!("Loaded config from {}", path.display());
                config = Some(loaded);
                break;
            }
            Err(e) => warn!("Failed to load {}: {:#}", path.display(), e),
        }
    }

    let mut config = config.unwrap_or_else(|| {
        debug!("No config file found, using defaults");
        EngineConfig::default()
    });
    config.apply_env(|key| std::env::var(key).ok());
    config
}
