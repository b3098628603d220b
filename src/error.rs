//! Error taxonomy for the analysis engine
//!
//! Every failure the pipeline can produce is an [`AnalysisError`]. Each variant
//! belongs to one [`ErrorKind`], which is what callers branch on: validation
//! failures are rejected before any parsing happens, parse and timeout failures
//! are reported per file, and internal failures are logged and surfaced without
//! detail.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message shown to callers in place of internal failure detail
pub const INTERNAL_ERROR_MESSAGE: &str = "internal error while analyzing code";

/// Errors produced by the analysis pipeline
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("source code must not be empty")]
    EmptySource,

    #[error("unsupported language '{language}' (supported: python, javascript, typescript, tsx, java, cpp)")]
    UnsupportedLanguage { language: String },

    #[error("source is {bytes} bytes, exceeding the {limit} byte limit")]
    SourceTooLarge { bytes: usize, limit: usize },

    #[error("source is not valid UTF-8 text")]
    InvalidEncoding,

    #[error("syntax error at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("analysis exceeded the {limit_ms} ms time limit")]
    Timeout { limit_ms: u64 },

    #[error("analysis was cancelled")]
    Cancelled,

    #[error("internal analysis failure: {0}")]
    Internal(String),
}

/// Coarse error category shared by the engine and its callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    UnsupportedLanguage,
    Parse,
    Timeout,
    Cancelled,
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::UnsupportedLanguage => write!(f, "unsupported_language"),
            ErrorKind::Parse => write!(f, "parse"),
            ErrorKind::Timeout => write!(f, "timeout"),
            ErrorKind::Cancelled => write!(f, "cancelled"),
            ErrorKind::Internal => write!(f, "internal"),
        }
    }
}

impl AnalysisError {
    pub fn unsupported_language(language: impl Into<String>) -> Self {
        AnalysisError::UnsupportedLanguage {
            language: language.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::EmptySource
            | AnalysisError::SourceTooLarge { .. }
            | AnalysisError::InvalidEncoding => ErrorKind::Validation,
            AnalysisError::UnsupportedLanguage { .. } => ErrorKind::UnsupportedLanguage,
            AnalysisError::Parse { .. } => ErrorKind::Parse,
            AnalysisError::Timeout { .. } => ErrorKind::Timeout,
            AnalysisError::Cancelled => ErrorKind::Cancelled,
            AnalysisError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Message safe to hand to an external caller.
    ///
    /// Internal failures collapse to a fixed message; everything else is
    /// already phrased in terms of the caller's input.
    pub fn public_message(&self) -> String {
        match self {
            AnalysisError::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Externally facing error shape of the service boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("unsupported language '{0}' (supported: python, javascript, typescript, tsx, java, cpp)")]
    UnsupportedLanguage(String),

    #[error("{0}")]
    Parse(String),

    #[error("{0}")]
    Timeout(String),

    #[error("request was cancelled")]
    Cancelled,

    #[error("{}", INTERNAL_ERROR_MESSAGE)]
    Internal,
}

/// Serialized error body: `{"error": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ServiceError {
    /// HTTP-style status code for transports that need one
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) | ServiceError::UnsupportedLanguage(_) => 400,
            ServiceError::Parse(_) => 422,
            ServiceError::Timeout(_) => 504,
            ServiceError::Cancelled => 499,
            ServiceError::Internal => 500,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Validation(_) => ErrorKind::Validation,
            ServiceError::UnsupportedLanguage(_) => ErrorKind::UnsupportedLanguage,
            ServiceError::Parse(_) => ErrorKind::Parse,
            ServiceError::Timeout(_) => ErrorKind::Timeout,
            ServiceError::Cancelled => ErrorKind::Cancelled,
            ServiceError::Internal => ErrorKind::Internal,
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self.to_string(),
        }
    }
}

impl From<AnalysisError> for ServiceError {
    /// Internal detail is dropped here; log it before converting.
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::UnsupportedLanguage { language } => {
                ServiceError::UnsupportedLanguage(language)
            }
            AnalysisError::EmptySource
            | AnalysisError::SourceTooLarge { .. }
            | AnalysisError::InvalidEncoding => ServiceError::Validation(err.to_string()),
            AnalysisError::Parse { .. } => ServiceError::Parse(err.to_string()),
            AnalysisError::Timeout { .. } => ServiceError::Timeout(err.to_string()),
            AnalysisError::Cancelled => ServiceError::Cancelled,
            AnalysisError::Internal(_) => ServiceError::Internal,
        }
    }
}
