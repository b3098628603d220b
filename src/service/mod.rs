//! Service Boundary
//!
//! Validates requests, resolves the language tag, runs the pipeline and maps
//! every failure onto [`ServiceError`]. Configuration is injected at
//! construction; the service itself holds no per-request state, so it is
//! cheap to clone into worker tasks.

use crate::config::EngineConfig;
use crate::error::{AnalysisError, ServiceError};
use crate::models::{BatchResult, Language, MetricRecord, SourceUnit};
use crate::pipeline::{analyze_batch, analyze_source, BatchFile, Budget, CancelFlag};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

/// Single-file request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub code: String,
    pub language: String,
}

/// One file of a batch upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub filename: String,
    pub content: Vec<u8>,
}

/// Batch request. Files without a language use their extension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub language: Option<String>,
    pub files: Vec<UploadedFile>,
}

#[derive(Debug, Clone)]
pub struct AnalysisService {
    config: Arc<EngineConfig>,
}

/// Log internal detail, then convert to the external shape
fn to_service_error(err: AnalysisError, context: &str) -> ServiceError {
    if let AnalysisError::Internal(detail) = &err {
        error!("Internal error while analyzing {}: {}", context, detail);
    }
    ServiceError::from(err)
}

fn parse_language(tag: &str) -> Result<Language, ServiceError> {
    if tag.trim().is_empty() {
        return Err(ServiceError::Validation("language must not be empty".into()));
    }
    tag.parse::<Language>()
        .map_err(|_| ServiceError::UnsupportedLanguage(tag.trim().to_string()))
}

impl AnalysisService {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze one source text
    pub fn analyze(&self, request: &AnalyzeRequest) -> Result<MetricRecord, ServiceError> {
        if request.code.trim().is_empty() {
            return Err(ServiceError::Validation("code must not be empty".into()));
        }
        let language = parse_language(&request.language)?;

        let budget = Budget::start(self.config.file_timeout(), CancelFlag::new());
        let unit = SourceUnit::new(&request.code, language);
        analyze_source(&unit, &self.config, &budget).map_err(|e| to_service_error(e, "request"))
    }

    /// Analyze a batch; per-file failures are entries in the result
    pub fn analyze_batch(&self, request: &BatchRequest) -> Result<BatchResult, ServiceError> {
        self.analyze_batch_with(request, &CancelFlag::new(), None)
    }

    /// [`analyze_batch`](Self::analyze_batch) with cancellation and progress reporting
    pub fn analyze_batch_with(
        &self,
        request: &BatchRequest,
        cancel: &CancelFlag,
        progress: Option<&(dyn Fn(usize, usize) + Sync)>,
    ) -> Result<BatchResult, ServiceError> {
        if request.files.is_empty() {
            return Err(ServiceError::Validation("no files provided".into()));
        }
        let language = request
            .language
            .as_deref()
            .filter(|tag| !tag.trim().is_empty())
            .map(parse_language)
            .transpose()?;

        let files: Vec<BatchFile> = request
            .files
            .iter()
            .map(|f| BatchFile {
                filename: f.filename.clone(),
                language,
                content: f.content.clone(),
            })
            .collect();

        let result = analyze_batch(&files, &self.config, cancel, progress)
            .map_err(|e| to_service_error(e, "batch"))?;
        info!(
            "Batch done: {} analyzed, {} failed",
            result.analyzed_files, result.failed_files
        );
        Ok(result)
    }

    /// Run [`analyze`](Self::analyze) on the blocking pool
    pub async fn analyze_async(&self, request: AnalyzeRequest) -> Result<MetricRecord, ServiceError> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.analyze(&request))
            .await
            .map_err(|e| {
                error!("Analysis task failed: {}", e);
                ServiceError::Internal
            })?
    }

    /// Run a batch on the blocking pool. Dropping the returned future (for
    /// example when the client disconnects) cancels the files still pending.
    pub async fn analyze_batch_async(
        &self,
        request: BatchRequest,
    ) -> Result<BatchResult, ServiceError> {
        let service = self.clone();
        let cancel = CancelFlag::new();
        let mut guard = CancelOnDrop {
            flag: cancel.clone(),
            armed: true,
        };

        let result = tokio::task::spawn_blocking(move || {
            service.analyze_batch_with(&request, &cancel, None)
        })
        .await;
        guard.armed = false;

        result.map_err(|e| {
            error!("Batch task failed: {}", e);
            ServiceError::Internal
        })?
    }
}

/// Cancels the flag when dropped while armed
struct CancelOnDrop {
    flag: CancelFlag,
    armed: bool,
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        if self.armed {
            self.flag.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AnalysisService {
        AnalysisService::new(EngineConfig::default())
    }

    fn request(code: &str, language: &str) -> AnalyzeRequest {
        AnalyzeRequest {
            code: code.to_string(),
            language: language.to_string(),
        }
    }

    #[test]
    fn test_validation_before_parsing() {
        let svc = service();
        assert!(matches!(
            svc.analyze(&request("  ", "python")),
            Err(ServiceError::Validation(_))
        ));
        assert_eq!(
            svc.analyze(&request("x = 1", "cobol")).unwrap_err(),
            ServiceError::UnsupportedLanguage("cobol".into())
        );
        assert!(matches!(
            svc.analyze(&request("x = 1", "")),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_failure_maps_to_422() {
        let err = service()
            .analyze(&request("def f(:\n", "python"))
            .unwrap_err();
        assert_eq!(err.status_code(), 422);
        assert!(err.to_string().starts_with("syntax error at line 1"));
    }

    #[test]
    fn test_language_tags_case_insensitive() {
        let record = service().analyze(&request("let a = 1;\n", "JavaScript")).unwrap();
        assert_eq!(record.language, Language::JavaScript);
    }

    #[test]
    fn test_empty_batch_rejected() {
        let err = service().analyze_batch(&BatchRequest::default()).unwrap_err();
        assert_eq!(err, ServiceError::Validation("no files provided".into()));
    }

    #[test]
    fn test_batch_language_applies_to_all_files() {
        let req = BatchRequest {
            language: Some("cpp".into()),
            files: vec![
                UploadedFile {
                    filename: "one".into(),
                    content: b"int one() { return 1; }\n".to_vec(),
                },
                UploadedFile {
                    filename: "two".into(),
                    content: b"int two() { return 2; }\n".to_vec(),
                },
            ],
        };
        let result = service().analyze_batch(&req).unwrap();
        assert_eq!(result.analyzed_files, 2);

        let bad = BatchRequest {
            language: Some("fortran".into()),
            ..req
        };
        assert_eq!(
            service().analyze_batch(&bad).unwrap_err().status_code(),
            400
        );
    }

    #[tokio::test]
    async fn test_async_wrappers() {
        let svc = service();
        let record = svc
            .analyze_async(request("def f(a):\n    return a\n", "py"))
            .await
            .unwrap();
        assert_eq!(record.function_count, 1);

        let batch = svc
            .analyze_batch_async(BatchRequest {
                language: None,
                files: vec![UploadedFile {
                    filename: "main.py".into(),
                    content: b"print('hi')\n".to_vec(),
                }],
            })
            .await
            .unwrap();
        assert_eq!(batch.total_files, 1);
        assert_eq!(batch.analyzed_files, 1);
    }

    #[test]
    fn test_drop_guard_cancels() {
        let flag = CancelFlag::new();
        drop(CancelOnDrop {
            flag: flag.clone(),
            armed: true,
        });
        assert!(flag.is_cancelled());

        let flag = CancelFlag::new();
        drop(CancelOnDrop {
            flag: flag.clone(),
            armed: false,
        });
        assert!(!flag.is_cancelled());
    }
}
