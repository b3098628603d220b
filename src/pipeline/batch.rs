//! Batch Aggregator
//!
//! Each file runs the single-file pipeline on a bounded rayon pool. Results
//! are collected by index so the output order matches the input order no
//! matter which file finishes first. A failing file becomes an error entry
//! and never aborts the others.

use super::{analyze_source, Budget, CancelFlag};
use crate::config::EngineConfig;
use crate::error::{AnalysisError, AnalysisResult};
use crate::metrics::round_to;
use crate::models::{
    BatchAverages, BatchMaxima, BatchResult, FileOutcome, Language, MetricRecord, SourceUnit,
};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, error, info, warn};

/// One uploaded file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFile {
    pub filename: String,
    /// Falls back to the filename's extension when `None`
    pub language: Option<Language>,
    /// Raw bytes; must be UTF-8
    pub content: Vec<u8>,
}

impl BatchFile {
    pub fn new(filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            language: None,
            content: content.into(),
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    fn resolve_language(&self) -> AnalysisResult<Language> {
        self.language
            .or_else(|| Language::from_path(&self.filename))
            .ok_or_else(|| AnalysisError::unsupported_language(&self.filename))
    }
}

fn analyze_file(
    file: &BatchFile,
    config: &EngineConfig,
    cancel: &CancelFlag,
) -> AnalysisResult<MetricRecord> {
    // The clock starts when the file is picked up, not when it is queued
    let budget = Budget::start(config.file_timeout(), cancel.clone());
    budget.check()?;

    let language = file.resolve_language()?;
    let code = std::str::from_utf8(&file.content).map_err(|_| AnalysisError::InvalidEncoding)?;
    let code = code.strip_prefix('\u{feff}').unwrap_or(code);

    let unit = SourceUnit::new(code, language).with_filename(&file.filename);
    analyze_source(&unit, config, &budget)
}

/// Analyze every file and aggregate the results.
///
/// Fails as a whole only when the pool cannot be built or `cancel` was set;
/// a cancelled batch discards whatever finished.
pub fn analyze_batch(
    files: &[BatchFile],
    config: &EngineConfig,
    cancel: &CancelFlag,
    progress: Option<&(dyn Fn(usize, usize) + Sync)>,
) -> AnalysisResult<BatchResult> {
    let workers = config.effective_workers();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("codereader-worker-{i}"))
        .build()
        .map_err(|e| AnalysisError::Internal(format!("failed to build worker pool: {e}")))?;

    info!("Analyzing {} files on {} workers", files.len(), workers);

    let done = AtomicUsize::new(0);
    let total = files.len();

    let outcomes: Vec<FileOutcome> = pool.install(|| {
        files
            .par_iter()
            .map(|file| {
                let outcome = match analyze_file(file, config, cancel) {
                    Ok(record) => FileOutcome::ok(&file.filename, record),
                    Err(e) => {
                        match &e {
                            AnalysisError::Internal(detail) => {
                                error!("Internal error analyzing {}: {}", file.filename, detail)
                            }
                            AnalysisError::Cancelled => {
                                debug!("Skipped {}: batch cancelled", file.filename)
                            }
                            other => warn!("Failed to analyze {}: {}", file.filename, other),
                        }
                        FileOutcome::failed(&file.filename, &e)
                    }
                };

                let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
                if let Some(cb) = progress {
                    cb(finished, total);
                }
                outcome
            })
            .collect()
    });

    if cancel.is_cancelled() {
        info!("Batch cancelled after {} of {} files", done.load(Ordering::Relaxed), total);
        return Err(AnalysisError::Cancelled);
    }

    Ok(aggregate(outcomes))
}

/// Means and maxima over the successful outcomes
fn aggregate(files: Vec<FileOutcome>) -> BatchResult {
    let records: Vec<&MetricRecord> = files.iter().filter_map(FileOutcome::metrics).collect();
    let analyzed = records.len();

    let mean = |field: fn(&MetricRecord) -> f64| -> f64 {
        if analyzed == 0 {
            0.0
        } else {
            round_to(records.iter().map(|r| field(r)).sum::<f64>() / analyzed as f64, 2)
        }
    };

    let averages = BatchAverages {
        readability_score: mean(|r| r.readability_score),
        cyclomatic_complexity: mean(|r| f64::from(r.cyclomatic_complexity)),
        cognitive_complexity: mean(|r| f64::from(r.cognitive_complexity)),
        maintainability_index: mean(|r| r.maintainability_index),
        lines_of_code: mean(|r| r.lines_of_code as f64),
        comment_density: mean(|r| r.comment_density),
        duplication_percentage: mean(|r| r.duplication_percentage),
        avg_name_length: mean(|r| r.avg_name_length),
        max_nesting_depth: mean(|r| f64::from(r.max_nesting_depth)),
        avg_nesting_depth: mean(|r| r.avg_nesting_depth),
    };

    let maxima = BatchMaxima {
        cyclomatic_complexity: records
            .iter()
            .map(|r| r.cyclomatic_complexity)
            .max()
            .unwrap_or(0),
        cognitive_complexity: records
            .iter()
            .map(|r| r.cognitive_complexity)
            .max()
            .unwrap_or(0),
        max_nesting_depth: records
            .iter()
            .map(|r| r.max_nesting_depth)
            .max()
            .unwrap_or(0),
        duplication_percentage: records
            .iter()
            .map(|r| r.duplication_percentage)
            .fold(0.0, f64::max),
    };

    let total_lines = records.iter().map(|r| r.lines_of_code).sum();

    BatchResult {
        total_files: files.len(),
        analyzed_files: analyzed,
        failed_files: files.len() - analyzed,
        total_lines,
        averages,
        maxima,
        files,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::FileStatus;

    fn run(files: &[BatchFile]) -> BatchResult {
        analyze_batch(files, &EngineConfig::default(), &CancelFlag::new(), None).unwrap()
    }

    #[test]
    fn test_order_preserved_with_failure() {
        let files = vec![
            BatchFile::new("a.py", "def a():\n    return 1\n"),
            BatchFile::new("b.py", "def f(\n"),
            BatchFile::new("c.js", "function c(x) { if (x) { return 1; } return 2; }\n"),
        ];
        let result = run(&files);

        let names: Vec<&str> = result.files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["a.py", "b.py", "c.js"]);
        assert!(result.files[0].is_ok());
        assert!(!result.files[1].is_ok());
        assert!(result.files[2].is_ok());
        match &result.files[1].status {
            FileStatus::Error { kind, .. } => assert_eq!(*kind, ErrorKind::Parse),
            other => panic!("unexpected {other:?}"),
        }

        assert_eq!(result.total_files, 3);
        assert_eq!(result.analyzed_files, 2);
        assert_eq!(result.failed_files, 1);
        assert_eq!(result.total_lines, 3);
        assert_eq!(result.averages.cyclomatic_complexity, 1.5);
        assert_eq!(result.maxima.cyclomatic_complexity, 2);
    }

    #[test]
    fn test_all_failed_reports_zeros() {
        let files = vec![
            BatchFile::new("notes.txt", "hello"),
            BatchFile::new("bad.py", vec![0xff, 0xfe, 0x00]),
            BatchFile::new("empty.py", ""),
        ];
        let result = run(&files);
        assert_eq!(result.total_files, 3);
        assert_eq!(result.analyzed_files, 0);
        assert_eq!(result.averages, BatchAverages::default());
        assert_eq!(result.maxima, BatchMaxima::default());

        let kinds: Vec<ErrorKind> = result
            .files
            .iter()
            .map(|f| match &f.status {
                FileStatus::Error { kind, .. } => *kind,
                FileStatus::Ok { .. } => panic!("{} should fail", f.filename),
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                ErrorKind::UnsupportedLanguage,
                ErrorKind::Validation,
                ErrorKind::Validation
            ]
        );
    }

    #[test]
    fn test_explicit_language_overrides_extension() {
        let files = vec![BatchFile::new("snippet.txt", "int main() { return 0; }\n")
            .with_language(Language::Cpp)];
        let result = run(&files);
        assert_eq!(result.files[0].metrics().unwrap().language, Language::Cpp);
    }

    #[test]
    fn test_cancelled_batch_discards_results() {
        let cancel = CancelFlag::new();
        cancel.cancel();
        let files = vec![BatchFile::new("a.py", "x = 1\n")];
        let err = analyze_batch(&files, &EngineConfig::default(), &cancel, None).unwrap_err();
        assert_eq!(err, AnalysisError::Cancelled);
    }

    #[test]
    fn test_progress_reports_every_file() {
        let seen = AtomicUsize::new(0);
        let last = AtomicUsize::new(0);
        let progress = |done: usize, total: usize| {
            assert_eq!(total, 4);
            seen.fetch_add(1, Ordering::Relaxed);
            last.fetch_max(done, Ordering::Relaxed);
        };
        let files: Vec<BatchFile> = (0..4)
            .map(|i| BatchFile::new(format!("f{i}.py"), format!("value_{i} = {i}\n")))
            .collect();
        let config = EngineConfig {
            workers: 2,
            ..EngineConfig::default()
        };
        let result = analyze_batch(&files, &config, &CancelFlag::new(), Some(&progress)).unwrap();
        assert_eq!(result.analyzed_files, 4);
        assert_eq!(seen.load(Ordering::Relaxed), 4);
        assert_eq!(last.load(Ordering::Relaxed), 4);
    }

    #[test]
    fn test_timed_out_file_does_not_sink_the_batch() {
        let depth = 150_000;
        let deep = format!("x = {}1{}\n", "(".repeat(depth), ")".repeat(depth));
        let files = vec![
            BatchFile::new("deep.py", deep),
            BatchFile::new("small.py", "def small():\n    return 1\n"),
        ];
        let config = EngineConfig {
            file_timeout_ms: 50,
            workers: 2,
            ..EngineConfig::default()
        };
        let result = analyze_batch(&files, &config, &CancelFlag::new(), None).unwrap();

        match &result.files[0].status {
            FileStatus::Error { kind, error } => {
                assert_eq!(*kind, ErrorKind::Timeout);
                assert!(error.contains("50 ms"), "{error}");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(result.files[1].is_ok());
        assert_eq!(result.analyzed_files, 1);
        assert_eq!(result.failed_files, 1);
        assert_eq!(result.total_lines, 2);
    }
}
