//! `analyze` and `batch` command handlers

use anyhow::{bail, Context, Result};
use codereader::config::EngineConfig;
use codereader::models::Language;
use codereader::pipeline::CancelFlag;
use codereader::reporters::{render_batch, render_record, OutputFormat};
use codereader::service::{AnalysisService, AnalyzeRequest, BatchRequest, UploadedFile};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Create bar progress style
fn create_bar_style() -> Result<ProgressStyle> {
    Ok(ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
        .progress_chars("█▓▒░  "))
}

/// Language tag for a file: the explicit flag, else the extension
fn language_tag(file: &Path, explicit: Option<&str>) -> Result<String> {
    if let Some(tag) = explicit {
        return Ok(tag.to_string());
    }
    match Language::from_path(file) {
        Some(language) => Ok(language.as_str().to_string()),
        None => bail!(
            "Cannot infer the language of {}; pass --language",
            file.display()
        ),
    }
}

pub fn run_file(
    config: EngineConfig,
    file: &Path,
    language: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let language = language_tag(file, language)?;
    let bytes =
        std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let code = String::from_utf8(bytes)
        .with_context(|| format!("{} is not valid UTF-8", file.display()))?;
    let code = match code.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => code,
    };

    let service = AnalysisService::new(config);
    let record = service
        .analyze(&AnalyzeRequest { code, language })
        .with_context(|| format!("Failed to analyze {}", file.display()))?;

    let label = file.display().to_string();
    println!("{}", render_record(&record, &label, format)?);
    Ok(())
}

pub fn run_batch(
    config: EngineConfig,
    files: &[PathBuf],
    language: Option<String>,
    format: OutputFormat,
    show_progress: bool,
) -> Result<()> {
    let start = Instant::now();

    let uploaded = files
        .iter()
        .map(|path| {
            let content = std::fs::read(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Ok(UploadedFile {
                filename: path.display().to_string(),
                content,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let request = BatchRequest {
        language,
        files: uploaded,
    };
    let service = AnalysisService::new(config);

    let bar = if show_progress && format == OutputFormat::Text {
        let bar = ProgressBar::new(request.files.len() as u64);
        bar.set_style(create_bar_style()?);
        bar.set_message("analyzing");
        bar
    } else {
        ProgressBar::hidden()
    };
    let progress = |done: usize, _total: usize| bar.set_position(done as u64);

    let result = service.analyze_batch_with(&request, &CancelFlag::new(), Some(&progress));
    bar.finish_and_clear();
    let result = result.context("Batch analysis failed")?;

    info!(
        "Analyzed {} files in {:.2}s",
        result.total_files,
        start.elapsed().as_secs_f64()
    );
    println!("{}", render_batch(&result, format)?);
    Ok(())
}
