//! CLI command definitions and handlers

mod analyze;
mod serve;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use codereader::config::{load_config_file, load_engine_config, EngineConfig};
use codereader::models::Language;
use codereader::reporters::OutputFormat;
use console::style;
use std::path::PathBuf;

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// codereader - Code quality analysis
#[derive(Parser, Debug)]
#[command(name = "codereader")]
#[command(
    version,
    about = "Code quality analysis: complexity, maintainability, duplication and readability scores",
    long_about = "codereader parses source files with tree-sitter and reports cyclomatic and \
cognitive complexity, a maintainability index, comment density, duplication, naming \
statistics and a blended readability score, with concrete suggestions.\n\n\
Supported languages: Python, JavaScript, TypeScript, Java, C++",
    after_help = "\
Examples:
  codereader analyze app.py                     Analyze one file
  codereader analyze main.cc --format json      JSON output for scripting
  codereader batch src/*.py                     Analyze several files with aggregates
  codereader serve                              Start the MCP server on stdio
  codereader languages                          Show per-language thresholds"
)]
pub struct Cli {
    /// Log level when RUST_LOG is not set (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Number of parallel workers (1-64, default: one per CPU core)
    #[arg(long, global = true, value_parser = parse_workers)]
    pub workers: Option<usize>,

    /// Configuration file (TOML, or JSON by extension)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze one source file
    #[command(after_help = "\
Examples:
  codereader analyze app.py
  codereader analyze script --language python
  codereader analyze Main.java --format json")]
    Analyze {
        /// Source file to analyze
        file: PathBuf,

        /// Language tag (default: from the file extension)
        #[arg(long, short = 'l')]
        language: Option<String>,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Analyze several files and aggregate the results
    Batch {
        /// Source files to analyze
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Language tag for every file (default: from each file's extension)
        #[arg(long, short = 'l')]
        language: Option<String>,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Start the MCP server (JSON-RPC over stdio)
    Serve,

    /// List supported languages and their thresholds
    Languages,

    /// Print the effective configuration as TOML
    Config,
}

/// Resolve configuration: explicit file, else discovery from the working directory
fn resolve_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = load_config_file(path)?;
            config.apply_env(|key| std::env::var(key).ok());
            config
        }
        None => {
            let cwd = std::env::current_dir().context("Failed to read working directory")?;
            load_engine_config(&cwd)
        }
    };
    if let Some(workers) = cli.workers {
        config.workers = workers;
    }
    Ok(config)
}

pub fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;

    match cli.command {
        Commands::Analyze {
            file,
            language,
            format,
        } => {
            let format: OutputFormat = format.parse()?;
            analyze::run_file(config, &file, language.as_deref(), format)
        }

        Commands::Batch {
            files,
            language,
            format,
            no_progress,
        } => {
            let format: OutputFormat = format.parse()?;
            analyze::run_batch(config, &files, language, format, !no_progress)
        }

        Commands::Serve => serve::run(config),

        Commands::Languages => {
            print_languages(&config);
            Ok(())
        }

        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn print_languages(config: &EngineConfig) {
    for language in Language::ALL {
        let t = config.thresholds_for(language);
        println!(
            "{} {}",
            style(language.display_name()).bold(),
            style(format!("({}; .{})", language.as_str(), language.extensions().join(", ."))).dim()
        );
        println!(
            "  max function length: {}  max complexity: {}  max cognitive: {}  max nesting: {}",
            t.max_function_length, t.max_complexity, t.max_cognitive_complexity, t.max_nesting_depth
        );
        println!(
            "  min comment density: {:.1}%  max duplication: {:.1}%  ideal name length: {:.1}",
            t.min_comment_density, t.max_duplication, t.ideal_avg_name_length
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_workers() {
        assert_eq!(parse_workers("4"), Ok(4));
        assert!(parse_workers("0").is_err());
        assert!(parse_workers("65").is_err());
        assert!(parse_workers("many").is_err());
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["codereader", "analyze", "a.py", "-f", "json"]).unwrap();
        assert_eq!(cli.log_level, "warn");
        match cli.command {
            Commands::Analyze { file, format, .. } => {
                assert_eq!(file, PathBuf::from("a.py"));
                assert_eq!(format, "json");
            }
            other => panic!("unexpected command: {:?}", other),
        }

        assert!(Cli::try_parse_from(["codereader", "batch"]).is_err());
        assert!(Cli::try_parse_from(["codereader", "analyze", "a.py", "-f", "sarif"]).is_err());
    }

    #[test]
    fn test_workers_flag_overrides_config() {
        let cli = Cli::try_parse_from(["codereader", "--workers", "3", "languages"]).unwrap();
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.workers, 3);
    }
}
