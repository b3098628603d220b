//! Core data models for codereader
//!
//! These models flow through the whole engine: the parser produces
//! [`StructuralBlock`]s and [`Identifier`]s, the analyzers reduce them to
//! metrics, and the score composer assembles a [`MetricRecord`].

use crate::error::{AnalysisError, ErrorKind};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Languages the engine can analyze
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    /// TypeScript with JSX
    Tsx,
    Java,
    Cpp,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::Python,
        Language::JavaScript,
        Language::TypeScript,
        Language::Tsx,
        Language::Java,
        Language::Cpp,
    ];

    /// Canonical lowercase tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Tsx => "tsx",
            Language::Java => "java",
            Language::Cpp => "cpp",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::JavaScript => "JavaScript",
            Language::TypeScript => "TypeScript",
            Language::Tsx => "TSX",
            Language::Java => "Java",
            Language::Cpp => "C++",
        }
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::Python => &["py", "pyi"],
            Language::JavaScript => &["js", "jsx", "mjs", "cjs"],
            Language::TypeScript => &["ts", "mts", "cts"],
            Language::Tsx => &["tsx"],
            Language::Java => &["java"],
            Language::Cpp => &["cpp", "cc", "cxx", "hpp", "hh", "hxx", "h"],
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.extensions().contains(&ext.as_str()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Language::from_extension)
    }
}

impl FromStr for Language {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "python" | "py" => Ok(Language::Python),
            "javascript" | "js" | "jsx" => Ok(Language::JavaScript),
            "typescript" | "ts" => Ok(Language::TypeScript),
            "tsx" => Ok(Language::Tsx),
            "java" => Ok(Language::Java),
            "cpp" | "c++" | "cxx" | "cc" => Ok(Language::Cpp),
            _ => Err(AnalysisError::unsupported_language(s)),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A source file handed to the engine. Borrowed for one analysis.
#[derive(Debug, Clone, Copy)]
pub struct SourceUnit<'a> {
    pub code: &'a str,
    pub language: Language,
    pub filename: Option<&'a str>,
}

impl<'a> SourceUnit<'a> {
    pub fn new(code: &'a str, language: Language) -> Self {
        Self {
            code,
            language,
            filename: None,
        }
    }

    pub fn with_filename(mut self, filename: &'a str) -> Self {
        self.filename = Some(filename);
        self
    }

    /// Name used in log lines
    pub fn label(&self) -> &str {
        self.filename.unwrap_or("<input>")
    }
}

/// Kind of a structural block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Function,
    Class,
    If,
    Loop,
    Try,
    Case,
    BooleanOperator,
}

impl BlockKind {
    /// Whether the block adds an execution path (counts toward cyclomatic complexity)
    pub fn is_decision(&self) -> bool {
        !matches!(self, BlockKind::Function | BlockKind::Class)
    }

    /// Whether the block is a control-flow structure that pays a nesting penalty
    pub fn is_control_flow(&self) -> bool {
        matches!(
            self,
            BlockKind::If | BlockKind::Loop | BlockKind::Try | BlockKind::Case
        )
    }
}

/// One block of the normalized structure, in source order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralBlock {
    pub kind: BlockKind,
    /// Control-flow nesting depth (0 = not inside any conditional, loop, handler or case)
    pub depth: u32,
    /// 1-based, inclusive
    pub start_line: u32,
    /// 1-based, inclusive
    pub end_line: u32,
    /// Declared name for functions and classes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Index of the innermost enclosing Function block in the same sequence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enclosing_function: Option<usize>,
}

/// A declared name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    pub line: u32,
}

impl Identifier {
    pub fn len(&self) -> usize {
        self.name.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

/// Maintainability rank derived from the maintainability index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MaintainabilityRank {
    A,
    B,
    C,
    D,
    F,
}

impl MaintainabilityRank {
    pub const A_MIN: f64 = 85.0;
    pub const B_MIN: f64 = 65.0;
    pub const C_MIN: f64 = 45.0;
    pub const D_MIN: f64 = 25.0;

    pub fn from_index(index: f64) -> Self {
        match index {
            i if i >= Self::A_MIN => MaintainabilityRank::A,
            i if i >= Self::B_MIN => MaintainabilityRank::B,
            i if i >= Self::C_MIN => MaintainabilityRank::C,
            i if i >= Self::D_MIN => MaintainabilityRank::D,
            _ => MaintainabilityRank::F,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MaintainabilityRank::A => "highly maintainable",
            MaintainabilityRank::B => "maintainable",
            MaintainabilityRank::C => "moderately maintainable",
            MaintainabilityRank::D => "hard to maintain",
            MaintainabilityRank::F => "very hard to maintain",
        }
    }
}

impl std::fmt::Display for MaintainabilityRank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaintainabilityRank::A => write!(f, "A"),
            MaintainabilityRank::B => write!(f, "B"),
            MaintainabilityRank::C => write!(f, "C"),
            MaintainabilityRank::D => write!(f, "D"),
            MaintainabilityRank::F => write!(f, "F"),
        }
    }
}

/// Halstead counts and derived measures over the token stream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HalsteadMetrics {
    pub distinct_operators: u32,
    pub distinct_operands: u32,
    pub total_operators: u32,
    pub total_operands: u32,
    /// n = n1 + n2
    pub vocabulary: u32,
    /// N = N1 + N2
    pub length: u32,
    /// V = N * log2(n)
    pub volume: f64,
}

/// Per-function measurements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionMetrics {
    pub name: String,
    pub start_line: u32,
    pub end_line: u32,
    /// Code lines inside the function's span
    pub length: usize,
    pub cyclomatic_complexity: u32,
    pub cognitive_complexity: u32,
    /// Deepest control block relative to the function itself
    pub max_nesting_depth: u32,
}

/// A repeated run of code lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicatedBlock {
    /// First line of the repeated run (1-based)
    pub line: u32,
    /// First line of the earliest identical run
    pub duplicate_of: u32,
    pub lines: u32,
}

/// The per-file analysis result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub language: Language,
    /// 0-100, one decimal
    pub readability_score: f64,
    pub cyclomatic_complexity: u32,
    pub cognitive_complexity: u32,
    pub maintainability_index: f64,
    pub maintainability_rank: MaintainabilityRank,
    /// Non-blank lines
    pub lines_of_code: usize,
    pub code_lines: usize,
    pub comment_lines: usize,
    pub blank_lines: usize,
    pub total_lines: usize,
    pub comment_density: f64,
    pub duplication_percentage: f64,
    pub duplicated_blocks: Vec<DuplicatedBlock>,
    pub avg_name_length: f64,
    pub sorted_name_lengths: Vec<usize>,
    pub single_letter_warnings: Vec<String>,
    pub unclear_name_flags: Vec<String>,
    pub long_name_flags: Vec<String>,
    pub max_nesting_depth: u32,
    pub avg_nesting_depth: f64,
    pub function_count: usize,
    pub class_count: usize,
    pub avg_function_length: f64,
    pub max_function_length: usize,
    pub functions: Vec<FunctionMetrics>,
    pub halstead: HalsteadMetrics,
    pub suggestions: Vec<String>,
}

/// Outcome of one file in a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileStatus {
    Ok { metrics: Box<MetricRecord> },
    Error { kind: ErrorKind, error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileOutcome {
    pub filename: String,
    #[serde(flatten)]
    pub status: FileStatus,
}

impl FileOutcome {
    pub fn ok(filename: impl Into<String>, record: MetricRecord) -> Self {
        Self {
            filename: filename.into(),
            status: FileStatus::Ok {
                metrics: Box::new(record),
            },
        }
    }

    pub fn failed(filename: impl Into<String>, error: &AnalysisError) -> Self {
        Self {
            filename: filename.into(),
            status: FileStatus::Error {
                kind: error.kind(),
                error: error.public_message(),
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.status, FileStatus::Ok { .. })
    }

    pub fn metrics(&self) -> Option<&MetricRecord> {
        match &self.status {
            FileStatus::Ok { metrics } => Some(metrics),
            FileStatus::Error { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            FileStatus::Ok { .. } => None,
            FileStatus::Error { error, .. } => Some(error),
        }
    }
}

/// Means over successfully analyzed files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchAverages {
    pub readability_score: f64,
    pub cyclomatic_complexity: f64,
    pub cognitive_complexity: f64,
    pub maintainability_index: f64,
    pub lines_of_code: f64,
    pub comment_density: f64,
    pub duplication_percentage: f64,
    pub avg_name_length: f64,
    pub max_nesting_depth: f64,
    pub avg_nesting_depth: f64,
}

/// Maxima over successfully analyzed files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchMaxima {
    pub cyclomatic_complexity: u32,
    pub cognitive_complexity: u32,
    pub max_nesting_depth: u32,
    pub duplication_percentage: f64,
}

/// Result of a batch analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub total_files: usize,
    pub analyzed_files: usize,
    pub failed_files: usize,
    /// Sum of lines_of_code over analyzed files
    pub total_lines: usize,
    pub averages: BatchAverages,
    pub maxima: BatchMaxima,
    /// One entry per input file, in input order
    pub files: Vec<FileOutcome>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parsing() {
        assert_eq!("Python".parse::<Language>().unwrap(), Language::Python);
        assert_eq!("js".parse::<Language>().unwrap(), Language::JavaScript);
        assert_eq!("TS".parse::<Language>().unwrap(), Language::TypeScript);
        assert_eq!("tsx".parse::<Language>().unwrap(), Language::Tsx);
        assert_eq!("c++".parse::<Language>().unwrap(), Language::Cpp);
        assert_eq!(" java ".parse::<Language>().unwrap(), Language::Java);

        let err = "cobol".parse::<Language>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedLanguage);
    }

    #[test]
    fn test_language_from_path() {
        assert_eq!(Language::from_path("src/app.py"), Some(Language::Python));
        assert_eq!(Language::from_path("Main.JAVA"), Some(Language::Java));
        assert_eq!(Language::from_path("lib/util.hpp"), Some(Language::Cpp));
        assert_eq!(Language::from_path("index.ts"), Some(Language::TypeScript));
        assert_eq!(Language::from_path("App.tsx"), Some(Language::Tsx));
        assert_eq!(Language::from_path("README"), None);
        assert_eq!(Language::from_path("main.rs"), None);
    }

    #[test]
    fn test_language_serde_tag() {
        let json = serde_json::to_string(&Language::Cpp).unwrap();
        assert_eq!(json, "\"cpp\"");
        let lang: Language = serde_json::from_str("\"javascript\"").unwrap();
        assert_eq!(lang, Language::JavaScript);
    }

    #[test]
    fn test_rank_boundaries() {
        assert_eq!(MaintainabilityRank::from_index(130.0), MaintainabilityRank::A);
        assert_eq!(MaintainabilityRank::from_index(85.0), MaintainabilityRank::A);
        assert_eq!(MaintainabilityRank::from_index(84.99), MaintainabilityRank::B);
        assert_eq!(MaintainabilityRank::from_index(65.0), MaintainabilityRank::B);
        assert_eq!(MaintainabilityRank::from_index(64.99), MaintainabilityRank::C);
        assert_eq!(MaintainabilityRank::from_index(45.0), MaintainabilityRank::C);
        assert_eq!(MaintainabilityRank::from_index(44.99), MaintainabilityRank::D);
        assert_eq!(MaintainabilityRank::from_index(25.0), MaintainabilityRank::D);
        assert_eq!(MaintainabilityRank::from_index(24.99), MaintainabilityRank::F);
        assert_eq!(MaintainabilityRank::from_index(0.0), MaintainabilityRank::F);
    }

    #[test]
    fn test_block_kind_classes() {
        assert!(BlockKind::If.is_decision());
        assert!(BlockKind::BooleanOperator.is_decision());
        assert!(!BlockKind::Function.is_decision());
        assert!(!BlockKind::BooleanOperator.is_control_flow());
        assert!(BlockKind::Case.is_control_flow());
    }

    #[test]
    fn test_file_outcome_serialization() {
        let failed = FileOutcome::failed(
            "b.py",
            &AnalysisError::Parse {
                line: 2,
                reason: "unexpected syntax".into(),
            },
        );
        let value = serde_json::to_value(&failed).unwrap();
        assert_eq!(value["filename"], "b.py");
        assert_eq!(value["status"], "error");
        assert_eq!(value["kind"], "parse");
        assert!(!failed.is_ok());
        assert!(failed.metrics().is_none());
    }
}
