//! Line classification: code, comment, blank
//!
//! A small per-language lexer that tracks block comments and string
//! literals across lines, so `//` inside a string is not a comment and a
//! `/* ... */` spanning lines marks every line it touches. Python docstrings
//! (a triple-quoted string opening a line) count as comments. C++ raw
//! strings (`R"delim( ... )delim"`) are opaque until their closing delimiter.

use crate::error::AnalysisResult;
use crate::models::Language;
use crate::pipeline::Budget;

/// Lines classified between budget checks
const CHECK_INTERVAL: usize = 1024;

/// Encoding prefixes that may precede a C++ raw string
const RAW_STRING_PREFIXES: [&str; 5] = ["u8R\"", "uR\"", "UR\"", "LR\"", "R\""];

/// Longest delimiter the C++ standard allows
const MAX_RAW_DELIMITER: usize = 16;

struct StringDelim {
    open: &'static str,
    close: &'static str,
    multiline: bool,
}

const fn delim(open: &'static str, close: &'static str, multiline: bool) -> StringDelim {
    StringDelim {
        open,
        close,
        multiline,
    }
}

struct CommentSyntax {
    line: &'static str,
    block: Option<(&'static str, &'static str)>,
    /// Longest openers first
    strings: &'static [StringDelim],
    docstrings: bool,
    raw_strings: bool,
}

const PYTHON: CommentSyntax = CommentSyntax {
    line: "#",
    block: None,
    strings: &[
        delim("\"\"\"", "\"\"\"", true),
        delim("'''", "'''", true),
        delim("\"", "\"", false),
        delim("'", "'", false),
    ],
    docstrings: true,
    raw_strings: false,
};

const SCRIPT: CommentSyntax = CommentSyntax {
    line: "//",
    block: Some(("/*", "*/")),
    strings: &[
        delim("`", "`", true),
        delim("\"", "\"", false),
        delim("'", "'", false),
    ],
    docstrings: false,
    raw_strings: false,
};

const JAVA: CommentSyntax = CommentSyntax {
    line: "//",
    block: Some(("/*", "*/")),
    strings: &[
        delim("\"\"\"", "\"\"\"", true),
        delim("\"", "\"", false),
        delim("'", "'", false),
    ],
    docstrings: false,
    raw_strings: false,
};

const CPP: CommentSyntax = CommentSyntax {
    line: "//",
    block: Some(("/*", "*/")),
    strings: &[delim("\"", "\"", false), delim("'", "'", false)],
    docstrings: false,
    raw_strings: true,
};

fn syntax_for(language: Language) -> &'static CommentSyntax {
    match language {
        Language::Python => &PYTHON,
        Language::JavaScript | Language::TypeScript | Language::Tsx => &SCRIPT,
        Language::Java => &JAVA,
        Language::Cpp => &CPP,
    }
}

/// Classification of one physical line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineInfo {
    /// Code text with comments removed and whitespace collapsed
    pub code: String,
    pub has_code: bool,
    pub has_comment: bool,
    pub blank: bool,
}

/// Classified lines of a source file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineProfile {
    lines: Vec<LineInfo>,
}

impl LineProfile {
    pub fn lines(&self) -> &[LineInfo] {
        &self.lines
    }

    pub fn total_lines(&self) -> usize {
        self.lines.len()
    }

    /// Non-blank lines
    pub fn lines_of_code(&self) -> usize {
        self.lines.iter().filter(|l| !l.blank).count()
    }

    pub fn code_lines(&self) -> usize {
        self.lines.iter().filter(|l| l.has_code).count()
    }

    pub fn comment_lines(&self) -> usize {
        self.lines.iter().filter(|l| l.has_comment).count()
    }

    /// Code lines within an inclusive, 1-based line range
    pub fn code_lines_between(&self, start_line: u32, end_line: u32) -> usize {
        let start = (start_line.max(1) - 1) as usize;
        let end = (end_line as usize).min(self.lines.len());
        if start >= end {
            return 0;
        }
        self.lines[start..end].iter().filter(|l| l.has_code).count()
    }
}

enum State {
    Code,
    BlockComment { close: &'static str },
    Str { close: &'static str, multiline: bool, doc: bool },
    /// C++ raw string; ends only at `)delim"`, no escapes
    RawStr { close: String },
}

/// Classify every line of `source`, checking `budget` as it goes
pub fn profile_lines(
    source: &str,
    language: Language,
    budget: &Budget,
) -> AnalysisResult<LineProfile> {
    let syntax = syntax_for(language);
    let mut state = State::Code;
    let mut lines = Vec::new();

    for (index, line) in source.lines().enumerate() {
        if index % CHECK_INTERVAL == CHECK_INTERVAL - 1 {
            budget.check()?;
        }

        let mut raw_code = String::with_capacity(line.len());
        let mut has_comment = false;
        let mut has_code = false;
        let mut i = 0;

        while i < line.len() {
            let rest = &line[i..];
            match &state {
                State::BlockComment { close } => {
                    let close = *close;
                    has_comment = true;
                    match rest.find(close) {
                        Some(pos) => {
                            i += pos + close.len();
                            state = State::Code;
                        }
                        None => i = line.len(),
                    }
                }
                State::Str { close, doc, .. } => {
                    let (close, doc) = (*close, *doc);
                    let (consumed, closed) = scan_string(rest, close);
                    if doc {
                        has_comment = true;
                    } else {
                        raw_code.push_str(&rest[..consumed]);
                        has_code = true;
                    }
                    i += consumed;
                    if closed {
                        state = State::Code;
                    }
                }
                State::RawStr { close } => {
                    let consumed = rest.find(close.as_str()).map(|pos| pos + close.len());
                    has_code = true;
                    match consumed {
                        Some(end) => {
                            raw_code.push_str(&rest[..end]);
                            i += end;
                            state = State::Code;
                        }
                        None => {
                            raw_code.push_str(rest);
                            i = line.len();
                        }
                    }
                }
                State::Code => {
                    if rest.starts_with(syntax.line) {
                        has_comment = true;
                        break;
                    }
                    if let Some((open, close)) = syntax.block {
                        if rest.starts_with(open) {
                            has_comment = true;
                            i += open.len();
                            state = State::BlockComment { close };
                            continue;
                        }
                    }
                    if syntax.raw_strings && !continues_identifier(&line[..i]) {
                        if let Some((open_len, close)) = raw_string_open(rest) {
                            raw_code.push_str(&rest[..open_len]);
                            has_code = true;
                            i += open_len;
                            state = State::RawStr { close };
                            continue;
                        }
                    }
                    if let Some(string) = syntax.strings.iter().find(|d| rest.starts_with(d.open)) {
                        let doc = syntax.docstrings
                            && string.open.len() == 3
                            && raw_code.trim().is_empty();
                        if doc {
                            has_comment = true;
                        } else {
                            raw_code.push_str(string.open);
                            has_code = true;
                        }
                        i += string.open.len();
                        state = State::Str {
                            close: string.close,
                            multiline: string.multiline,
                            doc,
                        };
                        continue;
                    }

                    let Some(c) = rest.chars().next() else {
                        break;
                    };
                    if !c.is_whitespace() {
                        has_code = true;
                    }
                    raw_code.push(c);
                    i += c.len_utf8();
                }
            }
        }

        // Single-line strings never continue past the end of the line
        if let State::Str {
            multiline: false, ..
        } = state
        {
            state = State::Code;
        }

        let blank = line.trim().is_empty();
        lines.push(LineInfo {
            code: raw_code.split_whitespace().collect::<Vec<_>>().join(" "),
            has_code: has_code && !blank,
            has_comment: has_comment && !blank,
            blank,
        });
    }

    Ok(LineProfile { lines })
}

/// `prefix` ends in an identifier character, so an `R"` here is part of a name
fn continues_identifier(prefix: &str) -> bool {
    prefix
        .chars()
        .next_back()
        .is_some_and(|c| c.is_alphanumeric() || c == '_')
}

/// Match a raw string opener at the start of `rest`.
/// Returns the opener length and the closing sequence.
fn raw_string_open(rest: &str) -> Option<(usize, String)> {
    let (prefix_len, body) = RAW_STRING_PREFIXES
        .iter()
        .find_map(|prefix| rest.strip_prefix(prefix).map(|body| (prefix.len(), body)))?;
    let paren = body.find('(')?;
    let delimiter = &body[..paren];
    if delimiter.len() > MAX_RAW_DELIMITER
        || delimiter
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, ')' | '\\' | '"'))
    {
        return None;
    }
    Some((prefix_len + paren + 1, format!("){delimiter}\"")))
}

/// Scan string contents up to and including `close`, honoring backslash escapes.
/// Returns the bytes consumed and whether the string closed.
fn scan_string(rest: &str, close: &str) -> (usize, bool) {
    let mut chars = rest.char_indices();
    while let Some((idx, c)) = chars.next() {
        if c == '\\' {
            chars.next();
            continue;
        }
        if rest[idx..].starts_with(close) {
            return (idx + close.len(), true);
        }
    }
    (rest.len(), false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use crate::pipeline::CancelFlag;
    use std::time::Duration;

    fn profile(source: &str, language: Language) -> LineProfile {
        profile_lines(source, language, &Budget::unlimited()).unwrap()
    }

    fn flags(profile: &LineProfile) -> Vec<(bool, bool)> {
        profile
            .lines()
            .iter()
            .map(|l| (l.has_code, l.has_comment))
            .collect()
    }

    #[test]
    fn test_python_comments_and_docstrings() {
        let source = r##"# header
def f(x):
    """Compute things.

    More detail.
    """

    y = "# not a comment"  # trailing
    return y
"##;
        let profile = profile(source, Language::Python);
        assert_eq!(
            flags(&profile),
            vec![
                (false, true),
                (true, false),
                (false, true),
                (false, false),
                (false, true),
                (false, true),
                (false, false),
                (true, true),
                (true, false),
            ]
        );
        assert_eq!(profile.total_lines(), 9);
        assert_eq!(profile.lines_of_code(), 7);
        assert_eq!(profile.comment_lines(), 5);
        assert_eq!(profile.code_lines(), 3);
        assert_eq!(profile.lines()[7].code, "y = \"# not a comment\"");
    }

    #[test]
    fn test_block_comments_span_lines() {
        let source = "int a = 1; /* start\n  still comment\n end */ int b = 2;\nint c = 3; // done\n";
        let profile = profile(source, Language::Cpp);
        assert_eq!(
            flags(&profile),
            vec![(true, true), (false, true), (true, true), (true, true)]
        );
        assert_eq!(profile.lines()[2].code, "int b = 2;");
    }

    #[test]
    fn test_comment_markers_inside_strings() {
        let source = "const url = \"http://example.com\";\nconst s = 'a /* b';\nconst t = `multi\n// still string\n`;\n";
        let profile = profile(source, Language::JavaScript);
        assert!(profile.lines().iter().all(|l| !l.has_comment));
        assert_eq!(profile.code_lines(), 5);
    }

    #[test]
    fn test_escaped_quotes() {
        let source = "String s = \"a \\\" // b\";\n// real\n";
        let profile = profile(source, Language::Java);
        assert_eq!(flags(&profile), vec![(true, false), (false, true)]);
    }

    #[test]
    fn test_code_lines_between() {
        let source = "a = 1\n\n# note\nb = 2\nc = 3\n";
        let profile = profile(source, Language::Python);
        assert_eq!(profile.code_lines_between(1, 5), 3);
        assert_eq!(profile.code_lines_between(2, 4), 1);
        assert_eq!(profile.code_lines_between(4, 99), 2);
        assert_eq!(profile.code_lines_between(6, 7), 0);
    }

    #[test]
    fn test_cpp_raw_string_hides_comment_markers() {
        let source = "const char* pattern = R\"sql(\nSELECT /* all */ *\nFROM t -- )\"\n)sql\";\nint a = 1;\nint b = 2;\nint c = 3;\n";
        let profile = profile(source, Language::Cpp);
        assert!(profile.lines().iter().all(|l| !l.has_comment));
        assert_eq!(profile.code_lines(), 7);
        assert_eq!(profile.lines()[4].code, "int a = 1;");
    }

    #[test]
    fn test_cpp_raw_string_prefixes_and_identifiers() {
        let source = "auto s = u8R\"(a // b)\"; // note\nint FOR\"x\" = 0;\n";
        let profile = profile(source, Language::Cpp);
        assert_eq!(flags(&profile), vec![(true, true), (true, false)]);
        assert_eq!(profile.lines()[0].code, "auto s = u8R\"(a // b)\";");
    }

    #[test]
    fn test_cancelled_budget_stops_classification() {
        let flag = CancelFlag::new();
        flag.cancel();
        let budget = Budget::start(Some(Duration::from_secs(60)), flag);
        let source = "x = 1\n".repeat(CHECK_INTERVAL * 2);
        assert_eq!(
            profile_lines(&source, Language::Python, &budget),
            Err(AnalysisError::Cancelled)
        );
        assert!(profile_lines("x = 1\n", Language::Python, &budget).is_ok());
    }
}
