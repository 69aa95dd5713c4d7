//! Numbered line parsing for answer keys and student submissions.
//!
//! Both file kinds hold one problem per line, written as `<number>. <text>`.
//! Only the text after the first `.` is graded, provided the part before it
//! looks like a problem number.

use std::path::Path;

use anyhow::{Context, Result};

/// One numbered line from an answer key or a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedLine {
    /// The problem number, or the 1-based position when the line has none.
    pub number: String,
    /// Everything after the first `.`, trimmed.
    pub text: String,
}

/// Split `16a. some text` into `(Some("16a"), "some text")`.
///
/// The prefix must be a non-empty run of letters and digits. Anything else,
/// such as `1) 3.5` or `x = 4. y = 5`, means the line carries no number: the
/// whole line is the text and the line is numbered by position instead.
pub fn split_numbered_line(line: &str) -> (Option<&str>, &str) {
    let line = line.trim();
    match line.split_once('.') {
        Some((number, rest))
            if !number.trim().is_empty()
                && number.trim().chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            (Some(number.trim()), rest.trim())
        }
        _ => (None, line),
    }
}

/// Parse the non-blank lines of a file into numbered lines.
pub fn parse_numbered_lines(text: &str) -> Vec<NumberedLine> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(index, line)| {
            let (number, text) = split_numbered_line(line);
            NumberedLine {
                number: number
                    .map(str::to_string)
                    .unwrap_or_else(|| (index + 1).to_string()),
                text: text.to_string(),
            }
        })
        .collect()
}

/// An answer key: one specification line per problem, in file order.
///
/// Specifications are kept as text and parsed per run, so a malformed tag
/// only fails the submissions that reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerKey {
    pub lines: Vec<NumberedLine>,
}

impl AnswerKey {
    /// Parse answer-key text.
    pub fn parse(text: &str) -> Self {
        Self {
            lines: parse_numbered_lines(text),
        }
    }

    /// Load an answer-key file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read answer key: {}", path.display()))?;
        Ok(Self::parse(&text))
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// A student's submission for one assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Display name, e.g. `Alice`.
    pub student: String,
    pub text: String,
}

impl Submission {
    pub fn new(student: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            student: student.into(),
            text: text.into(),
        }
    }

    /// Load a submission file named `<name>_<assignment>.txt`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read submission: {}", path.display()))?;
        Ok(Self::new(student_name(path), text))
    }
}

/// Derive a display name from a submission file name.
///
/// `alice_HW3.txt` becomes `Alice`.
pub fn student_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = stem
        .split(['_', '-'])
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or(stem.as_str());

    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
