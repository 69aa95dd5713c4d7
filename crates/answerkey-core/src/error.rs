//! Grading error types.
//!
//! `GradeError` is fatal to the submission being graded. `ArithmeticError`
//! is recovered where it occurs and only surfaces as a diagnostic.

use thiserror::Error;

/// The tag grammar shown to authors when a specification line is malformed.
pub const TAG_GRAMMAR: &str =
    "N. VALUE ; range NUMBER ; range NUMBER to NUMBER ; PARTIAL CREDIT RATIO ; FEEDBACK";

/// Errors that stop grading of the current student file.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GradeError {
    /// A tag in the answer key could not be classified.
    #[error(
        "formatting issue in answer key problem {problem}: tag '{token}' {reason}; expected {}",
        TAG_GRAMMAR
    )]
    Format {
        problem: String,
        token: String,
        reason: String,
    },

    /// The answer key ran out of lines before the student file did.
    #[error(
        "answer key has fewer entries than the student file (no solution for problem {problem})"
    )]
    StreamMismatch { problem: String },
}

impl GradeError {
    pub(crate) fn format(
        problem: impl Into<String>,
        token: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        GradeError::Format {
            problem: problem.into(),
            token: token.into(),
            reason: reason.into(),
        }
    }

    /// The problem number the error refers to.
    pub fn problem(&self) -> &str {
        match self {
            GradeError::Format { problem, .. } | GradeError::StreamMismatch { problem } => problem,
        }
    }
}

/// Errors raised while normalizing an answer. Never fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArithmeticError {
    #[error("division by zero in '{0}'")]
    DivisionByZero(String),
}

/// Errors from expanding a problem list such as `1-10 odds,12a-c`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProblemListError {
    #[error("only one range is allowed per comma-separated entry: '{0}'")]
    MultipleRanges(String),

    #[error("invalid problem number: '{0}'")]
    InvalidNumber(String),

    #[error("odds/evens cannot be combined with sub-part ranges: '{0}'")]
    PartsWithParity(String),

    #[error("range is reversed: '{0}'")]
    Reversed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_error_names_problem_and_grammar() {
        let err = GradeError::format("4", "7", "is numeric but not a ratio in (-1, 1)");
        let msg = err.to_string();
        assert!(msg.contains("problem 4"));
        assert!(msg.contains("'7'"));
        assert!(msg.contains("range NUMBER to NUMBER"));
        assert_eq!(err.problem(), "4");
    }

    #[test]
    fn stream_mismatch_message() {
        let err = GradeError::StreamMismatch {
            problem: "6".into(),
        };
        assert!(err.to_string().contains("fewer entries"));
        assert_eq!(err.problem(), "6");
    }
}
