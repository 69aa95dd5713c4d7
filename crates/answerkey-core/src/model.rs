//! Core data model types for answerkey.
//!
//! An answer key holds one `ProblemSpec` per problem; each spec is an ordered
//! list of `AlternativeSpec`s. Grading one answer yields a `GradeResult`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::compiler::{split_alternatives, RawAlternative};
use crate::error::GradeError;
use crate::normalize::{is_numeric, parse_number};
use crate::traits::IdentityExpander;

/// Keyword that marks a tolerance tag.
const RANGE_KEYWORD: &str = "range";
/// Separates the bounds of a `range N to M` tag.
const RANGE_TO: &str = "to";

/// One accepted answer for a problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeSpec {
    /// The accepted answer text, before normalization.
    pub value: String,
    /// Whether `value` is a signed decimal number.
    pub is_numeric: bool,
    /// Fraction of the point value awarded on a match.
    pub partial_credit_ratio: f64,
    /// Smallest accepted distance from `value` for numeric answers.
    pub range_min: f64,
    /// Largest accepted distance from `value` for numeric answers.
    pub range_max: f64,
    /// Whether a range tag was given.
    #[serde(default)]
    pub has_range: bool,
    /// Feedback shown when this alternative is matched.
    #[serde(default)]
    pub auto_feedback: String,
}

impl AlternativeSpec {
    /// A full-credit alternative with no tags.
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            is_numeric: is_numeric(&value),
            value,
            partial_credit_ratio: 1.0,
            range_min: 0.0,
            range_max: 0.0,
            has_range: false,
            auto_feedback: String::new(),
        }
    }

    /// Classify the raw tags of one alternative.
    ///
    /// A tag containing `range` is a tolerance. Otherwise a number strictly
    /// inside (-1, 1) is a credit ratio, so an accepted answer can never be
    /// written as a second ratio-shaped value. Any other number is an error,
    /// and everything else is feedback.
    pub fn from_raw(problem: &str, raw: &RawAlternative) -> Result<Self, GradeError> {
        let mut alt = AlternativeSpec::new(raw.value.as_str());
        let mut feedback = Vec::new();

        for tag in &raw.tags {
            let lowered = tag.to_lowercase();
            if lowered.contains(RANGE_KEYWORD) {
                let (min, max) = parse_range(problem, tag, &lowered)?;
                alt.range_min = min;
                alt.range_max = max;
                alt.has_range = true;
            } else if let Some(number) = parse_number(tag) {
                if number > -1.0 && number < 1.0 {
                    alt.partial_credit_ratio = number;
                } else {
                    return Err(GradeError::format(
                        problem,
                        tag.as_str(),
                        "is numeric but is neither a range nor a credit ratio in (-1, 1)",
                    ));
                }
            } else {
                feedback.push(tag.as_str());
            }
        }

        alt.auto_feedback = feedback.join("; ");
        Ok(alt)
    }

    /// Full credit and no tolerance: eligible to be shown as "the" solution.
    pub fn is_full_credit(&self) -> bool {
        !self.has_range && self.partial_credit_ratio >= 1.0
    }
}

fn parse_range(problem: &str, tag: &str, lowered: &str) -> Result<(f64, f64), GradeError> {
    let bounds = lowered
        .split_once(RANGE_KEYWORD)
        .map(|(_, rest)| rest.trim())
        .unwrap_or_default();
    let bad_bound = |bound: &str| {
        GradeError::format(
            problem,
            tag,
            format!("has a range bound '{bound}' that is not a number"),
        )
    };
    let parse = |bound: &str| parse_number(bound).ok_or_else(|| bad_bound(bound));

    let words: Vec<&str> = bounds.split_whitespace().collect();
    match words.as_slice() {
        [max] => Ok((0.0, parse(*max)?)),
        [min, RANGE_TO, max] => Ok((parse(*min)?, parse(*max)?)),
        [] => Err(bad_bound("")),
        _ => Err(GradeError::format(
            problem,
            tag,
            "is not of the form 'range N' or 'range N to M'",
        )),
    }
}

/// The ordered alternatives accepted for one problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemSpec {
    /// Problem number as written in the answer key, e.g. `16a`.
    pub number: String,
    pub alternatives: Vec<AlternativeSpec>,
}

impl ProblemSpec {
    /// Parse a specification line (shorthand or canonical) for one problem.
    pub fn parse(number: impl Into<String>, line: &str) -> Result<Self, GradeError> {
        let number = number.into();
        let alternatives = split_alternatives(line, &IdentityExpander)
            .iter()
            .map(|raw| AlternativeSpec::from_raw(&number, raw))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            number,
            alternatives,
        })
    }

    /// The first full-credit alternative without a range tag.
    pub fn canonical_answer(&self) -> Option<&AlternativeSpec> {
        self.alternatives.iter().find(|alt| alt.is_full_credit())
    }
}

/// Outcome of grading one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeStatus {
    Correct,
    Partial,
    Incorrect,
}

impl fmt::Display for GradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradeStatus::Correct => write!(f, "Correct"),
            GradeStatus::Partial => write!(f, "Partial Credit"),
            GradeStatus::Incorrect => write!(f, "Incorrect"),
        }
    }
}

/// The graded result of one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeResult {
    pub status: GradeStatus,
    pub points_awarded: f64,
    pub max_points: f64,
    /// The student's answer after normalization.
    pub student_answer: String,
    /// The alternative that matched, if any.
    pub matched_alternative: Option<AlternativeSpec>,
    /// The value shown to students as the solution.
    pub canonical_answer: Option<String>,
    /// Feedback for the student.
    pub feedback_text: String,
    /// Problems met while grading that did not stop it.
    #[serde(default)]
    pub diagnostics: Vec<String>,
}

/// A graded problem within a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemResult {
    pub number: String,
    /// False when the student left the problem blank or never reached it.
    pub answered: bool,
    pub result: GradeResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> ProblemSpec {
        ProblemSpec::parse("1", line).unwrap()
    }

    #[test]
    fn tags_are_classified() {
        let spec = parse("50 ; range 1 ; 0.5 ; Forgot to divide by 2");
        let alt = &spec.alternatives[0];
        assert_eq!(alt.value, "50");
        assert!(alt.is_numeric);
        assert_eq!(alt.range_min, 0.0);
        assert_eq!(alt.range_max, 1.0);
        assert!(alt.has_range);
        assert_eq!(alt.partial_credit_ratio, 0.5);
        assert_eq!(alt.auto_feedback, "Forgot to divide by 2");
    }

    #[test]
    fn range_with_minimum() {
        let spec = parse("342.57 ; Range 1.0 to 5.0 ; 0.5");
        let alt = &spec.alternatives[0];
        assert_eq!((alt.range_min, alt.range_max), (1.0, 5.0));
    }

    #[test]
    fn zero_is_a_ratio() {
        let spec = parse("92;Multiplied by 2 instead of dividing;0.0");
        assert_eq!(spec.alternatives[0].partial_credit_ratio, 0.0);
        assert_eq!(
            spec.alternatives[0].auto_feedback,
            "Multiplied by 2 instead of dividing"
        );
    }

    #[test]
    fn negative_ratio_is_accepted() {
        let spec = parse("x ; -0.5");
        assert_eq!(spec.alternatives[0].partial_credit_ratio, -0.5);
    }

    #[test]
    fn numeric_tag_outside_ratio_range_is_format_error() {
        let err = ProblemSpec::parse("4", "50;7").unwrap_err();
        match err {
            GradeError::Format { problem, token, .. } => {
                assert_eq!(problem, "4");
                assert_eq!(token, "7");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(ProblemSpec::parse("4", "50 ; 1.0").is_err());
    }

    #[test]
    fn malformed_range_is_format_error() {
        assert!(ProblemSpec::parse("2", "5 ; range two").is_err());
        assert!(ProblemSpec::parse("2", "5 ; range").is_err());
        assert!(ProblemSpec::parse("2", "5 ; range 1 2 3").is_err());
    }

    #[test]
    fn multiple_feedback_tags_are_joined() {
        let spec = parse("7 ; Close ; Check your sign");
        assert_eq!(spec.alternatives[0].auto_feedback, "Close; Check your sign");
    }

    #[test]
    fn canonical_answer_skips_tagged_alternatives() {
        let spec = parse("92 ; 0.5 & 50 ; range 2 & 23 ; Nice work & 24");
        assert_eq!(spec.canonical_answer().unwrap().value, "23");
    }

    #[test]
    fn canonical_answer_may_be_missing() {
        let spec = parse("92 ; 0.5");
        assert!(spec.canonical_answer().is_none());
    }

    #[test]
    fn shorthand_groups_are_unrolled() {
        let spec = parse("(5, 4)|5,4 ; 0.5");
        assert_eq!(spec.alternatives.len(), 2);
        assert!(spec
            .alternatives
            .iter()
            .all(|a| a.partial_credit_ratio == 0.5));
    }

    #[test]
    fn status_display() {
        assert_eq!(GradeStatus::Correct.to_string(), "Correct");
        assert_eq!(GradeStatus::Partial.to_string(), "Partial Credit");
        assert_eq!(GradeStatus::Incorrect.to_string(), "Incorrect");
    }
}
