//! Grading engine.
//!
//! Matches one student answer against one `ProblemSpec`. Alternatives are
//! tried in author order and the first match wins.

use crate::config::{GradingConfig, ListMatchMode};
use crate::model::{AlternativeSpec, GradeResult, GradeStatus, ProblemSpec};
use crate::normalize::{normalize, parse_number, strip_whitespace};

/// Slack for representation error when comparing against a range bound.
const RANGE_EPSILON: f64 = 1e-9;

/// How an alternative matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchKind {
    Numeric,
    Exact,
    UnorderedList,
}

/// Grade one raw student answer against a problem specification.
///
/// Pure: the same spec, answer and config always give the same result.
pub fn grade_answer(spec: &ProblemSpec, raw_answer: &str, config: &GradingConfig) -> GradeResult {
    let student = normalize(raw_answer, config);
    let mut diagnostics = student.diagnostics;
    let canonical_answer = spec.canonical_answer().map(|alt| alt.value.clone());
    let max_points = config.default_point_value;

    for alt in &spec.alternatives {
        let accepted = normalize(&alt.value, config);
        diagnostics.extend(accepted.diagnostics);

        let Some(kind) = match_alternative(alt, &accepted.text, &student.text, config) else {
            continue;
        };
        tracing::debug!(
            problem = %spec.number,
            answer = %student.text,
            alternative = %alt.value,
            ?kind,
            "matched"
        );

        let status = if alt.partial_credit_ratio < 1.0 {
            GradeStatus::Partial
        } else {
            GradeStatus::Correct
        };
        return GradeResult {
            status,
            points_awarded: max_points * alt.partial_credit_ratio,
            max_points,
            student_answer: student.text,
            matched_alternative: Some(alt.clone()),
            canonical_answer,
            feedback_text: alt.auto_feedback.clone(),
            diagnostics,
        };
    }

    tracing::debug!(problem = %spec.number, answer = %student.text, "no alternative matched");
    let feedback_text = canonical_answer
        .as_deref()
        .map(|canonical| format!("Solution: {canonical}"))
        .unwrap_or_default();
    GradeResult {
        status: GradeStatus::Incorrect,
        points_awarded: 0.0,
        max_points,
        student_answer: student.text,
        matched_alternative: None,
        canonical_answer,
        feedback_text,
        diagnostics,
    }
}

fn match_alternative(
    alt: &AlternativeSpec,
    accepted: &str,
    student: &str,
    config: &GradingConfig,
) -> Option<MatchKind> {
    if let (Some(expected), Some(given)) = (parse_number(accepted), parse_number(student)) {
        return within_range(alt, (given - expected).abs()).then_some(MatchKind::Numeric);
    }

    if student == accepted {
        return Some(MatchKind::Exact);
    }

    if !config.list_order_matters
        && student.contains(',')
        && unordered_lists_match(student, accepted, config.list_match)
    {
        return Some(MatchKind::UnorderedList);
    }

    None
}

fn within_range(alt: &AlternativeSpec, distance: f64) -> bool {
    distance >= alt.range_min - RANGE_EPSILON && distance <= alt.range_max + RANGE_EPSILON
}

/// Compare comma-separated lists without regard to order.
fn unordered_lists_match(student: &str, accepted: &str, mode: ListMatchMode) -> bool {
    let split = |s: &str| -> Vec<String> { strip_whitespace(s).split(',').map(str::to_string).collect() };
    let mut student_items = split(student);
    let mut accepted_items = split(accepted);

    if student_items.is_empty() || student_items.len() != accepted_items.len() {
        return false;
    }

    match mode {
        ListMatchMode::Exact => {
            student_items.sort();
            accepted_items.sort();
            student_items == accepted_items
        }
        ListMatchMode::Contains => student_items
            .iter()
            .all(|item| accepted.contains(item.as_str())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(line: &str) -> ProblemSpec {
        ProblemSpec::parse("1", line).unwrap()
    }

    fn unordered() -> GradingConfig {
        GradingConfig {
            list_order_matters: false,
            ..GradingConfig::default()
        }
    }

    #[test]
    fn partial_credit_with_feedback() {
        let spec = spec(
            "23 & 92;Multiplied by 2 instead of dividing;0.0 & 17;Subtracted instead of added;0.5",
        );
        let config = GradingConfig {
            default_point_value: 4.0,
            ..GradingConfig::default()
        };
        let result = grade_answer(&spec, "17", &config);
        assert_eq!(result.status, GradeStatus::Partial);
        assert_eq!(result.points_awarded, 2.0);
        assert_eq!(result.max_points, 4.0);
        assert_eq!(result.feedback_text, "Subtracted instead of added");
        assert_eq!(result.canonical_answer.as_deref(), Some("23"));
    }

    #[test]
    fn zero_ratio_match_is_partial_with_no_points() {
        let spec = spec("23 & 92;Multiplied by 2 instead of dividing;0.0");
        let result = grade_answer(&spec, "92", &GradingConfig::default());
        assert_eq!(result.status, GradeStatus::Partial);
        assert_eq!(result.points_awarded, 0.0);
        assert_eq!(result.feedback_text, "Multiplied by 2 instead of dividing");
    }

    #[test]
    fn numeric_range_accepts_within_tolerance() {
        let spec = spec("342.57 ; range 1.0");
        let result = grade_answer(&spec, "342.00", &GradingConfig::default());
        assert_eq!(result.status, GradeStatus::Correct);
        assert_eq!(result.points_awarded, 1.0);
    }

    #[test]
    fn numeric_tolerance_is_symmetric() {
        let spec = spec("342.57 ; range 2");
        let config = GradingConfig::default();
        assert_eq!(grade_answer(&spec, "344.57", &config).status, GradeStatus::Correct);
        assert_eq!(grade_answer(&spec, "340.57", &config).status, GradeStatus::Correct);
        assert_eq!(grade_answer(&spec, "344.58", &config).status, GradeStatus::Incorrect);
        assert_eq!(grade_answer(&spec, "340.56", &config).status, GradeStatus::Incorrect);
    }

    #[test]
    fn range_with_minimum_excludes_the_centre() {
        let spec = spec("50 ; range 2 to 5 ; 0.5");
        let config = GradingConfig::default();
        assert_eq!(grade_answer(&spec, "50", &config).status, GradeStatus::Incorrect);
        assert_eq!(grade_answer(&spec, "53", &config).status, GradeStatus::Partial);
        assert_eq!(grade_answer(&spec, "45", &config).status, GradeStatus::Partial);
        assert_eq!(grade_answer(&spec, "56", &config).status, GradeStatus::Incorrect);
    }

    #[test]
    fn numeric_equality_ignores_formatting() {
        let spec = spec("23");
        assert_eq!(
            grade_answer(&spec, "23.0", &GradingConfig::default()).status,
            GradeStatus::Correct
        );
    }

    #[test]
    fn first_match_wins() {
        let spec = spec("50 ; range 5 ; 0.5 & 50");
        let result = grade_answer(&spec, "50", &GradingConfig::default());
        assert_eq!(result.status, GradeStatus::Partial);
        assert_eq!(result.points_awarded, 0.5);
    }

    #[test]
    fn lexical_match_is_case_and_space_insensitive() {
        let spec = spec("Rectangle & Parallelogram ; Not quite ; 0.5");
        let config = GradingConfig::default();
        assert_eq!(grade_answer(&spec, "RECTANGLE", &config).status, GradeStatus::Correct);
        assert_eq!(grade_answer(&spec, "para llelogram", &config).status, GradeStatus::Partial);
    }

    #[test]
    fn preserve_spacing_requires_same_spacing() {
        let spec = spec("x = 4");
        let config = GradingConfig {
            preserve_spacing: true,
            ..GradingConfig::default()
        };
        assert_eq!(grade_answer(&spec, "X = 4", &config).status, GradeStatus::Correct);
        assert_eq!(grade_answer(&spec, "x=4", &config).status, GradeStatus::Incorrect);
    }

    #[test]
    fn incorrect_surfaces_canonical_answer() {
        let spec = spec("17 ; 0.5 & 23");
        let result = grade_answer(&spec, "99", &GradingConfig::default());
        assert_eq!(result.status, GradeStatus::Incorrect);
        assert_eq!(result.points_awarded, 0.0);
        assert!(result.matched_alternative.is_none());
        assert_eq!(result.canonical_answer.as_deref(), Some("23"));
        assert_eq!(result.feedback_text, "Solution: 23");
    }

    #[test]
    fn fractions_convert_when_enabled() {
        let spec = spec("0.8");
        let on = GradingConfig::default();
        let off = GradingConfig {
            convert_fractions_to_decimals: false,
            ..GradingConfig::default()
        };
        let converted = grade_answer(&spec, "4/5", &on);
        assert_eq!(converted.status, GradeStatus::Correct);
        assert_eq!(converted.student_answer, "0.8");
        assert_eq!(grade_answer(&spec, "4/5", &off).status, GradeStatus::Incorrect);
    }

    #[test]
    fn fraction_and_decimal_key() {
        let spec = spec("4/5 & 0.8");
        assert_eq!(
            grade_answer(&spec, "0.8", &GradingConfig::default()).status,
            GradeStatus::Correct
        );
    }

    #[test]
    fn division_by_zero_is_a_diagnostic() {
        let spec = spec("5");
        let result = grade_answer(&spec, "5/0", &GradingConfig::default());
        assert_eq!(result.status, GradeStatus::Incorrect);
        assert_eq!(result.student_answer, "5/0");
        assert_eq!(result.diagnostics.len(), 1);
    }

    #[test]
    fn unordered_lists_when_enabled() {
        let spec = spec("4,5");
        let config = unordered();
        assert_eq!(grade_answer(&spec, "4,5", &config).status, GradeStatus::Correct);
        assert_eq!(grade_answer(&spec, "5, 4", &config).status, GradeStatus::Correct);
        assert_eq!(grade_answer(&spec, "5,4,4", &config).status, GradeStatus::Incorrect);
        assert_eq!(
            grade_answer(&spec, "5,4", &GradingConfig::default()).status,
            GradeStatus::Incorrect
        );
    }

    #[test]
    fn exact_list_mode_rejects_substrings() {
        let spec = spec("14,4");
        assert_eq!(grade_answer(&spec, "4,4", &unordered()).status, GradeStatus::Incorrect);
    }

    #[test]
    fn contains_list_mode_keeps_loose_matching() {
        let spec = spec("14,4");
        let config = GradingConfig {
            list_match: ListMatchMode::Contains,
            ..unordered()
        };
        assert_eq!(grade_answer(&spec, "4,4", &config).status, GradeStatus::Correct);
    }

    #[test]
    fn unordered_partial_credit() {
        let spec = spec("1/3, -7/2 & -1/3, 7/2 ; 0.5 ; Swap minus sign");
        let result = grade_answer(&spec, "7/2, -1/3", &unordered());
        assert_eq!(result.status, GradeStatus::Partial);
        assert_eq!(result.feedback_text, "Swap minus sign");
    }

    #[test]
    fn grading_is_deterministic() {
        let spec = spec("23 & 17 ; 0.5 ; Close");
        let config = GradingConfig::default();
        assert_eq!(
            grade_answer(&spec, "17", &config),
            grade_answer(&spec, "17", &config)
        );
    }
}
