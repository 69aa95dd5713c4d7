//! Grading a whole submission against an answer key.
//!
//! The two files are walked in lockstep, one line from each per problem.

use chrono::Utc;
use uuid::Uuid;

use crate::config::GradingConfig;
use crate::engine::grade_answer;
use crate::error::GradeError;
use crate::model::{GradeResult, GradeStatus, ProblemResult, ProblemSpec};
use crate::parser::{AnswerKey, NumberedLine, Submission};
use crate::report::GradeReport;

/// Grade one student's submission.
///
/// Fails if a consumed answer-key line is malformed or if the answer key
/// has fewer lines than the submission. A short submission is not an
/// error: the remaining problems count toward the maximum as unanswered.
pub fn grade_submission(
    submission: &Submission,
    key: &AnswerKey,
    config: &GradingConfig,
) -> Result<GradeReport, GradeError> {
    let answers = crate::parser::parse_numbered_lines(&submission.text);
    let mut solutions = key.lines.iter();
    let mut problems = Vec::with_capacity(key.len());

    for answer in &answers {
        let Some(solution) = solutions.next() else {
            return Err(GradeError::StreamMismatch {
                problem: answer.number.clone(),
            });
        };
        if answer.number != solution.number {
            tracing::warn!(
                "{}: answer numbered {} is graded against answer-key problem {}",
                submission.student,
                answer.number,
                solution.number
            );
        }

        let spec = ProblemSpec::parse(solution.number.as_str(), &solution.text)?;
        if answer.text.is_empty() {
            problems.push(unanswered(&spec, config));
            continue;
        }

        problems.push(ProblemResult {
            number: answer.number.clone(),
            answered: true,
            result: grade_answer(&spec, &answer.text, config),
        });
    }

    for solution in solutions {
        problems.push(unanswered_line(solution, config));
    }

    let total_points = problems.iter().map(|p| p.result.points_awarded).sum();
    let max_points = problems.iter().map(|p| p.result.max_points).sum();

    Ok(GradeReport {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        student: submission.student.clone(),
        problems,
        total_points,
        max_points,
    })
}

fn unanswered(spec: &ProblemSpec, config: &GradingConfig) -> ProblemResult {
    let canonical_answer = spec.canonical_answer().map(|alt| alt.value.clone());
    ProblemResult {
        number: spec.number.clone(),
        answered: false,
        result: GradeResult {
            status: GradeStatus::Incorrect,
            points_awarded: 0.0,
            max_points: config.default_point_value,
            student_answer: String::new(),
            matched_alternative: None,
            feedback_text: canonical_answer
                .as_deref()
                .map(|canonical| format!("Solution: {canonical}"))
                .unwrap_or_default(),
            canonical_answer,
            diagnostics: Vec::new(),
        },
    }
}

/// A trailing answer-key line the student never reached. Not matched, so a
/// malformed tag here is only logged.
fn unanswered_line(solution: &NumberedLine, config: &GradingConfig) -> ProblemResult {
    match ProblemSpec::parse(solution.number.as_str(), &solution.text) {
        Ok(spec) => unanswered(&spec, config),
        Err(e) => {
            tracing::warn!("{e}");
            unanswered(
                &ProblemSpec {
                    number: solution.number.clone(),
                    alternatives: Vec::new(),
                },
                config,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "\
1. 23 & 92;Multiplied by 2 instead of dividing;0.0 & 17;Subtracted instead of added;0.5
2. Rectangle & Rect & Square; Can't be a square; 0.5
3. 4/5 & 0.8
4. (4, 5) & 5, 4 | (5, 4) ; Values are switched! ; 0.5
5. 342.57 ; range 1.0 & 342.57 ; range 1.0 to 5.0 ; 0.5 ; Didn't multiply by acceleration?
";

    fn grade(student: &str) -> Result<GradeReport, GradeError> {
        grade_submission(
            &Submission::new("Alice", student),
            &AnswerKey::parse(KEY),
            &GradingConfig::default(),
        )
    }

    #[test]
    fn full_submission() {
        let report = grade("1. 23\n2. rect\n3. 4/5\n4. (5,4)\n5. 345.00\n").unwrap();
        let statuses: Vec<GradeStatus> = report.problems.iter().map(|p| p.result.status).collect();
        assert_eq!(
            statuses,
            vec![
                GradeStatus::Correct,
                GradeStatus::Correct,
                GradeStatus::Correct,
                GradeStatus::Partial,
                GradeStatus::Partial,
            ]
        );
        assert_eq!(report.total_points, 4.0);
        assert_eq!(report.max_points, 5.0);
    }

    #[test]
    fn short_submission_counts_remaining_problems() {
        let report = grade("1. 23\n2. \n").unwrap();
        assert_eq!(report.problems.len(), 5);
        assert_eq!(report.total_points, 1.0);
        assert_eq!(report.max_points, 5.0);
        assert!(!report.problems[1].answered);
        assert!(!report.problems[4].answered);
        assert_eq!(report.problems[2].result.canonical_answer.as_deref(), Some("4/5"));
    }

    #[test]
    fn longer_submission_is_a_stream_mismatch() {
        let err = grade("1. 1\n2. 2\n3. 3\n4. 4\n5. 5\n6. 6\n").unwrap_err();
        assert_eq!(
            err,
            GradeError::StreamMismatch {
                problem: "6".into()
            }
        );
    }

    #[test]
    fn malformed_tag_aborts_with_problem_number() {
        let key = AnswerKey::parse("1. 12\n2. 50;7\n");
        let err = grade_submission(
            &Submission::new("Bob", "1. 12\n2. 50\n"),
            &key,
            &GradingConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, GradeError::Format { ref problem, .. } if problem == "2"));
    }

    #[test]
    fn malformed_tag_beyond_the_submission_is_not_fatal() {
        let key = AnswerKey::parse("1. 12\n2. 50;7\n");
        let report = grade_submission(
            &Submission::new("Bob", "1. 12\n"),
            &key,
            &GradingConfig::default(),
        )
        .unwrap();
        assert_eq!(report.max_points, 2.0);
        assert_eq!(report.total_points, 1.0);
    }

    #[test]
    fn point_value_scales_totals() {
        let config = GradingConfig {
            default_point_value: 2.0,
            ..GradingConfig::default()
        };
        let report = grade_submission(
            &Submission::new("Alice", "1. 17\n"),
            &AnswerKey::parse(KEY),
            &config,
        )
        .unwrap();
        assert_eq!(report.total_points, 1.0);
        assert_eq!(report.max_points, 10.0);
    }
}
