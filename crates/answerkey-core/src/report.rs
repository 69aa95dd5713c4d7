//! Grade report types with text rendering and JSON persistence.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{GradeStatus, ProblemResult};

/// One student's graded submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the submission was graded.
    pub created_at: DateTime<Utc>,
    pub student: String,
    /// Results in answer-key order.
    pub problems: Vec<ProblemResult>,
    pub total_points: f64,
    pub max_points: f64,
}

impl GradeReport {
    /// Fraction of the maximum earned, in `[0, 1]` for non-negative credit.
    pub fn percentage(&self) -> f64 {
        if self.max_points == 0.0 {
            0.0
        } else {
            self.total_points / self.max_points
        }
    }

    /// Count problems with the given status.
    pub fn count(&self, status: GradeStatus) -> usize {
        self.problems
            .iter()
            .filter(|p| p.result.status == status)
            .count()
    }

    /// Render the plain-text grade file handed back to the student.
    pub fn to_text(&self) -> String {
        let mut out = format!("{}:\n", self.student);

        for problem in &self.problems {
            let result = &problem.result;
            let solution = result.canonical_answer.as_deref().unwrap_or_default();
            // Writing to a String cannot fail.
            let _ = match result.status {
                GradeStatus::Correct => writeln!(out, "{}. Correct", problem.number),
                GradeStatus::Partial => writeln!(
                    out,
                    "{}. XXX Partial Credit: {}/{}. Student answer: {}, Solution: {}. {}",
                    problem.number,
                    fmt_points(result.points_awarded),
                    fmt_points(result.max_points),
                    result.student_answer,
                    solution,
                    result.feedback_text
                ),
                GradeStatus::Incorrect => writeln!(
                    out,
                    "{}. XXX Incorrect: 0/{}. Student answer: {}, Solution: {}",
                    problem.number,
                    fmt_points(result.max_points),
                    result.student_answer,
                    solution
                ),
            };
        }

        let _ = write!(
            out,
            "\nScore: {} / {}",
            fmt_points(self.total_points),
            fmt_points(self.max_points)
        );
        out
    }

    /// Write the text grade file.
    pub fn save_text(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_text())
            .with_context(|| format!("failed to write grade file to {}", path.display()))?;
        Ok(())
    }
}

/// Format points with at least one decimal place: `1.0`, `0.5`, `0.33`.
pub fn fmt_points(points: f64) -> String {
    let mut text = format!("{points:.2}");
    while text.ends_with('0') && !text.ends_with(".0") {
        text.pop();
    }
    if text == "-0.0" {
        text.remove(0);
    }
    text
}

/// A student whose submission could not be graded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionFailure {
    pub student: String,
    pub error: String,
}

/// The outcome of grading many submissions against one answer key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Assignment name, usually the answer-key file stem.
    pub assignment: String,
    /// Graded submissions, sorted by student.
    pub graded: Vec<GradeReport>,
    /// Submissions that stopped with an error, sorted by student.
    pub failures: Vec<SubmissionFailure>,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl BatchReport {
    /// Mean percentage across graded submissions.
    pub fn mean_percentage(&self) -> f64 {
        if self.graded.is_empty() {
            return 0.0;
        }
        self.graded.iter().map(GradeReport::percentage).sum::<f64>() / self.graded.len() as f64
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: BatchReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}
