//! The `answerkey grade` command.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use answerkey_core::batch::{BatchGrader, ProgressReporter};
use answerkey_core::config::load_config_from;
use answerkey_core::model::GradeStatus;
use answerkey_core::parser::{AnswerKey, Submission};
use answerkey_core::report::{fmt_points, BatchReport, GradeReport};
use answerkey_report::html::write_html_report;

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_graded(&self, report: &GradeReport) {
        eprintln!(
            "  Graded: {} {} / {}",
            report.student,
            fmt_points(report.total_points),
            fmt_points(report.max_points)
        );
    }

    fn on_error(&self, student: &str, error: &str) {
        eprintln!("  ERROR: {student}: {error}");
    }

    fn on_complete(&self, graded: usize, failed: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {graded} graded, {failed} failed ({:.1}s)",
            elapsed.as_secs_f64()
        );
    }
}

/// Assignment name from an answer-key path: `Solutions_HW1.txt` gives `HW1`.
pub fn assignment_name(solution: &Path) -> String {
    let stem = solution
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    stem.strip_prefix("Solutions_")
        .map(str::to_string)
        .unwrap_or(stem)
}

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    solution: PathBuf,
    students: Vec<PathBuf>,
    parallelism: Option<usize>,
    output: Option<PathBuf>,
    format: Option<String>,
    no_results_file: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let parallelism = parallelism.unwrap_or(config.parallelism);
    anyhow::ensure!(parallelism >= 1, "parallelism must be at least 1");
    let output = output.unwrap_or_else(|| config.output_dir.clone());

    let formats: Vec<String> = match format.as_deref() {
        None => Vec::new(),
        Some("all") => vec!["json".into(), "html".into()],
        Some(list) => list.split(',').map(|f| f.trim().to_string()).collect(),
    };
    for fmt in &formats {
        anyhow::ensure!(
            fmt == "json" || fmt == "html",
            "unknown format '{fmt}' (expected json, html, or all)"
        );
    }

    let key = Arc::new(AnswerKey::load(&solution)?);
    anyhow::ensure!(
        !key.is_empty(),
        "answer key {} has no problems",
        solution.display()
    );
    let assignment = assignment_name(&solution);

    // Student name -> file stem, for naming grade files.
    let mut stems: HashMap<String, String> = HashMap::new();
    let mut submissions = Vec::new();
    for path in &students {
        if path == &solution {
            tracing::warn!("skipping answer key passed as a student file: {}", path.display());
            continue;
        }
        let submission = match Submission::load(path) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("skipping {}: {e:#}", path.display());
                continue;
            }
        };
        if stems.contains_key(&submission.student) {
            tracing::warn!(
                "skipping {}: another file already belongs to {}",
                path.display(),
                submission.student
            );
            continue;
        }
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| submission.student.clone());
        stems.insert(submission.student.clone(), stem);
        submissions.push(submission);
    }
    anyhow::ensure!(!submissions.is_empty(), "no student files to grade");

    eprintln!(
        "answerkey v{}: grading {} submissions for {} ({} problems)",
        env!("CARGO_PKG_VERSION"),
        submissions.len(),
        assignment,
        key.len()
    );
    eprintln!();

    let grader = BatchGrader::new(config.grading, parallelism);
    let report = grader
        .run(&assignment, key, submissions, &ConsoleReporter)
        .await;

    print_summary(&report);

    if !no_results_file && config.create_results_file {
        for graded in &report.graded {
            let stem = stems
                .get(&graded.student)
                .cloned()
                .unwrap_or_else(|| graded.student.clone());
            let path = output.join(format!("{stem}_Grade.txt"));
            graded.save_text(&path)?;
            tracing::debug!("wrote {}", path.display());
        }
        if !report.graded.is_empty() {
            eprintln!("Grade files saved to: {}", output.display());
        }
    }

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
    for fmt in &formats {
        match fmt.as_str() {
            "json" => {
                let path = output.join(format!("report-{assignment}-{timestamp}.json"));
                report.save_json(&path)?;
                eprintln!("Results saved to: {}", path.display());
            }
            "html" => {
                let path = output.join(format!("report-{assignment}-{timestamp}.html"));
                write_html_report(&report, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            _ => {}
        }
    }

    if !report.failures.is_empty() {
        anyhow::bail!(
            "{} submission(s) could not be graded",
            report.failures.len()
        );
    }

    Ok(())
}

fn print_summary(report: &BatchReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "Student",
        "Score",
        "Percent",
        "Correct",
        "Partial",
        "Incorrect",
    ]);

    for graded in &report.graded {
        table.add_row(vec![
            Cell::new(&graded.student),
            Cell::new(format!(
                "{} / {}",
                fmt_points(graded.total_points),
                fmt_points(graded.max_points)
            )),
            Cell::new(format!("{:.1}%", graded.percentage() * 100.0)),
            Cell::new(graded.count(GradeStatus::Correct)),
            Cell::new(graded.count(GradeStatus::Partial)),
            Cell::new(graded.count(GradeStatus::Incorrect)),
        ]);
    }

    for failure in &report.failures {
        table.add_row(vec![
            Cell::new(&failure.student),
            Cell::new("ERROR"),
            Cell::new("-"),
            Cell::new("-"),
            Cell::new("-"),
            Cell::new("-"),
        ]);
    }

    println!("{table}");
}
