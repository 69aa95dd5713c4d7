//! Batch grading.
//!
//! Grades many submissions against one answer key with bounded parallelism.
//! Each submission is independent: an error in one never affects another.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::config::GradingConfig;
use crate::parser::{AnswerKey, Submission};
use crate::report::{BatchReport, GradeReport, SubmissionFailure};
use crate::submission::grade_submission;

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_graded(&self, report: &GradeReport);
    fn on_error(&self, student: &str, error: &str);
    fn on_complete(&self, graded: usize, failed: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_graded(&self, _: &GradeReport) {}
    fn on_error(&self, _: &str, _: &str) {}
    fn on_complete(&self, _: usize, _: usize, _: Duration) {}
}

/// Grades submissions concurrently, one blocking task per student.
pub struct BatchGrader {
    config: GradingConfig,
    parallelism: usize,
}

impl BatchGrader {
    pub fn new(config: GradingConfig, parallelism: usize) -> Self {
        Self {
            config,
            parallelism: parallelism.max(1),
        }
    }

    /// Grade every submission against `key`.
    pub async fn run(
        &self,
        assignment: &str,
        key: Arc<AnswerKey>,
        submissions: Vec<Submission>,
        progress: &dyn ProgressReporter,
    ) -> BatchReport {
        let start = Instant::now();
        let semaphore = Arc::new(Semaphore::new(self.parallelism));
        let mut futures = FuturesUnordered::new();

        for submission in submissions {
            let key = Arc::clone(&key);
            let semaphore = Arc::clone(&semaphore);
            let config = self.config;

            futures.push(async move {
                let student = submission.student.clone();
                let inner = async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|_| "semaphore closed".to_string())?;
                    let graded = tokio::task::spawn_blocking(move || {
                        grade_submission(&submission, &key, &config)
                    })
                    .await
                    .map_err(|e| format!("grading task failed: {e}"))?;
                    graded.map_err(|e| e.to_string())
                };
                (student, inner.await)
            });
        }

        let mut graded = Vec::new();
        let mut failures = Vec::new();

        while let Some((student, result)) = futures.next().await {
            match result {
                Ok(report) => {
                    progress.on_graded(&report);
                    graded.push(report);
                }
                Err(error) => {
                    tracing::error!("grading failed for {student}: {error}");
                    progress.on_error(&student, &error);
                    failures.push(SubmissionFailure { student, error });
                }
            }
        }

        graded.sort_by(|a, b| a.student.cmp(&b.student));
        failures.sort_by(|a, b| a.student.cmp(&b.student));

        let elapsed = start.elapsed();
        progress.on_complete(graded.len(), failures.len(), elapsed);

        BatchReport {
            id: Uuid::new_v4(),
            created_at: chrono::Utc::now(),
            assignment: assignment.to_string(),
            graded,
            failures,
            duration_ms: elapsed.as_millis() as u64,
        }
    }
}
