use std::path::Path;

use anyhow::Result;
use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::areas::checkout::ClonedRepository;
use crate::artifacts::outcome::{CheckResult, Comparison};
use crate::commands::compare::{FormatComparison, compare_format};
use crate::projects::Project;

/// Run the chosen comparison against every target project.
///
/// Projects are dispatched concurrently, each against its own isolated
/// checkout under `cache`. A failing project is recorded in `errored` and
/// never aborts the batch; a cancelled one is dropped from the result with
/// a warning.
pub async fn run_check(
    baseline_executable: &Path,
    comparison_executable: &Path,
    targets: Vec<Project>,
    format_comparison: FormatComparison,
    cache: &Path,
    cancel: &CancellationToken,
) -> CheckResult {
    let tasks = targets.into_iter().map(|project| async move {
        let outcome = cancel
            .run_until_cancelled(check_project(
                baseline_executable,
                comparison_executable,
                &project,
                format_comparison,
                cache,
            ))
            .await;
        (project, outcome)
    });

    let outcomes = join_all(tasks).await;

    let mut result = CheckResult::default();
    for (project, outcome) in outcomes {
        match outcome {
            Some(Ok(comparison)) => {
                debug!("Finished checking {}", project.fullname());
                result.record_completed(project, comparison);
            }
            Some(Err(error)) => {
                warn!("Checking {} failed: {error:#}", project.fullname());
                result.record_errored(project, error);
            }
            None => warn!("Checking {} was cancelled", project.fullname()),
        }
    }
    result
}

async fn check_project(
    baseline_executable: &Path,
    comparison_executable: &Path,
    project: &Project,
    format_comparison: FormatComparison,
    cache: &Path,
) -> Result<Comparison> {
    let repo = ClonedRepository::clone(&project.repo, cache).await?;
    compare_format(
        baseline_executable,
        comparison_executable,
        &project.format_options,
        &repo,
        format_comparison,
    )
    .await
}
