use std::collections::HashSet;
use std::path::Path;
use std::process::Stdio;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::ValueEnum;
use futures::future::try_join_all;
use tokio::process::Command;
use tracing::debug;

use crate::areas::checkout::ClonedRepository;
use crate::areas::workspace::Workspace;
use crate::artifacts::diff::{Diff, Diffs};
use crate::artifacts::outcome::Comparison;
use crate::artifacts::patch::HunkDetail;
use crate::error::ToolError;
use crate::projects::FormatOptions;

/// The strategies for comparing two formatter executables over one
/// checkout. New strategies are added as variants, never by branching on
/// strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FormatComparison {
    /// Run the baseline, reset, run the comparison: checks changes in
    /// behavior when formatting unformatted code.
    #[default]
    BaseAndComp,
    /// Run the baseline, then the comparison on top of it: checks for
    /// changes in behavior when formatting previously formatted code.
    BaseThenComp,
    /// Alternate baseline and comparison twice, tracking the regions that
    /// keep changing: checks that formatting converges.
    BaseThenCompConverge,
}

/// Run one comparison strategy for a single project, producing its diffs.
pub async fn compare_format(
    baseline_executable: &Path,
    comparison_executable: &Path,
    options: &FormatOptions,
    repo: &ClonedRepository,
    format_comparison: FormatComparison,
) -> Result<Comparison> {
    let diffs = match format_comparison {
        FormatComparison::BaseAndComp => vec![
            format_and_format(baseline_executable, comparison_executable, options, repo).await?,
        ],
        FormatComparison::BaseThenComp => vec![
            format_then_format(baseline_executable, comparison_executable, options, repo).await?,
        ],
        FormatComparison::BaseThenCompConverge => {
            format_then_format_converge(baseline_executable, comparison_executable, options, repo)
                .await?
        }
    };

    Ok(Comparison {
        diffs: Diffs(diffs),
        repo: repo.clone(),
    })
}

/// Baseline and comparison both format the original tree; the diff is the
/// divergence between their outputs.
async fn format_and_format(
    baseline_executable: &Path,
    comparison_executable: &Path,
    options: &FormatOptions,
    repo: &ClonedRepository,
) -> Result<Diff> {
    format(baseline_executable, options, repo).await?;
    let commit = repo
        .commit(&format!(
            "Formatted with baseline {}",
            baseline_executable.display()
        ))
        .await?;

    // Bring the tree back to its pre-baseline content; the commit stays
    // resolvable for the diff below.
    repo.reset().await?;
    format(comparison_executable, options, repo).await?;

    Ok(Diff::new(repo.diff(&commit, None).await?))
}

/// The comparison formats a tree the baseline already formatted; the diff
/// is anything it still wants to change.
async fn format_then_format(
    baseline_executable: &Path,
    comparison_executable: &Path,
    options: &FormatOptions,
    repo: &ClonedRepository,
) -> Result<Diff> {
    format(baseline_executable, options, repo).await?;
    let commit = repo
        .commit(&format!(
            "Formatted with baseline {}",
            baseline_executable.display()
        ))
        .await?;

    format(comparison_executable, options, repo).await?;

    Ok(Diff::new(repo.diff(&commit, None).await?))
}

/// Bounded fixed-point check: alternate [baseline, comparison] twice,
/// committing after each run. The first two runs only establish the
/// formatted state; any region still changing in runs 3 or 4 is tracked by
/// identity and re-queried for its net drift across the whole window.
async fn format_then_format_converge(
    baseline_executable: &Path,
    comparison_executable: &Path,
    options: &FormatOptions,
    repo: &ClonedRepository,
) -> Result<Vec<Diff>> {
    let executables = [
        baseline_executable,
        comparison_executable,
        baseline_executable,
        comparison_executable,
    ];

    let mut hunk_details: HashSet<HunkDetail> = HashSet::new();
    for (i, executable) in executables.iter().enumerate() {
        let run = i + 1;
        format(executable, options, repo).await?;
        let commit = repo
            .commit(&format!("Formatted with {} - #{run}", executable.display()))
            .await?;

        // Skip the two warm-up runs that are just setting the baseline.
        if run > 2 {
            let parent = format!("{commit}^");
            let diff = Diff::new(repo.diff(&parent, Some(&commit)).await?);
            if !diff.is_empty() {
                hunk_details.extend(diff.patch_set().hunk_details());
            }
        }
    }

    if hunk_details.is_empty() {
        return Ok(vec![]);
    }

    debug!("Processing hunks {hunk_details:?}");
    let range = format!("HEAD~{}..HEAD", executables.len());
    let queries = hunk_details
        .iter()
        .map(|hunk_detail| repo.diff_for_hunk(hunk_detail, &range));
    let results = try_join_all(queries).await?;

    Ok(results
        .into_iter()
        .filter(|lines| !lines.is_empty())
        .map(Diff::new)
        .collect())
}

/// Run one formatter executable over the project's template files,
/// mutating them in place.
///
/// Exit codes 0 and 1 are both success (no changes / changes made); any
/// other exit surfaces the captured stderr as a [`ToolError`] and is never
/// retried.
async fn format(
    executable: &Path,
    options: &FormatOptions,
    repo: &ClonedRepository,
) -> Result<Vec<String>> {
    let files = Workspace::new(repo.path()).template_files(&options.exclude);
    debug!(
        "Formatting {} with cmd {} ({} files)",
        repo.fullname(),
        executable.display(),
        files.len()
    );
    if !options.exclude.is_empty() {
        debug!("Excluding {:?}", options.exclude);
    }

    let start = Instant::now();
    let output = Command::new(executable)
        .args(options.to_args())
        .args(&files)
        .current_dir(repo.path())
        .stdin(Stdio::null())
        .output()
        .await
        .with_context(|| format!("failed to spawn {}", executable.display()))?;

    debug!(
        "Finished formatting {} with {} in {:.2?}",
        repo.fullname(),
        executable.display(),
        start.elapsed()
    );

    match output.status.code() {
        Some(0 | 1) => Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_string)
            .collect()),
        code => Err(ToolError::new(
            code,
            String::from_utf8_lossy(&output.stderr).into_owned(),
        )
        .into()),
    }
}
