use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tokio::process::Command;
use tracing::debug;

use crate::artifacts::patch::{HunkDetail, PatchSet};
use crate::projects::RepoTarget;

/// Commit identity used for the snapshots the harness creates.
const COMMITTER_NAME: &str = "ecosystem-check";
const COMMITTER_EMAIL: &str = "ecosystem-check@localhost";

/// A checked-out clone of a target repository, driven through the system
/// `git` binary.
///
/// The harness owns the checkout for the duration of one project's
/// comparison: it commits formatter output, resets the working tree, and
/// queries diffs between the snapshots it created. The commit SHA captured
/// at checkout time anchors both `reset` and permalink resolution.
#[derive(Debug, Clone, Serialize)]
pub struct ClonedRepository {
    target: RepoTarget,
    path: PathBuf,
    /// HEAD as checked out, before any formatter ran.
    snapshot: String,
}

impl ClonedRepository {
    /// Clone `target` into `<cache>/<owner>:<name>`, reusing (and hard
    /// resetting) an existing checkout when present.
    pub async fn clone(target: &RepoTarget, cache: &Path) -> Result<Self> {
        let path = cache.join(format!("{}:{}", target.owner, target.name));

        if path.join(".git").is_dir() {
            debug!("Reusing cached checkout of {}", target.fullname());
            git(&path, &["fetch", "origin", &target.git_ref]).await?;
            git(&path, &["checkout", "-f", "FETCH_HEAD"]).await?;
            git(&path, &["clean", "-fdx"]).await?;
        } else {
            debug!("Cloning {}", target.fullname());
            let parent = path
                .parent()
                .context("cache directory has no parent")?
                .to_path_buf();
            tokio::fs::create_dir_all(&parent).await?;
            let url = target.url();
            let destination = path.to_string_lossy().into_owned();
            git(
                &parent,
                &[
                    "clone",
                    "--depth",
                    "1",
                    "--branch",
                    &target.git_ref,
                    &url,
                    &destination,
                ],
            )
            .await?;
        }

        Self::open(target.clone(), path).await
    }

    #[cfg(test)]
    pub(crate) fn for_tests(target: RepoTarget, path: PathBuf, snapshot: String) -> Self {
        ClonedRepository {
            target,
            path,
            snapshot,
        }
    }

    /// Wrap an existing checkout, capturing its HEAD as the snapshot.
    pub async fn open(target: RepoTarget, path: PathBuf) -> Result<Self> {
        let snapshot = git(&path, &["rev-parse", "HEAD"]).await?.trim().to_string();
        Ok(ClonedRepository {
            target,
            path,
            snapshot,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn fullname(&self) -> String {
        self.target.fullname()
    }

    pub fn target(&self) -> &RepoTarget {
        &self.target
    }

    /// Commit every pending change, returning the new HEAD SHA. Empty
    /// commits are allowed so a no-op formatter run still advances the
    /// revision window.
    pub async fn commit(&self, message: &str) -> Result<String> {
        let name = format!("user.name={COMMITTER_NAME}");
        let email = format!("user.email={COMMITTER_EMAIL}");
        git(
            &self.path,
            &[
                "-c",
                &name,
                "-c",
                &email,
                "commit",
                "-a",
                "--allow-empty",
                "-m",
                message,
            ],
        )
        .await?;

        Ok(git(&self.path, &["rev-parse", "HEAD"])
            .await?
            .trim()
            .to_string())
    }

    /// Restore every tracked file to its content as checked out, discarding
    /// uncommitted changes. HEAD is left untouched, so commits created since
    /// checkout stay resolvable for diff queries.
    pub async fn reset(&self) -> Result<()> {
        git(&self.path, &["checkout", &self.snapshot, "--", "."]).await?;
        Ok(())
    }

    /// Raw diff lines between `from` and `to`, or between `from` and the
    /// working tree when `to` is absent.
    pub async fn diff(&self, from: &str, to: Option<&str>) -> Result<Vec<String>> {
        let mut args = vec!["diff", from];
        if let Some(to) = to {
            args.push(to);
        }
        let output = git(&self.path, &args).await?;
        Ok(output.lines().map(str::to_string).collect())
    }

    /// The net diff for one tracked change region across `range`
    /// (e.g. `HEAD~4..HEAD`): the file's diff over the whole range, cut
    /// down to the hunks overlapping the region.
    pub async fn diff_for_hunk(&self, hunk: &HunkDetail, range: &str) -> Result<Vec<String>> {
        let output = git(&self.path, &["diff", range, "--", &hunk.path]).await?;
        let raw: Vec<String> = output.lines().map(str::to_string).collect();

        let patch = PatchSet::parse(&raw);
        let mut lines = Vec::new();
        for file in &patch.files {
            let kept: Vec<_> = file
                .hunks
                .iter()
                .filter(|candidate| candidate.overlaps(hunk.start, hunk.length))
                .collect();
            if kept.is_empty() {
                continue;
            }

            lines.push(format!("--- a/{}", file.path));
            lines.push(format!("+++ b/{}", file.path));
            for hunk in kept {
                lines.extend(hunk.lines.iter().cloned());
            }
        }

        Ok(lines)
    }

    /// GitHub permalink into the snapshot this comparison ran against.
    pub fn url_for(&self, path: &str, line: Option<usize>) -> String {
        let mut url = format!("{}/blob/{}/{path}", self.target.url(), self.snapshot);
        if let Some(line) = line {
            url.push_str(&format!("#L{line}"));
        }
        url
    }
}

/// Run a git subcommand in `cwd`, returning stdout. Non-zero exit becomes
/// an error carrying the captured stderr.
async fn git(cwd: &Path, args: &[&str]) -> Result<String> {
    debug!("git {}", args.join(" "));

    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .output()
        .await
        .with_context(|| format!("failed to spawn git {}", args.join(" ")))?;

    if !output.status.success() {
        bail!(
            "git {} failed with {}: {}",
            args.join(" "),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(String::from_utf8(output.stdout)?)
}
