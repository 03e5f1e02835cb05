mod common;

use std::path::Path;

use tokio_util::sync::CancellationToken;

use ecosystem_check::commands::check::run_check;
use ecosystem_check::commands::compare::FormatComparison;
use ecosystem_check::projects::{Project, RepoTarget};

use common::{TestCheckout,fake_formatter, seed_cache};

#[tokio::test]
async fn a_broken_project_is_recorded_without_aborting_the_batch() {
    let cache = assert_fs::TempDir::new().unwrap();
    let scripts = assert_fs::TempDir::new().unwrap();

    let good_upstream =
        TestCheckout::with_files(&[("templates/index.html", "<p>fine</p>\n")]);
    let bad_upstream = TestCheckout::with_files(&[
        ("templates/index.html", "<p>fine</p>\n"),
        ("BROKEN_TOOLCHAIN", ""),
    ]);

    let good = Project::new(RepoTarget::new("acme", "good", "main"));
    let bad = Project::new(RepoTarget::new("acme", "bad", "main"));
    seed_cache(cache.path(), &good.repo, &good_upstream);
    seed_cache(cache.path(), &bad.repo, &bad_upstream);

    // Crashes only inside the checkout carrying the marker file.
    let formatter = fake_formatter(
        scripts.path(),
        "formatter",
        "if [ -e BROKEN_TOOLCHAIN ]; then echo 'tool exploded' >&2; exit 2; fi\nexit 0",
    );

    let cancel = CancellationToken::new();
    let result = run_check(
        &formatter,
        &formatter,
        vec![good, bad],
        FormatComparison::BaseAndComp,
        cache.path(),
        &cancel,
    )
    .await;

    assert_eq!(result.completed.len(), 1);
    assert_eq!(result.completed[0].0.fullname(), "acme/good");
    assert!(result.completed[0].1.diffs.all_empty());
    assert_eq!(result.errored.len(), 1);
    assert_eq!(result.errored[0].0.fullname(), "acme/bad");
    assert!(format!("{:#}", result.errored[0].1).contains("tool exploded"));
}

#[tokio::test]
async fn cancelled_projects_are_omitted_not_half_recorded() {
    let cache = assert_fs::TempDir::new().unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let targets = vec![
        Project::new(RepoTarget::new("acme", "never-touched", "main")),
        Project::new(RepoTarget::new("acme", "also-skipped", "main")),
    ];
    let result = run_check(
        Path::new("/nonexistent/baseline"),
        Path::new("/nonexistent/comparison"),
        targets,
        FormatComparison::BaseAndComp,
        cache.path(),
        &cancel,
    )
    .await;

    assert!(result.completed.is_empty());
    assert!(result.errored.is_empty());
}
