#![allow(dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_fs::TempDir;
use assert_fs::prelude::{FileWriteStr, PathChild};

use ecosystem_check::areas::checkout::ClonedRepository;
use ecosystem_check::projects::RepoTarget;

/// A throwaway git repository holding template files, standing in for a
/// cloned corpus project.
#[derive(Debug)]
pub struct TestCheckout {
    pub temp_dir: TempDir,
}

impl TestCheckout {
    /// Initialize a repository containing `files` (path, content) pairs
    /// and a single initial commit.
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");

        for (path, content) in files {
            temp_dir
                .child(path)
                .write_str(content)
                .expect("failed to write file");
        }

        run_git(temp_dir.path(), &["init", "--initial-branch=main"]);
        run_git(temp_dir.path(), &["add", "."]);
        run_git(
            temp_dir.path(),
            &[
                "-c",
                "user.name=tester",
                "-c",
                "user.email=tester@localhost",
                "commit",
                "-m",
                "initial",
            ],
        );

        TestCheckout { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.path().join(path)).expect("failed to read file")
    }

    pub fn write(&self, path: &str, content: &str) {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("failed to write file");
    }

    /// Wrap this repository the way the harness wraps a fresh clone.
    pub async fn open(&self) -> ClonedRepository {
        ClonedRepository::open(
            RepoTarget::new("acme", "templates-demo", "main"),
            self.path().to_path_buf(),
        )
        .await
        .expect("failed to open checkout")
    }
}

/// Clone `upstream` into the cache slot the harness would reuse for
/// `target`, so a check can run against it without touching the network.
pub fn seed_cache(cache: &Path, target: &RepoTarget, upstream: &TestCheckout) {
    let destination = cache.join(format!("{}:{}", target.owner, target.name));
    run_git(
        cache,
        &[
            "clone",
            upstream.path().to_str().unwrap(),
            destination.to_str().unwrap(),
        ],
    );
}

fn run_git(cwd: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("failed to spawn git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Write an executable shell script into `dir` and return its path.
///
/// Scripts receive the real formatter command line, so `$@` starts with
/// `format --profile <p>` followed by the template files.
pub fn fake_formatter(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("failed to write script");
    let mut perms = std::fs::metadata(&path)
        .expect("failed to stat script")
        .permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("failed to chmod script");
    path
}

/// A formatter that rewrites the last line of every `.html` argument to
/// `marker`. Exits 1 when it changed anything, 0 otherwise.
pub fn last_line_formatter(dir: &Path, name: &str, marker: &str) -> PathBuf {
    let body = format!(
        r#"changed=0
for arg in "$@"; do
    case "$arg" in
        *.html)
            if [ "$(tail -n 1 "$arg")" != "{marker}" ]; then
                content="$(sed '$d' "$arg")"
                printf '%s\n{marker}\n' "$content" > "$arg"
                changed=1
            fi
            ;;
    esac
done
exit $changed"#
    );
    fake_formatter(dir, name, &body)
}

/// A formatter that appends `marker` once to every `.html` argument and is
/// a no-op afterwards. Exits 1 when it changed anything, 0 otherwise.
pub fn append_once_formatter(dir: &Path, name: &str, marker: &str) -> PathBuf {
    let body = format!(
        r#"changed=0
for arg in "$@"; do
    case "$arg" in
        *.html)
            if ! grep -q '{marker}' "$arg"; then
                printf '{marker}\n' >> "$arg"
                changed=1
            fi
            ;;
    esac
done
exit $changed"#
    );
    fake_formatter(dir, name, &body)
}

/// A formatter that prints `stderr` and exits with `code`.
pub fn failing_formatter(dir: &Path, name: &str, stderr: &str, code: i32) -> PathBuf {
    let body = format!("echo '{stderr}' >&2\nexit {code}");
    fake_formatter(dir, name, &body)
}
