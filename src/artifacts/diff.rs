use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use crate::artifacts::patch::PatchSet;

/// A unified diff for a whole project or a single hunk.
///
/// The raw lines are kept as captured; the added/removed content lines are
/// derived once at construction and never recomputed. A line counts as
/// added/removed only if it starts with `+`/`-` followed by exactly
/// `leading_spaces` spaces and is not a `+++`/`---` patch header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diff {
    lines: Vec<String>,
    added: Vec<String>,
    removed: Vec<String>,
}

impl Diff {
    pub fn new(lines: Vec<String>) -> Self {
        Self::with_leading_spaces(lines, 0)
    }

    /// Build a diff from text that is itself wrapped in `leading_spaces`
    /// columns of indentation (e.g. a diff quoted inside another diff).
    pub fn with_leading_spaces(lines: Vec<String>, leading_spaces: usize) -> Self {
        let added = content_lines(&lines, '+', "+++", leading_spaces);
        let removed = content_lines(&lines, '-', "---", leading_spaces);

        Diff {
            lines,
            added,
            removed,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn lines_added(&self) -> usize {
        self.added.len()
    }

    pub fn lines_removed(&self) -> usize {
        self.removed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    pub fn patch_set(&self) -> PatchSet {
        PatchSet::parse(&self.lines)
    }
}

impl Serialize for Diff {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.lines.len()))?;
        for line in &self.lines {
            seq.serialize_element(line)?;
        }
        seq.end()
    }
}

fn content_lines(
    lines: &[String],
    marker: char,
    header: &str,
    leading_spaces: usize,
) -> Vec<String> {
    let prefix = format!("{}{}", marker, " ".repeat(leading_spaces));

    lines
        .iter()
        .filter(|line| line.starts_with(&prefix) && !line.starts_with(header))
        .map(|line| line[prefix.len()..].to_string())
        .collect()
}

/// The ordered diffs produced by one comparison, with aggregate accessors.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diffs(pub Vec<Diff>);

impl Diffs {
    pub fn all_empty(&self) -> bool {
        self.0.iter().all(Diff::is_empty)
    }

    pub fn lines_added(&self) -> usize {
        self.0.iter().map(Diff::lines_added).sum()
    }

    pub fn lines_removed(&self) -> usize {
        self.0.iter().map(Diff::lines_removed).sum()
    }

    /// Distinct paths touched across all diffs. A file appearing in several
    /// diffs counts once.
    pub fn modified_files(&self) -> std::collections::BTreeSet<String> {
        self.0
            .iter()
            .flat_map(|diff| {
                diff.patch_set()
                    .files
                    .into_iter()
                    .map(|file| file.path)
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diff> {
        self.0.iter()
    }
}

impl From<Vec<Diff>> for Diffs {
    fn from(diffs: Vec<Diff>) -> Self {
        Diffs(diffs)
    }
}
