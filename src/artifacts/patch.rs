use serde::Serialize;

/// The minimal identity of a patch hunk: two hunks are the same change
/// region iff path, starting line and length all match, regardless of
/// content. Used as a deduplication key across a revision range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct HunkDetail {
    pub path: String,
    pub start: usize,
    pub length: usize,
}

/// One contiguous change region within a file's diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub source_start: usize,
    pub source_length: usize,
    pub target_start: usize,
    pub target_length: usize,
    /// Raw lines, hunk header included.
    pub lines: Vec<String>,
}

impl Hunk {
    pub fn detail(&self, path: &str) -> HunkDetail {
        HunkDetail {
            path: path.to_string(),
            start: self.source_start,
            length: self.source_length,
        }
    }

    /// Whether this hunk's source range intersects `[start, start + length)`.
    pub fn overlaps(&self, start: usize, length: usize) -> bool {
        // Zero-length ranges (pure insertions) anchor at their start line.
        let this_end = self.source_start + self.source_length.max(1);
        let other_end = start + length.max(1);
        self.source_start < other_end && start < this_end
    }
}

/// A parsed file section of a unified diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchedFile {
    pub path: String,
    pub hunks: Vec<Hunk>,
}

/// A structured view over raw unified-diff text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchSet {
    pub files: Vec<PatchedFile>,
}

impl PatchSet {
    /// Parse `git diff` output into file sections and hunks. Header lines
    /// (`index`, `---`, `+++`, mode changes) are consumed but not kept
    /// outside the raw hunk lines.
    pub fn parse(lines: &[String]) -> PatchSet {
        let mut files: Vec<PatchedFile> = Vec::new();
        let mut current_file: Option<PatchedFile> = None;
        let mut current_hunk: Option<Hunk> = None;

        for line in lines {
            if line.starts_with("diff --git") {
                flush(&mut files, &mut current_file, &mut current_hunk);
                current_file = Some(PatchedFile {
                    path: path_from_header(line),
                    hunks: Vec::new(),
                });
                continue;
            }

            if line.starts_with("@@") {
                push_hunk(&mut current_file, &mut current_hunk);
                current_hunk = parse_hunk_header(line);
                continue;
            }

            if let Some(hunk) = current_hunk.as_mut() {
                match line.chars().next() {
                    Some('+' | '-' | ' ' | '\\') | None => hunk.lines.push(line.clone()),
                    // Anything else ends the hunk (trailing file metadata).
                    _ => push_hunk(&mut current_file, &mut current_hunk),
                }
            }
        }

        flush(&mut files, &mut current_file, &mut current_hunk);
        PatchSet { files }
    }

    /// All hunk identities in this patch set, in file order.
    pub fn hunk_details(&self) -> Vec<HunkDetail> {
        self.files
            .iter()
            .flat_map(|file| file.hunks.iter().map(|hunk| hunk.detail(&file.path)))
            .collect()
    }
}

fn push_hunk(current_file: &mut Option<PatchedFile>, current_hunk: &mut Option<Hunk>) {
    if let Some(hunk) = current_hunk.take() {
        if let Some(file) = current_file.as_mut() {
            file.hunks.push(hunk);
        }
    }
}

fn flush(
    files: &mut Vec<PatchedFile>,
    current_file: &mut Option<PatchedFile>,
    current_hunk: &mut Option<Hunk>,
) {
    push_hunk(current_file, current_hunk);
    if let Some(file) = current_file.take() {
        files.push(file);
    }
}

/// Extract the new path from a `diff --git a/PATH b/PATH` line.
///
/// For in-place formatting both paths are identical, so the payload is
/// `2 * len(PATH) + 3` characters; validating that both halves match guards
/// against paths containing ` b/`. Renames fall back to the last ` b/` split.
fn path_from_header(line: &str) -> String {
    let Some(after_a) = line.strip_prefix("diff --git a/") else {
        return line.rsplit(" b/").next().unwrap_or("").to_string();
    };

    let path_len = (after_a.len().saturating_sub(3)) / 2;
    if path_len > 0
        && after_a.len() >= path_len + 3
        && after_a.get(..path_len) == after_a.get(path_len + 3..)
    {
        after_a[..path_len].to_string()
    } else {
        after_a.rsplit(" b/").next().unwrap_or("").to_string()
    }
}

/// Parse a hunk header like `@@ -10,4 +10,15 @@ <section>`.
fn parse_hunk_header(line: &str) -> Option<Hunk> {
    let after_first = line.strip_prefix("@@ ")?;
    let end_idx = after_first.find(" @@")?;
    let range_str = &after_first[..end_idx];

    let mut parts = range_str.split_whitespace();
    let (source_start, source_length) = parse_range(parts.next()?.strip_prefix('-')?)?;
    let (target_start, target_length) = parse_range(parts.next()?.strip_prefix('+')?)?;

    Some(Hunk {
        source_start,
        source_length,
        target_start,
        target_length,
        lines: vec![line.to_string()],
    })
}

/// Parse `start,count` or bare `start` (count defaults to 1).
fn parse_range(s: &str) -> Option<(usize, usize)> {
    match s.split_once(',') {
        Some((start, count)) => Some((start.parse().ok()?, count.parse().ok()?)),
        None => Some((s.parse().ok()?, 1)),
    }
}
