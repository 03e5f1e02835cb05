use std::collections::BTreeSet;
use std::fmt::Write;

use anyhow::Result;
use clap::ValueEnum;

use crate::artifacts::outcome::{CheckResult, Comparison};
use crate::projects::Project;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

/// Render a full check result in the requested format.
pub fn render(result: &CheckResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Markdown => Ok(markdown_format_result(result)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
    }
}

/// Render an ecosystem check result as markdown: a one-line summary, then
/// one collapsible block per project with changes and one per error.
pub fn markdown_format_result(result: &CheckResult) -> String {
    let mut lines: Vec<String> = Vec::new();

    let mut total_lines_added = 0;
    let mut total_lines_removed = 0;
    let mut projects_with_changes = 0;
    // Distinct (project, path) pairs: a file touched by several diffs of
    // the same comparison counts once.
    let mut modified_files: BTreeSet<(String, String)> = BTreeSet::new();
    let error_count = result.errored.len();

    for (project, comparison) in &result.completed {
        total_lines_added += comparison.diffs.lines_added();
        total_lines_removed += comparison.diffs.lines_removed();
        if !comparison.diffs.all_empty() {
            projects_with_changes += 1;
        }
        for path in comparison.diffs.modified_files() {
            modified_files.insert((project.fullname(), path));
        }
    }

    if total_lines_added == 0 && total_lines_removed == 0 && error_count == 0 {
        return "\u{2705} ecosystem check detected no format changes.".to_string();
    }

    if total_lines_added == 0 && total_lines_removed == 0 {
        // Only errors
        lines.push(format!(
            "\u{2139}\u{fe0f} ecosystem check **encountered format errors**. \
             (no format changes; {error_count} project error{})",
            plural(error_count),
        ));
    } else {
        let mut changes = format!(
            "+{total_lines_added} -{total_lines_removed} lines in {} file{} in \
             {projects_with_changes} projects",
            modified_files.len(),
            plural(modified_files.len()),
        );
        if error_count > 0 {
            write!(changes, "; {error_count} project error{}", plural(error_count)).unwrap();
        }
        let unchanged_projects = result.completed.len() - projects_with_changes;
        if unchanged_projects > 0 {
            write!(
                changes,
                "; {unchanged_projects} project{} unchanged",
                plural(unchanged_projects)
            )
            .unwrap();
        }
        lines.push(format!(
            "\u{2139}\u{fe0f} ecosystem check **detected format changes**. ({changes})"
        ));
    }

    lines.push(String::new());

    for (project, comparison) in &result.completed {
        if comparison.diffs.all_empty() {
            continue;
        }

        let files = comparison.diffs.modified_files().len();
        let title = format!(
            "+{} -{} lines across {files} file{}",
            comparison.diffs.lines_added(),
            comparison.diffs.lines_removed(),
            plural(files),
        );
        lines.extend(markdown_project_section(
            &title,
            &format_comparison_diffs(comparison),
            project,
        ));
    }

    for (project, error) in &result.errored {
        lines.extend(markdown_project_section(
            "error",
            &format!("```\n{:#}\n```", error),
            project,
        ));
    }

    lines.join("\n")
}

/// One collapsible per-project block, titled with the project link, the
/// formatter options used, and the change summary.
fn markdown_project_section(title: &str, content: &str, project: &Project) -> Vec<String> {
    vec![
        "<details>".to_string(),
        format!(
            "<summary><a href=\"{}\">{}</a> (<code>{}</code>): {title}</summary>",
            project.repo.url(),
            project.fullname(),
            project.format_options.to_args().join(" "),
        ),
        "<p>".to_string(),
        String::new(),
        content.to_string(),
        String::new(),
        "</p>".to_string(),
        "</details>".to_string(),
        String::new(),
    ]
}

/// Fenced diff blocks for every non-empty diff, one permalink per hunk
/// pointing at its source location in the project's repository.
fn format_comparison_diffs(comparison: &Comparison) -> String {
    let mut blocks: Vec<String> = Vec::new();

    for diff in comparison.diffs.iter() {
        if diff.is_empty() {
            continue;
        }
        for file in &diff.patch_set().files {
            for hunk in &file.hunks {
                let url = comparison.repo.url_for(&file.path, Some(hunk.source_start));
                blocks.push(format!("<a href=\"{url}\">{}:{}</a>", file.path, hunk.source_start));
                blocks.push(format!("```diff\n{}\n```", hunk.lines.join("\n")));
            }
        }
    }

    blocks.join("\n\n")
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}
