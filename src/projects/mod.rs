//! Target projects and their per-project formatter configuration
//!
//! A check runs against a curated corpus of open-source repositories that
//! make heavy use of Django/Jinja templates. Each entry pins a git ref and
//! may exclude files the formatter is known to choke on.

pub mod defaults;

use serde::Serialize;

/// A GitHub repository pinned to a branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoTarget {
    pub owner: String,
    pub name: String,
    pub git_ref: String,
}

impl RepoTarget {
    pub fn new(owner: &str, name: &str, git_ref: &str) -> Self {
        RepoTarget {
            owner: owner.to_string(),
            name: name.to_string(),
            git_ref: git_ref.to_string(),
        }
    }

    pub fn fullname(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    pub fn url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.name)
    }
}

/// The formatter profile to pass to the executables under test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Django,
    Jinja,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Django => "django",
            Profile::Jinja => "jinja",
        }
    }
}

/// Immutable formatter configuration for one project. Turned into the
/// command line via [`FormatOptions::to_args`]; never mutated after
/// construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormatOptions {
    pub profile: Profile,
    /// Comma-separated extra block names the formatter should treat as
    /// block tags.
    pub custom_blocks: Option<String>,
    /// Checkout-relative paths to leave out of the formatted file set.
    pub exclude: Vec<String>,
    pub preview: bool,
}

impl FormatOptions {
    /// Arguments preceding the file list when invoking a formatter.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "format".to_string(),
            "--profile".to_string(),
            self.profile.as_str().to_string(),
        ];
        if let Some(blocks) = &self.custom_blocks {
            args.push("--custom-blocks".to_string());
            args.push(blocks.clone());
        }
        if self.preview {
            args.push("--preview".to_string());
        }
        args
    }
}

/// One corpus entry: a repository plus the options to format it with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub repo: RepoTarget,
    pub format_options: FormatOptions,
}

impl Project {
    pub fn new(repo: RepoTarget) -> Self {
        Project {
            repo,
            format_options: FormatOptions::default(),
        }
    }

    pub fn with_options(repo: RepoTarget, format_options: FormatOptions) -> Self {
        Project {
            repo,
            format_options,
        }
    }

    /// Copy of this project with the formatter's preview mode forced on.
    pub fn with_preview_enabled(&self) -> Self {
        let mut project = self.clone();
        project.format_options.preview = true;
        project
    }

    pub fn fullname(&self) -> String {
        self.repo.fullname()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_args_minimal() {
        let options = FormatOptions::default();
        assert_eq!(options.to_args(), vec!["format", "--profile", "django"]);
    }

    #[test]
    fn to_args_with_custom_blocks_and_preview() {
        let options = FormatOptions {
            profile: Profile::Jinja,
            custom_blocks: Some("cache,flatblock".to_string()),
            exclude: vec!["templates/skip.html".to_string()],
            preview: true,
        };
        assert_eq!(
            options.to_args(),
            vec![
                "format",
                "--profile",
                "jinja",
                "--custom-blocks",
                "cache,flatblock",
                "--preview",
            ]
        );
    }

    #[test]
    fn preview_is_forced_without_touching_the_original() {
        let project = Project::new(RepoTarget::new("django", "django", "main"));
        let forced = project.with_preview_enabled();
        assert!(forced.format_options.preview);
        assert!(!project.format_options.preview);
    }
}
