//! Default corpus for ecosystem checks.

use crate::projects::{FormatOptions, Profile, Project, RepoTarget};

/// The curated set of template-heavy projects every check runs against.
pub fn default_targets() -> Vec<Project> {
    vec![
        // Jinja templates
        Project::with_options(
            RepoTarget::new("zulip", "zulip", "main"),
            FormatOptions {
                profile: Profile::Jinja,
                ..FormatOptions::default()
            },
        ),
        Project::with_options(
            RepoTarget::new("cookiecutter", "cookiecutter-django", "master"),
            FormatOptions {
                profile: Profile::Jinja,
                exclude: vec![
                    // Conditionals using raw tags, see markup_fmt#97
                    "{{cookiecutter.project_slug}}/{{cookiecutter.project_slug}}/templates/allauth/elements/button.html".to_string(),
                    "{{cookiecutter.project_slug}}/{{cookiecutter.project_slug}}/templates/allauth/layouts/entrance.html".to_string(),
                    "{{cookiecutter.project_slug}}/{{cookiecutter.project_slug}}/templates/base.html".to_string(),
                    "{{cookiecutter.project_slug}}/{{cookiecutter.project_slug}}/templates/users/user_detail.html".to_string(),
                    "{{cookiecutter.project_slug}}/{{cookiecutter.project_slug}}/templates/users/user_form.html".to_string(),
                ],
                ..FormatOptions::default()
            },
        ),
        // Django templates
        Project::new(RepoTarget::new("django", "django", "main")),
        Project::new(RepoTarget::new("sissbruecker", "linkding", "master")),
        Project::with_options(
            RepoTarget::new("saleor", "saleor", "main"),
            FormatOptions {
                exclude: vec![
                    // Fails to parse <a href={% url "api" %} target="_blank">
                    "templates/home/index.html".to_string(),
                ],
                ..FormatOptions::default()
            },
        ),
        Project::with_options(
            RepoTarget::new("silentsokolov", "django-admin-rangefilter", "master"),
            FormatOptions {
                exclude: vec![
                    // Django comments, djangofmt#8
                    "rangefilter/templates/rangefilter/date_range_quick_select_list_filter.html"
                        .to_string(),
                ],
                ..FormatOptions::default()
            },
        ),
        Project::new(RepoTarget::new(
            "carltongibson",
            "django-template-partials",
            "main",
        )),
        Project::with_options(
            RepoTarget::new("django-import-export", "django-import-export", "main"),
            FormatOptions {
                exclude: vec![
                    // markup_fmt#98
                    "import_export/templates/admin/import_export/export.html".to_string(),
                ],
                ..FormatOptions::default()
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_target_pins_a_ref() {
        for project in default_targets() {
            assert!(!project.repo.git_ref.is_empty(), "{}", project.fullname());
        }
    }

    #[test]
    fn excludes_are_checkout_relative() {
        for project in default_targets() {
            for path in &project.format_options.exclude {
                assert!(!path.starts_with('/'), "{path}");
            }
        }
    }
}
