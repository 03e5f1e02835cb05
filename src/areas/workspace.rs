use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// File discovery inside one project checkout.
///
/// The formatter is only ever pointed at HTML files living below a
/// `*templates` directory (the `**/*templates/**/*.html` glob of the
/// original corpus definition), minus the project's exclusion list.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: &Path) -> Self {
        Workspace {
            root: root.to_path_buf(),
        }
    }

    /// Checkout-relative template paths, sorted for stable command lines.
    pub fn template_files(&self, exclude: &[String]) -> Vec<PathBuf> {
        let excluded: BTreeSet<&str> = exclude.iter().map(String::as_str).collect();

        WalkDir::new(&self.root)
            .into_iter()
            .filter_entry(|entry| entry.file_name() != ".git")
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative = entry.path().strip_prefix(&self.root).ok()?;
                is_template(relative).then(|| relative.to_path_buf())
            })
            .filter(|path| !excluded.contains(path.to_string_lossy().as_ref()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// True for `.html` files strictly below a directory whose name ends with
/// `templates`.
fn is_template(relative: &Path) -> bool {
    if relative.extension().is_none_or(|ext| ext != "html") {
        return false;
    }

    let mut components: Vec<_> = relative.components().collect();
    components.pop(); // the file itself
    components.iter().any(|component| {
        component
            .as_os_str()
            .to_string_lossy()
            .ends_with("templates")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;

    #[test]
    fn finds_html_below_templates_dirs_only() {
        let dir = TempDir::new().unwrap();
        dir.child("app/templates/index.html").write_str("").unwrap();
        dir.child("app/templates/sub/detail.html")
            .write_str("")
            .unwrap();
        dir.child("app/jinja_templates/page.html")
            .write_str("")
            .unwrap();
        dir.child("app/static/page.html").write_str("").unwrap();
        dir.child("app/templates/style.css").write_str("").unwrap();
        dir.child("templates.html").write_str("").unwrap();

        let files = Workspace::new(dir.path()).template_files(&[]);

        assert_eq!(
            files,
            vec![
                PathBuf::from("app/jinja_templates/page.html"),
                PathBuf::from("app/templates/index.html"),
                PathBuf::from("app/templates/sub/detail.html"),
            ]
        );
    }

    #[test]
    fn exclusions_are_subtracted() {
        let dir = TempDir::new().unwrap();
        dir.child("templates/a.html").write_str("").unwrap();
        dir.child("templates/b.html").write_str("").unwrap();

        let files =
            Workspace::new(dir.path()).template_files(&["templates/a.html".to_string()]);

        assert_eq!(files, vec![PathBuf::from("templates/b.html")]);
    }
}
