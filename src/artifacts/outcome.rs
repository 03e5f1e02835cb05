use serde::Serialize;
use serde::ser::{SerializeSeq, SerializeStruct, Serializer};

use crate::areas::checkout::ClonedRepository;
use crate::artifacts::diff::Diffs;
use crate::projects::Project;

/// The completed comparison for a single project: its diffs plus the
/// repository snapshot used to resolve hyperlinks.
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub diffs: Diffs,
    pub repo: ClonedRepository,
}

/// The outcome of a full check across the corpus. Built once per run,
/// immutable afterwards, and the sole input to reporting.
#[derive(Debug, Default)]
pub struct CheckResult {
    pub completed: Vec<(Project, Comparison)>,
    pub errored: Vec<(Project, anyhow::Error)>,
}

impl CheckResult {
    pub fn record_completed(&mut self, project: Project, comparison: Comparison) {
        self.completed.push((project, comparison));
    }

    pub fn record_errored(&mut self, project: Project, error: anyhow::Error) {
        self.errored.push((project, error));
    }
}

impl Serialize for CheckResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Errors are not serializable as-is; flatten them to their display
        // chain so the JSON output mirrors the markdown error blocks.
        struct Errored<'a>(&'a [(Project, anyhow::Error)]);

        impl Serialize for Errored<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
                for (project, error) in self.0 {
                    seq.serialize_element(&(project, format!("{error:#}")))?;
                }
                seq.end()
            }
        }

        let mut state = serializer.serialize_struct("CheckResult", 2)?;
        state.serialize_field("completed", &self.completed)?;
        state.serialize_field("errored", &Errored(&self.errored))?;
        state.end()
    }
}
