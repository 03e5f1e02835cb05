use thiserror::Error;

/// A defect reported by a formatter executable under test.
///
/// Exit codes 0 (no changes) and 1 (changes made) are the formatter's
/// normal outcomes; anything else means the tool itself broke and the
/// comparison for that project is abandoned without retry. The captured
/// stderr is kept verbatim for the report.
#[derive(Debug, Error)]
#[error("{stderr}")]
pub struct ToolError {
    pub exit_code: Option<i32>,
    pub stderr: String,
}

impl ToolError {
    pub fn new(exit_code: Option<i32>, stderr: impl Into<String>) -> Self {
        ToolError {
            exit_code,
            stderr: stderr.into(),
        }
    }
}
