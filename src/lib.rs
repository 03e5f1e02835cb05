//! Differential-testing harness for `djangofmt`.
//!
//! Runs two versions of the formatter (a baseline and a comparison
//! executable) against a corpus of real-world template-heavy repositories
//! and reports whether their output differs, including a bounded
//! fixed-point check that surfaces the exact regions that fail to
//! converge.

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod error;
pub mod projects;
