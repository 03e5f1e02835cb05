//! Data structures and pure algorithms
//!
//! This module contains the value types a check produces and consumes:
//!
//! - `diff`: unified-diff text with derived added/removed line counts
//! - `patch`: structured parsing of diff text into files and hunks, and
//!   the hunk identity used for convergence tracking
//! - `outcome`: per-project comparisons and the aggregate check result
//! - `report`: markdown and JSON rendering of a check result

pub mod diff;
pub mod outcome;
pub mod patch;
pub mod report;
