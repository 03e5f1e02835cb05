//! Stateful collaborators a check runs against
//!
//! This module contains the components that touch the filesystem and the
//! system `git` binary:
//!
//! - `checkout`: cloned repository checkouts and their snapshot operations
//!   (commit, reset, diff, per-hunk diff, permalinks)
//! - `workspace`: template file discovery inside a checkout

pub mod checkout;
pub mod workspace;
