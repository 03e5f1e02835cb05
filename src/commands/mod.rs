//! Check command implementations
//!
//! - `compare`: the comparison strategies driving two formatter
//!   executables over one checkout
//! - `check`: the corpus-level driver dispatching one comparison per
//!   project and aggregating the outcome

pub mod check;
pub mod compare;
