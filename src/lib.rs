pub mod classify;
pub mod cli;
pub mod error;
pub mod formatters;
pub mod hook;
pub mod types_diff;
pub mod vcs;
