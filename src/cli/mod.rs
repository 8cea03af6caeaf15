//! Command-line interface for unitag.
//!
//! Thin layer over [`crate::metadata`]: parses arguments, merges them with
//! the config file and prints results.

mod commands;

pub use commands::{Cli, Commands, RatingArgs, parse_assignment, run_command};
