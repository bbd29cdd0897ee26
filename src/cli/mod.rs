//! Command-line interface for doctext.

mod commands;

pub use commands::{is_verbose, run};
