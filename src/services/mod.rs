//! Service layer for doctext business logic.
//!
//! This module contains domain logic separated from transport concerns.
//! Services are used by both the CLI and the web server.

pub mod extract;

pub use extract::{DocumentProcessor, Extraction, ProcessError};
