//! doctext - text extraction from remote documents.
//!
//! Downloads a document by URL, detects whether it is a PDF, an image or
//! plain text, and returns its text. Scanned PDFs are OCR'd page by page
//! only until a caller-supplied character budget is met.

pub mod cli;
pub mod config;
pub mod http_client;
pub mod ocr;
pub mod server;
pub mod services;
pub mod utils;
