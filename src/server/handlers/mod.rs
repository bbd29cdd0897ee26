//! HTTP request handlers for the web server.

mod documents;
mod health;

// Re-export handlers for use by the router
pub use documents::process_document;
pub use health::health;
