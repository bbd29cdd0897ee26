//! OCR backend abstraction.
//!
//! The incremental PDF driver and the image adapter only talk to engines
//! through [`OcrBackend`], so the engine can be swapped (or faked in tests)
//! without touching the page-budget logic.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from OCR backends and PDF inspection.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Backend not available: {0}")]
    BackendNotAvailable(String),

    #[error("OCR failed: {0}")]
    OcrFailed(String),

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    ImageError(String),
}

/// Trait for OCR engines.
///
/// All methods are blocking; callers on an async runtime are expected to
/// run them inside `spawn_blocking`.
pub trait OcrBackend: Send + Sync {
    /// Short engine name used in logs.
    fn name(&self) -> &'static str;

    /// Check if this backend is available (binaries installed).
    fn is_available(&self) -> bool;

    /// Get a description of what's needed to make this backend available.
    fn availability_hint(&self) -> String;

    /// Extract text from a whole raster image.
    fn ocr_image(&self, image_path: &Path) -> Result<String, OcrError>;

    /// OCR exactly one page (1-based) of a PDF, writing a searchable
    /// single-page PDF into `work_dir` and returning its path.
    fn ocr_pdf_page(&self, pdf_path: &Path, page: u32, work_dir: &Path)
        -> Result<PathBuf, OcrError>;

    /// Read the text layer of a searchable PDF.
    fn extract_text_layer(&self, searchable_pdf: &Path) -> Result<String, OcrError>;
}
