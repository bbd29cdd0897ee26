//! External tool discovery for the Poppler/Tesseract toolchain.

pub const PDFTOPPM_NOT_FOUND: &str = "pdftoppm not found (install poppler-utils)";
pub const PDFTOTEXT_NOT_FOUND: &str = "pdftotext not found (install poppler-utils)";
pub const TESSERACT_NOT_FOUND: &str = "tesseract not found (install tesseract-ocr)";

/// Binaries the default backend shells out to.
pub const REQUIRED_TOOLS: &[&str] = &["pdftoppm", "pdftotext", "tesseract"];

/// Check if a binary is available in PATH.
pub fn check_binary(name: &str) -> bool {
    which::which(name).is_ok()
}

/// Availability of every required tool, in a stable order.
pub fn check_tools() -> Vec<(String, bool)> {
    REQUIRED_TOOLS
        .iter()
        .map(|tool| (tool.to_string(), check_binary(tool)))
        .collect()
}
