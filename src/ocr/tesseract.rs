//! Tesseract OCR backend implementation.
//!
//! Pages are rasterised with pdftoppm, turned into a searchable single-page
//! PDF by Tesseract's `pdf` renderer, and read back with pdftotext.

use std::path::{Path, PathBuf};
use std::process::Command;

use super::backend::{OcrBackend, OcrError};
use super::pdf_utils;
use super::tools::{check_binary, PDFTOTEXT_NOT_FOUND, TESSERACT_NOT_FOUND};

/// Map a finished command to its stdout, or to the matching `OcrError`.
fn handle_cmd_output(
    result: std::io::Result<std::process::Output>,
    not_found: &str,
    error_prefix: &str,
) -> Result<String, OcrError> {
    match result {
        Ok(output) if output.status.success() => {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        }
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(OcrError::OcrFailed(format!("{}: {}", error_prefix, stderr.trim())))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(OcrError::BackendNotAvailable(not_found.to_string()))
        }
        Err(e) => Err(OcrError::Io(e)),
    }
}

/// Tesseract OCR backend.
#[derive(Debug, Clone)]
pub struct TesseractBackend {
    language: String,
}

impl TesseractBackend {
    /// Create a backend for the given Tesseract language (e.g. "eng").
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

impl Default for TesseractBackend {
    fn default() -> Self {
        Self::new("eng")
    }
}

impl OcrBackend for TesseractBackend {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn is_available(&self) -> bool {
        check_binary("tesseract") && check_binary("pdftoppm") && check_binary("pdftotext")
    }

    fn availability_hint(&self) -> String {
        if !check_binary("tesseract") {
            "Tesseract not installed. Install with: apt install tesseract-ocr".to_string()
        } else if !check_binary("pdftoppm") || !check_binary("pdftotext") {
            "Poppler tools not installed. Install with: apt install poppler-utils".to_string()
        } else {
            "Tesseract is available".to_string()
        }
    }

    fn ocr_image(&self, image_path: &Path) -> Result<String, OcrError> {
        let output = Command::new("tesseract")
            .arg(image_path)
            .arg("stdout")
            .args(["-l", &self.language])
            .output();

        handle_cmd_output(output, TESSERACT_NOT_FOUND, "tesseract failed")
    }

    fn ocr_pdf_page(
        &self,
        pdf_path: &Path,
        page: u32,
        work_dir: &Path,
    ) -> Result<PathBuf, OcrError> {
        let page_dir = work_dir.join(format!("page-{}", page));
        std::fs::create_dir_all(&page_dir)?;

        let image_path = pdf_utils::pdf_page_to_image(pdf_path, page, &page_dir)?;

        // Tesseract appends ".pdf" to the output base itself.
        let output_base = page_dir.join("searchable");
        let output = Command::new("tesseract")
            .arg(&image_path)
            .arg(&output_base)
            .args(["-l", &self.language, "pdf"])
            .output();
        handle_cmd_output(
            output,
            TESSERACT_NOT_FOUND,
            &format!("tesseract failed on page {}", page),
        )?;

        let searchable = output_base.with_extension("pdf");
        if !searchable.exists() {
            return Err(OcrError::OcrFailed(format!(
                "No searchable output generated for page {}",
                page
            )));
        }
        Ok(searchable)
    }

    fn extract_text_layer(&self, searchable_pdf: &Path) -> Result<String, OcrError> {
        let output = Command::new("pdftotext")
            .args(["-layout", "-enc", "UTF-8"])
            .arg(searchable_pdf)
            .arg("-")
            .output();

        let text = handle_cmd_output(output, PDFTOTEXT_NOT_FOUND, "pdftotext failed")?;
        // pdftotext terminates every page with a form feed.
        Ok(text.trim_end_matches('\u{c}').to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_language() {
        assert_eq!(TesseractBackend::default().language(), "eng");
        assert_eq!(TesseractBackend::new("deu").language(), "deu");
    }

    #[test]
    fn test_handle_cmd_output_not_found() {
        let err = handle_cmd_output(
            Err(std::io::Error::from(std::io::ErrorKind::NotFound)),
            TESSERACT_NOT_FOUND,
            "tesseract failed",
        )
        .unwrap_err();
        assert!(matches!(err, OcrError::BackendNotAvailable(msg) if msg == TESSERACT_NOT_FOUND));
    }

    #[test]
    fn test_missing_pdf_is_not_a_panic() {
        let temp = tempfile::TempDir::new().unwrap();
        let backend = TesseractBackend::default();
        let result = backend.ocr_pdf_page(&temp.path().join("missing.pdf"), 1, temp.path());
        assert!(result.is_err());
    }
}
