//! Document extraction service.
//!
//! Turns a downloaded payload into text: classify it, then hand PDFs to the
//! incremental OCR driver, images to the image adapter, and return text
//! bodies as-is. Each call owns a private temporary directory that is
//! removed when the call returns, whatever the outcome.

use std::sync::Arc;

use serde::Serialize;
use tempfile::TempDir;
use thiserror::Error;

use crate::ocr::{
    ocr_image_bytes, AccumulatedResult, ImageText, IncrementalPdfOcr, OcrBackend, OcrBudget,
    OcrError, SAFETY_CAP,
};
use crate::utils::{ContentClassifier, ContentKind};

/// Errors that can occur while extracting text from a payload.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Downloaded file is empty")]
    EmptyDocument,

    #[error("Unsupported file type: {mime}")]
    Unsupported { mime: String },

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("OCR failed: {0}")]
    Ocr(OcrError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<OcrError> for ProcessError {
    fn from(e: OcrError) -> Self {
        match e {
            OcrError::MalformedDocument(msg) => ProcessError::MalformedDocument(msg),
            other => ProcessError::Ocr(other),
        }
    }
}

/// Text extracted from one document, shaped as the API returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages_processed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl Extraction {
    fn plain(text: String) -> Self {
        Self {
            text,
            pages_processed: None,
            total_pages: None,
            truncated: None,
            warning: None,
        }
    }
}

impl From<AccumulatedResult> for Extraction {
    fn from(result: AccumulatedResult) -> Self {
        Self {
            text: result.text,
            pages_processed: Some(result.pages_processed),
            total_pages: Some(result.total_pages),
            truncated: Some(result.truncated),
            warning: result.warning,
        }
    }
}

impl From<ImageText> for Extraction {
    fn from(result: ImageText) -> Self {
        Self {
            warning: result.warning,
            ..Self::plain(result.text)
        }
    }
}

/// Classifies payloads and routes them to the matching extraction path.
pub struct DocumentProcessor {
    backend: Arc<dyn OcrBackend>,
    classifier: ContentClassifier,
    page_cap: u32,
}

impl DocumentProcessor {
    pub fn new(backend: Arc<dyn OcrBackend>) -> Self {
        Self {
            backend,
            classifier: ContentClassifier::new(),
            page_cap: SAFETY_CAP,
        }
    }

    pub fn with_page_cap(mut self, page_cap: u32) -> Self {
        self.page_cap = page_cap;
        self
    }

    pub fn backend(&self) -> &dyn OcrBackend {
        self.backend.as_ref()
    }

    /// Extract text from a payload. Blocking: OCR engines run inline.
    pub fn process(&self, bytes: &[u8], budget: OcrBudget) -> Result<Extraction, ProcessError> {
        if bytes.is_empty() {
            return Err(ProcessError::EmptyDocument);
        }

        let classified = self.classifier.classify(bytes);
        tracing::info!(
            kind = classified.kind.id(),
            mime = %classified.mime,
            "Classified document"
        );

        match classified.kind {
            ContentKind::Pdf => self.process_pdf(bytes, budget),
            ContentKind::Image => self.process_image(bytes),
            ContentKind::Text => Ok(Extraction::plain(
                String::from_utf8_lossy(bytes).into_owned(),
            )),
            ContentKind::Unsupported => Err(ProcessError::Unsupported {
                mime: classified.mime,
            }),
        }
    }

    fn work_dir() -> Result<TempDir, ProcessError> {
        Ok(tempfile::Builder::new().prefix("doctext-").tempdir()?)
    }

    fn process_pdf(&self, bytes: &[u8], budget: OcrBudget) -> Result<Extraction, ProcessError> {
        let work_dir = Self::work_dir()?;
        let input = work_dir.path().join("input_file.pdf");
        std::fs::write(&input, bytes)?;

        let result = IncrementalPdfOcr::new(self.backend.as_ref())
            .with_page_cap(self.page_cap)
            .run(&input, budget, work_dir.path())?;
        Ok(result.into())
    }

    fn process_image(&self, bytes: &[u8]) -> Result<Extraction, ProcessError> {
        let work_dir = Self::work_dir()?;
        let result = ocr_image_bytes(self.backend.as_ref(), bytes, work_dir.path())?;
        Ok(result.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::{blank_pdf, png_bytes, FakeBackend, NO_IMAGE_TEXT_WARNING};
    use image::{DynamicImage, ImageBuffer, Rgb};

    fn processor(backend: FakeBackend) -> DocumentProcessor {
        DocumentProcessor::new(Arc::new(backend))
    }

    #[test]
    fn test_empty_payload() {
        let err = processor(FakeBackend::new())
            .process(b"", OcrBudget::default())
            .unwrap_err();
        assert!(matches!(err, ProcessError::EmptyDocument));
    }

    #[test]
    fn test_text_passes_through() {
        let extraction = processor(FakeBackend::new())
            .process(b"just some notes\n", OcrBudget::default())
            .unwrap();
        assert_eq!(extraction, Extraction::plain("just some notes\n".to_string()));

        let json = serde_json::to_value(&extraction).unwrap();
        assert_eq!(json, serde_json::json!({ "text": "just some notes\n" }));
    }

    #[test]
    fn test_pdf_reports_page_counts() {
        let backend = FakeBackend::new().with_pages(&["alpha ", "beta"]);
        let extraction = processor(backend)
            .process(&blank_pdf(2), OcrBudget::new(5).unwrap())
            .unwrap();

        assert_eq!(extraction.text, "alpha");
        assert_eq!(extraction.pages_processed, Some(1));
        assert_eq!(extraction.total_pages, Some(2));
        assert_eq!(extraction.truncated, Some(true));
        assert_eq!(extraction.warning, None);
    }

    #[test]
    fn test_pdf_page_cap_is_configurable() {
        let backend = FakeBackend::new().with_pages(&["a"; 6]);
        let extraction = processor(backend)
            .with_page_cap(4)
            .process(&blank_pdf(6), OcrBudget::default())
            .unwrap();
        assert_eq!(extraction.pages_processed, Some(4));
        assert_eq!(extraction.text, "aaaa");
    }

    #[test]
    fn test_image_without_text() {
        let png = png_bytes(DynamicImage::ImageRgb8(ImageBuffer::from_pixel(
            6,
            6,
            Rgb([255, 255, 255]),
        )));
        let extraction = processor(FakeBackend::new())
            .process(&png, OcrBudget::default())
            .unwrap();

        let json = serde_json::to_value(&extraction).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "text": "", "warning": NO_IMAGE_TEXT_WARNING })
        );
    }

    #[test]
    fn test_unsupported_binary() {
        let err = processor(FakeBackend::new())
            .process(&[0x00, 0x9f, 0x92, 0x96, 0xc3, 0x28], OcrBudget::default())
            .unwrap_err();
        assert!(matches!(err, ProcessError::Unsupported { .. }));
        assert!(err.to_string().starts_with("Unsupported file type"));
    }

    #[test]
    fn test_malformed_pdf() {
        let err = processor(FakeBackend::new())
            .process(b"%PDF-1.4\n%%EOF", OcrBudget::default())
            .unwrap_err();
        assert!(matches!(err, ProcessError::MalformedDocument(_)));
    }
}
