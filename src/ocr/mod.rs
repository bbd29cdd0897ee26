//! OCR and text extraction module.
//!
//! Extracts text from documents using:
//! - pdftoppm (Poppler) to rasterise single PDF pages
//! - Tesseract OCR to build searchable pages and to read raster images
//! - pdftotext (Poppler) to read the text layer of searchable pages
//! - lopdf to count pages without rendering anything
//!
//! PDFs go through [`IncrementalPdfOcr`], which stops as soon as the
//! caller's character budget is met.

mod backend;
mod image_ocr;
mod incremental;
mod pdf_utils;
mod tesseract;
mod tools;

pub use backend::{OcrBackend, OcrError};
pub use image_ocr::{
    decode_image, normalize_color, ocr_image_bytes, ImageText, NO_IMAGE_TEXT_WARNING,
};
pub use incremental::{
    AccumulatedResult, IncrementalPdfOcr, InvalidBudget, OcrBudget, PageOcrResult,
    DEFAULT_MAX_CHARS, NO_PDF_TEXT_WARNING, SAFETY_CAP,
};
pub use pdf_utils::{count_pages, count_pages_in_file};
pub use tesseract::TesseractBackend;
pub use tools::{check_binary, check_tools, REQUIRED_TOOLS};

#[cfg(test)]
pub(crate) use backend::testing::FakeBackend;
#[cfg(test)]
pub(crate) use image_ocr::png_bytes;
#[cfg(test)]
pub(crate) use pdf_utils::blank_pdf;
