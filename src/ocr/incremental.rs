//! Incremental, character-budgeted PDF OCR.
//!
//! Pages are OCR'd one at a time in ascending order. Text accumulates until
//! the caller's character budget is met or the page cap is reached, so a
//! long scanned document only costs as many engine calls as the first
//! `max_chars` characters need.
//!
//! A page whose OCR fails contributes nothing but still counts as processed;
//! only an unreadable PDF container aborts the run.

use std::fmt;
use std::path::Path;

use super::backend::{OcrBackend, OcrError};
use super::pdf_utils;

/// Default ceiling on pages OCR'd per document.
pub const SAFETY_CAP: u32 = 10;

/// Default character budget when the caller gives none.
pub const DEFAULT_MAX_CHARS: usize = 1000;

pub const NO_PDF_TEXT_WARNING: &str = "No text could be extracted from the PDF";

/// A validated, positive character budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OcrBudget {
    max_chars: usize,
}

/// Rejected budget value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidBudget(pub i64);

impl fmt::Display for InvalidBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "max_chars must be a positive integer, got {}", self.0)
    }
}

impl std::error::Error for InvalidBudget {}

impl OcrBudget {
    pub fn new(max_chars: i64) -> Result<Self, InvalidBudget> {
        match usize::try_from(max_chars) {
            Ok(n) if n > 0 => Ok(Self { max_chars: n }),
            _ => Err(InvalidBudget(max_chars)),
        }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }
}

impl Default for OcrBudget {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

/// Outcome of OCR on a single page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOcrResult {
    /// Text layer of the page, possibly empty.
    Text(String),
    /// The engine failed on this page; the message is kept for logging.
    Failed(String),
}

impl PageOcrResult {
    fn text(&self) -> &str {
        match self {
            PageOcrResult::Text(text) => text,
            PageOcrResult::Failed(_) => "",
        }
    }
}

/// Text gathered across pages plus the bookkeeping the response reports.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccumulatedResult {
    pub text: String,
    /// Pages attempted before stopping, failed pages included.
    pub pages_processed: u32,
    /// Pages whose OCR produced a text layer.
    pub pages_succeeded: u32,
    pub total_pages: u32,
    pub truncated: bool,
    pub warning: Option<String>,
}

/// Running state while pages are being processed.
#[derive(Debug, Default)]
struct Accumulator {
    text: String,
    chars: usize,
    pages_processed: u32,
    pages_succeeded: u32,
}

impl Accumulator {
    fn push(&mut self, page: PageOcrResult) {
        self.pages_processed += 1;
        if let PageOcrResult::Text(_) = page {
            self.pages_succeeded += 1;
        }
        let text = page.text();
        self.chars += text.chars().count();
        self.text.push_str(text);
    }

    fn budget_met(&self, budget: OcrBudget) -> bool {
        self.chars >= budget.max_chars()
    }

    fn finish(mut self, total_pages: u32, budget: OcrBudget) -> AccumulatedResult {
        let truncated = self.chars > budget.max_chars();
        if truncated {
            truncate_chars(&mut self.text, budget.max_chars());
        }
        let warning = if self.text.trim().is_empty() {
            Some(NO_PDF_TEXT_WARNING.to_string())
        } else {
            None
        };

        AccumulatedResult {
            text: self.text,
            pages_processed: self.pages_processed,
            pages_succeeded: self.pages_succeeded,
            total_pages,
            truncated,
            warning,
        }
    }
}

/// Cut `text` down to its first `max_chars` characters.
fn truncate_chars(text: &mut String, max_chars: usize) {
    if let Some((idx, _)) = text.char_indices().nth(max_chars) {
        text.truncate(idx);
    }
}

/// Drives the per-page OCR loop for one document.
pub struct IncrementalPdfOcr<'a> {
    backend: &'a dyn OcrBackend,
    page_cap: u32,
}

impl<'a> IncrementalPdfOcr<'a> {
    pub fn new(backend: &'a dyn OcrBackend) -> Self {
        Self {
            backend,
            page_cap: SAFETY_CAP,
        }
    }

    /// Override the page ceiling.
    pub fn with_page_cap(mut self, page_cap: u32) -> Self {
        self.page_cap = page_cap;
        self
    }

    /// OCR `pdf_path` page by page until `budget` is met.
    ///
    /// Intermediate per-page outputs are written under `work_dir`, which the
    /// caller owns and removes.
    pub fn run(
        &self,
        pdf_path: &Path,
        budget: OcrBudget,
        work_dir: &Path,
    ) -> Result<AccumulatedResult, OcrError> {
        let total_pages = pdf_utils::count_pages_in_file(pdf_path)?;
        let page_limit = total_pages.min(self.page_cap);
        tracing::info!(
            total_pages,
            page_limit,
            max_chars = budget.max_chars(),
            backend = self.backend.name(),
            "Starting incremental PDF OCR"
        );

        let mut acc = Accumulator::default();
        for page in 1..=page_limit {
            acc.push(self.ocr_page(pdf_path, page, work_dir));
            if acc.budget_met(budget) {
                tracing::debug!(page, chars = acc.chars, "Character budget met");
                break;
            }
        }

        let result = acc.finish(total_pages, budget);
        tracing::info!(
            pages_processed = result.pages_processed,
            pages_succeeded = result.pages_succeeded,
            truncated = result.truncated,
            "Incremental PDF OCR finished"
        );
        if result.warning.is_some() {
            tracing::warn!("{}", NO_PDF_TEXT_WARNING);
        }
        Ok(result)
    }

    /// OCR one page, folding any engine failure into the page result.
    fn ocr_page(&self, pdf_path: &Path, page: u32, work_dir: &Path) -> PageOcrResult {
        let text = self
            .backend
            .ocr_pdf_page(pdf_path, page, work_dir)
            .and_then(|searchable| self.backend.extract_text_layer(&searchable));

        match text {
            Ok(text) => {
                tracing::debug!(page, chars = text.chars().count(), "Page OCR complete");
                PageOcrResult::Text(text)
            }
            Err(e) => {
                tracing::warn!("OCR failed for page {}: {}", page, e);
                PageOcrResult::Failed(e.to_string())
            }
        }
    }
}
