//! PDF helpers: page rasterisation for OCR and container-level page counts.

use std::path::{Path, PathBuf};
use std::process::Command;

use lopdf::Document;

use super::backend::OcrError;
use super::tools::PDFTOPPM_NOT_FOUND;

/// Count the pages of a PDF held in memory.
///
/// Only the object graph is parsed; nothing is rendered or OCR'd.
pub fn count_pages(pdf_bytes: &[u8]) -> Result<u32, OcrError> {
    let doc = Document::load_mem(pdf_bytes)
        .map_err(|e| OcrError::MalformedDocument(e.to_string()))?;
    page_total(&doc)
}

/// Count the pages of a PDF on disk.
pub fn count_pages_in_file(pdf_path: &Path) -> Result<u32, OcrError> {
    let doc =
        Document::load(pdf_path).map_err(|e| OcrError::MalformedDocument(e.to_string()))?;
    page_total(&doc)
}

/// A document without a catalog has no page tree to count.
fn page_total(doc: &Document) -> Result<u32, OcrError> {
    doc.catalog()
        .map_err(|e| OcrError::MalformedDocument(format!("missing catalog: {}", e)))?;
    Ok(u32::try_from(doc.get_pages().len()).unwrap_or(u32::MAX))
}

/// Convert a PDF page to an image using pdftoppm.
///
/// Uses 300 DPI PNG output for optimal OCR quality.
pub fn pdf_page_to_image(
    pdf_path: &Path,
    page: u32,
    output_dir: &Path,
) -> Result<PathBuf, OcrError> {
    let page_str = page.to_string();
    let output_prefix = output_dir.join("page");

    let status = Command::new("pdftoppm")
        .args(["-png", "-r", "300", "-f", &page_str, "-l", &page_str])
        .arg(pdf_path)
        .arg(&output_prefix)
        .status();

    match status {
        Ok(s) if s.success() => find_page_image(output_dir, page)
            .ok_or_else(|| OcrError::OcrFailed(format!("No image generated for page {}", page))),
        Ok(_) => Err(OcrError::OcrFailed(format!(
            "pdftoppm failed to convert page {}",
            page
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(OcrError::BackendNotAvailable(
            PDFTOPPM_NOT_FOUND.to_string(),
        )),
        Err(e) => Err(OcrError::Io(e)),
    }
}

/// Find the image file for a specific page number.
///
/// pdftoppm names files like page-1.png, page-01.png, page-001.png; the
/// padding width follows the document's total page count.
pub fn find_page_image(temp_path: &Path, page_num: u32) -> Option<PathBuf> {
    (1..=6)
        .map(|digits| temp_path.join(format!("page-{:0width$}.png", page_num, width = digits)))
        .find(|path| path.exists())
}

/// Build an empty PDF with `pages` blank pages.
#[cfg(test)]
pub(crate) fn blank_pdf(pages: u32) -> Vec<u8> {
    use lopdf::{dictionary, Object};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let kids: Vec<Object> = (0..pages)
        .map(|_| {
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
            })
            .into()
        })
        .collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => i64::from(pages),
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}
