//! Content classification by byte signature.
//!
//! The remote server's Content-Type header is never consulted. MIME types
//! come from an ordered chain of sniffers: the first one that recognises
//! the bytes wins, and a sniffer that panics is treated as not recognising
//! them.

use std::panic::{catch_unwind, AssertUnwindSafe};

/// MIME reported when no sniffer recognises the bytes.
pub const UNKNOWN_MIME: &str = "application/octet-stream";

/// What the pipeline should do with a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Pdf,
    Image,
    Text,
    Unsupported,
}

impl ContentKind {
    pub fn id(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Image => "image",
            Self::Text => "text",
            Self::Unsupported => "unsupported",
        }
    }
}

/// A payload's kind together with the MIME type it was sniffed as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedContent {
    pub kind: ContentKind,
    pub mime: String,
}

/// One content-sniffing strategy.
pub trait MimeSniffer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Return a MIME type if the bytes are recognised.
    fn sniff(&self, bytes: &[u8]) -> Option<String>;
}

/// Magic-number detection via the `infer` signature tables.
#[derive(Debug, Default)]
pub struct MagicSniffer;

impl MimeSniffer for MagicSniffer {
    fn name(&self) -> &'static str {
        "magic"
    }

    fn sniff(&self, bytes: &[u8]) -> Option<String> {
        infer::get(bytes).map(|t| t.mime_type().to_string())
    }
}

/// Literal `%PDF` prefix check.
#[derive(Debug, Default)]
pub struct PdfSignatureSniffer;

impl MimeSniffer for PdfSignatureSniffer {
    fn name(&self) -> &'static str {
        "pdf-signature"
    }

    fn sniff(&self, bytes: &[u8]) -> Option<String> {
        bytes
            .starts_with(b"%PDF")
            .then(|| "application/pdf".to_string())
    }
}

/// Anything that decodes as UTF-8 is plain text.
#[derive(Debug, Default)]
pub struct Utf8TextSniffer;

impl MimeSniffer for Utf8TextSniffer {
    fn name(&self) -> &'static str {
        "utf8-text"
    }

    fn sniff(&self, bytes: &[u8]) -> Option<String> {
        std::str::from_utf8(bytes)
            .ok()
            .map(|_| "text/plain".to_string())
    }
}

/// Sniffers in the order they are tried.
pub fn default_sniffers() -> Vec<Box<dyn MimeSniffer>> {
    vec![
        Box::new(MagicSniffer),
        Box::new(PdfSignatureSniffer),
        Box::new(Utf8TextSniffer),
    ]
}

/// Strip parameters and normalise case ("Image/PNG; q=1" -> "image/png").
fn normalize_mime(mime: &str) -> String {
    mime.split(';')
        .next()
        .unwrap_or(mime)
        .trim()
        .to_lowercase()
}

/// Classifies downloaded payloads.
pub struct ContentClassifier {
    sniffers: Vec<Box<dyn MimeSniffer>>,
}

impl Default for ContentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentClassifier {
    pub fn new() -> Self {
        Self::with_sniffers(default_sniffers())
    }

    pub fn with_sniffers(sniffers: Vec<Box<dyn MimeSniffer>>) -> Self {
        Self { sniffers }
    }

    /// Names of the configured sniffers, in trial order.
    pub fn sniffer_names(&self) -> Vec<&'static str> {
        self.sniffers.iter().map(|s| s.name()).collect()
    }

    /// Run the sniffer chain, falling back to [`UNKNOWN_MIME`].
    pub fn sniff_mime(&self, bytes: &[u8]) -> String {
        for sniffer in &self.sniffers {
            match catch_unwind(AssertUnwindSafe(|| sniffer.sniff(bytes))) {
                Ok(Some(mime)) => {
                    tracing::debug!(sniffer = sniffer.name(), mime = %mime, "MIME sniffed");
                    return normalize_mime(&mime);
                }
                Ok(None) => {}
                Err(_) => {
                    tracing::warn!(sniffer = sniffer.name(), "MIME sniffer panicked, skipping");
                }
            }
        }
        UNKNOWN_MIME.to_string()
    }

    /// Decide how a payload should be processed.
    pub fn classify(&self, bytes: &[u8]) -> ClassifiedContent {
        let mime = self.sniff_mime(bytes);
        tracing::info!(mime = %mime, size = bytes.len(), "Detected content type");

        let kind = if mime == "application/pdf" {
            ContentKind::Pdf
        } else if mime.starts_with("image/") && image::load_from_memory(bytes).is_ok() {
            ContentKind::Image
        } else if std::str::from_utf8(bytes).is_ok() {
            ContentKind::Text
        } else {
            ContentKind::Unsupported
        };

        ClassifiedContent { kind, mime }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::{blank_pdf, png_bytes};
    use image::{DynamicImage, ImageBuffer, Rgb};

    struct PanickingSniffer;

    impl MimeSniffer for PanickingSniffer {
        fn name(&self) -> &'static str {
            "panics"
        }

        fn sniff(&self, _bytes: &[u8]) -> Option<String> {
            panic!("sniffer blew up");
        }
    }

    fn png() -> Vec<u8> {
        png_bytes(DynamicImage::ImageRgb8(ImageBuffer::from_pixel(
            4,
            4,
            Rgb([0, 0, 0]),
        )))
    }

    #[test]
    fn test_default_sniffer_order() {
        assert_eq!(
            ContentClassifier::new().sniffer_names(),
            vec!["magic", "pdf-signature", "utf8-text"]
        );
    }

    #[test]
    fn test_classify_pdf() {
        let classified = ContentClassifier::new().classify(&blank_pdf(1));
        assert_eq!(classified.kind, ContentKind::Pdf);
        assert_eq!(classified.mime, "application/pdf");
    }

    #[test]
    fn test_pdf_prefix_fallback_after_failing_sniffer() {
        let classifier = ContentClassifier::with_sniffers(vec![
            Box::new(PanickingSniffer),
            Box::new(PdfSignatureSniffer),
        ]);
        let classified = classifier.classify(b"%PDF-1.4 whatever follows");
        assert_eq!(classified.kind, ContentKind::Pdf);
    }

    #[test]
    fn test_classify_image() {
        let classified = ContentClassifier::new().classify(&png());
        assert_eq!(classified.kind, ContentKind::Image);
        assert_eq!(classified.mime, "image/png");
    }

    #[test]
    fn test_undecodable_image_is_not_an_image() {
        let mut truncated = png();
        truncated.truncate(16);
        let classified = ContentClassifier::new().classify(&truncated);
        assert_eq!(classified.kind, ContentKind::Unsupported);
        assert_eq!(classified.mime, "image/png");
    }

    #[test]
    fn test_classify_text() {
        let classified = ContentClassifier::new().classify("Plain notes, ünïcödé.".as_bytes());
        assert_eq!(classified.kind, ContentKind::Text);
        assert_eq!(classified.mime, "text/plain");
    }

    #[test]
    fn test_classify_unknown_binary() {
        let classified = ContentClassifier::new().classify(&[0x00, 0x9f, 0x92, 0x96, 0xc3, 0x28]);
        assert_eq!(classified.kind, ContentKind::Unsupported);
        assert_eq!(classified.mime, UNKNOWN_MIME);
    }

    #[test]
    fn test_normalize_mime() {
        assert_eq!(normalize_mime("Image/PNG; q=1"), "image/png");
        assert_eq!(normalize_mime("text/plain"), "text/plain");
    }
}
