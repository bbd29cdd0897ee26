//! Shared utility functions.
//!
//! - `mime`: content sniffing and classification of downloaded payloads

mod mime;

pub use mime::{
    default_sniffers, ClassifiedContent, ContentClassifier, ContentKind, MagicSniffer,
    MimeSniffer, PdfSignatureSniffer, Utf8TextSniffer, UNKNOWN_MIME,
};
