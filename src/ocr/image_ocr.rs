//! Single-shot OCR over a raster image.

use std::path::Path;

use image::{ColorType, DynamicImage, ImageFormat};

use super::backend::{OcrBackend, OcrError};

pub const NO_IMAGE_TEXT_WARNING: &str = "No text could be extracted from the image";

/// Text recovered from an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageText {
    pub text: String,
    pub warning: Option<String>,
}

/// Decode raw bytes into an image, failing if no decoder accepts them.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, OcrError> {
    image::load_from_memory(bytes).map_err(|e| OcrError::ImageError(e.to_string()))
}

/// Reduce an image to 8-bit grayscale or 8-bit RGB.
///
/// Alpha channels and high bit depths are dropped; palette images are
/// already expanded by the decoder.
pub fn normalize_color(img: DynamicImage) -> DynamicImage {
    match img.color() {
        ColorType::L8 => img,
        ColorType::La8 | ColorType::L16 | ColorType::La16 => {
            DynamicImage::ImageLuma8(img.to_luma8())
        }
        ColorType::Rgb8 => img,
        _ => DynamicImage::ImageRgb8(img.to_rgb8()),
    }
}

/// OCR an in-memory image.
///
/// The normalized image is written as PNG into `work_dir` and handed to the
/// backend in a single call.
pub fn ocr_image_bytes(
    backend: &dyn OcrBackend,
    bytes: &[u8],
    work_dir: &Path,
) -> Result<ImageText, OcrError> {
    let img = normalize_color(decode_image(bytes)?);
    tracing::debug!(
        width = img.width(),
        height = img.height(),
        color = ?img.color(),
        "Normalized image for OCR"
    );

    let image_path = work_dir.join("input.png");
    img.save_with_format(&image_path, ImageFormat::Png)
        .map_err(|e| OcrError::ImageError(e.to_string()))?;

    let text = backend.ocr_image(&image_path)?.trim().to_string();
    let warning = if text.is_empty() {
        tracing::warn!("{}", NO_IMAGE_TEXT_WARNING);
        Some(NO_IMAGE_TEXT_WARNING.to_string())
    } else {
        None
    };

    Ok(ImageText { text, warning })
}

#[cfg(test)]
pub(crate) fn png_bytes(img: DynamicImage) -> Vec<u8> {
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::backend::testing::FakeBackend;
    use image::{ImageBuffer, LumaA, Rgba};
    use tempfile::TempDir;

    #[test]
    fn test_normalize_rgba_to_rgb() {
        let img = DynamicImage::ImageRgba8(ImageBuffer::from_pixel(4, 4, Rgba([1, 2, 3, 128])));
        assert_eq!(normalize_color(img).color(), ColorType::Rgb8);
    }

    #[test]
    fn test_normalize_gray_alpha_to_gray() {
        let img = DynamicImage::ImageLumaA8(ImageBuffer::from_pixel(4, 4, LumaA([9, 255])));
        assert_eq!(normalize_color(img).color(), ColorType::L8);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_image(b"not an image at all"),
            Err(OcrError::ImageError(_))
        ));
    }

    #[test]
    fn test_ocr_image_trims_text() {
        let temp = TempDir::new().unwrap();
        let backend = FakeBackend::new().with_image_text("  Invoice 42 \n");
        let bytes = png_bytes(DynamicImage::ImageRgba8(ImageBuffer::from_pixel(
            8,
            8,
            Rgba([255, 255, 255, 255]),
        )));

        let result = ocr_image_bytes(&backend, &bytes, temp.path()).unwrap();
        assert_eq!(result.text, "Invoice 42");
        assert_eq!(result.warning, None);
        assert!(temp.path().join("input.png").exists());
    }

    #[test]
    fn test_ocr_image_without_text_warns() {
        let temp = TempDir::new().unwrap();
        let backend = FakeBackend::new().with_image_text(" \n\t");
        let bytes = png_bytes(DynamicImage::ImageLuma8(ImageBuffer::from_pixel(
            8,
            8,
            image::Luma([255]),
        )));

        let result = ocr_image_bytes(&backend, &bytes, temp.path()).unwrap();
        assert_eq!(result.text, "");
        assert_eq!(result.warning.as_deref(), Some(NO_IMAGE_TEXT_WARNING));
    }
}
