//! QR code rendering.

use image::{DynamicImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use std::io::Cursor;

/// Default minimum edge length of rendered images, in pixels.
pub const DEFAULT_QR_SIZE: u32 = 256;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("content cannot be encoded as a QR code: {0}")]
    Encode(#[from] qrcode::types::QrError),

    #[error("PNG encoding failed: {0}")]
    Png(#[from] image::ImageError),
}

/// Renders content as a PNG QR code.
///
/// Uses error correction level M. Output is deterministic: the same content
/// and size always produce the same bytes.
#[derive(Debug, Clone, Copy)]
pub struct QrRenderer {
    size: u32,
}

impl QrRenderer {
    pub fn new(size: u32) -> Self {
        Self { size }
    }

    /// Encodes `content` and returns the PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Encode`] if the content is too long for a QR
    /// code, or [`RenderError::Png`] if PNG encoding fails.
    pub fn render(&self, content: &str) -> Result<Vec<u8>, RenderError> {
        let code = QrCode::with_error_correction_level(content.as_bytes(), EcLevel::M)?;
        let pixels = code
            .render::<Luma<u8>>()
            .min_dimensions(self.size, self.size)
            .build();

        let mut png = Cursor::new(Vec::new());
        DynamicImage::ImageLuma8(pixels).write_to(&mut png, ImageFormat::Png)?;

        Ok(png.into_inner())
    }
}

impl Default for QrRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_QR_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

    #[test]
    fn test_renders_png() {
        let png = QrRenderer::default()
            .render("http://localhost:3001/abc123")
            .unwrap();

        assert!(png.starts_with(PNG_SIGNATURE));
    }

    #[test]
    fn test_output_is_deterministic() {
        let renderer = QrRenderer::new(128);

        let first = renderer.render("https://sho.rt/abc123").unwrap();
        let second = renderer.render("https://sho.rt/abc123").unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_respects_minimum_size() {
        let png = QrRenderer::new(300).render("https://sho.rt/abc123").unwrap();
        let image = image::load_from_memory_with_format(&png, ImageFormat::Png).unwrap();

        assert!(image.width() >= 300);
        assert!(image.height() >= 300);
    }

    #[test]
    fn test_oversized_content_fails() {
        let content = "x".repeat(8000);

        let err = QrRenderer::default().render(&content).unwrap_err();
        assert!(matches!(err, RenderError::Encode(_)));
    }
}
