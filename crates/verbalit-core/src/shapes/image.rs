//! Image shape for raster images dropped onto the board.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use base64::{Engine, engine::general_purpose::STANDARD};
use kurbo::{Affine, Point, Rect};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised when turning raw bytes into an image object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("Image data is empty")]
    Empty,
    #[error("Unsupported image format")]
    UnsupportedFormat,
    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Image format for stored image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    WebP,
}

impl ImageFormat {
    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::WebP => "image/webp",
        }
    }

    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "gif" => Some(ImageFormat::Gif),
            "webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }
        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some(ImageFormat::Gif);
        }
        // RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }
        None
    }
}

/// A raster image placed on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub(crate) id: ShapeId,
    /// Top-left corner position.
    pub position: Point,
    /// Display width.
    pub width: f64,
    /// Display height.
    pub height: f64,
    /// Original image width in pixels.
    pub source_width: u32,
    /// Original image height in pixels.
    pub source_height: u32,
    pub format: ImageFormat,
    /// Image bytes, base64 encoded so snapshots stay plain JSON.
    pub data_base64: String,
    pub style: ShapeStyle,
}

impl Image {
    /// Create an image shown at its natural size.
    pub fn new(
        position: Point,
        data: &[u8],
        source_width: u32,
        source_height: u32,
        format: ImageFormat,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width: source_width as f64,
            height: source_height as f64,
            source_width,
            source_height,
            format,
            data_base64: STANDARD.encode(data),
            style: ShapeStyle {
                stroke_width: 0.0,
                ..ShapeStyle::default()
            },
        }
    }

    /// Create an image from encoded bytes, detecting the format from its header.
    pub fn from_bytes(
        position: Point,
        data: &[u8],
        source_width: u32,
        source_height: u32,
    ) -> Result<Self, ImageError> {
        if data.is_empty() {
            return Err(ImageError::Empty);
        }
        if source_width == 0 || source_height == 0 {
            return Err(ImageError::InvalidDimensions {
                width: source_width,
                height: source_height,
            });
        }
        let format = ImageFormat::from_magic_bytes(data).ok_or(ImageError::UnsupportedFormat)?;
        Ok(Self::new(position, data, source_width, source_height, format))
    }

    /// Uniformly shrink the image so it fits in `max_width` × `max_height`.
    ///
    /// Images that already fit keep their natural size.
    pub fn shrink_to_fit(mut self, max_width: f64, max_height: f64) -> Self {
        let scale = fit_scale(
            self.source_width as f64,
            self.source_height as f64,
            max_width,
            max_height,
        );
        self.width = self.source_width as f64 * scale;
        self.height = self.source_height as f64 * scale;
        self
    }

    /// Get the raw image data (decoded from base64).
    pub fn data(&self) -> Option<Vec<u8>> {
        STANDARD.decode(&self.data_base64).ok()
    }

    /// `data:` URL suitable for an `<img>` source.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.format.mime_type(), self.data_base64)
    }

    pub fn as_rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }
}

/// Scale factor that fits `width × height` into the box without upscaling.
pub(crate) fn fit_scale(width: f64, height: f64, max_width: f64, max_height: f64) -> f64 {
    if width <= 0.0 || height <= 0.0 {
        return 1.0;
    }
    (max_width / width).min(max_height / height).clamp(0.0, 1.0)
}

impl ShapeTrait for Image {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.as_rect().inflate(tolerance, tolerance).contains(point)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn transform(&mut self, affine: Affine) {
        self.position = affine * self.position;
        let scale = affine.as_coeffs();
        self.width *= scale[0].abs();
        self.height *= scale[3].abs();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        let png_header = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(ImageFormat::from_magic_bytes(&png_header), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_magic_bytes(b"GIF89a...."), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::from_magic_bytes(b"hello"), None);
        assert_eq!(ImageFormat::from_extension("JPG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("bmp"), None);
    }

    #[test]
    fn test_from_bytes_validates() {
        assert_eq!(
            Image::from_bytes(Point::ZERO, &[], 10, 10),
            Err(ImageError::Empty)
        );
        assert_eq!(
            Image::from_bytes(Point::ZERO, b"hello", 10, 10),
            Err(ImageError::UnsupportedFormat)
        );
        assert_eq!(
            Image::from_bytes(Point::ZERO, b"GIF89a", 0, 10),
            Err(ImageError::InvalidDimensions { width: 0, height: 10 })
        );
        let gif = Image::from_bytes(Point::ZERO, b"GIF89a", 4, 2).unwrap();
        assert_eq!(gif.format, ImageFormat::Gif);
    }

    #[test]
    fn test_large_image_is_shrunk() {
        let img = Image::new(Point::ZERO, &[0u8; 4], 5600, 1400, ImageFormat::Png)
            .shrink_to_fit(2800.0, 2800.0);
        assert!((img.width - 2800.0).abs() < 1e-9);
        assert!((img.height - 700.0).abs() < 1e-9);
    }

    #[test]
    fn test_small_image_is_not_upscaled() {
        let img = Image::new(Point::ZERO, &[0u8; 4], 200, 100, ImageFormat::Png)
            .shrink_to_fit(2800.0, 2800.0);
        assert!((img.width - 200.0).abs() < f64::EPSILON);
        assert!((img.height - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_data_roundtrip() {
        let bytes = [0x89, 0x50, 0x4E, 0x47, 1, 2, 3];
        let img = Image::new(Point::ZERO, &bytes, 1, 1, ImageFormat::Png);
        assert_eq!(img.data().as_deref(), Some(&bytes[..]));
        assert!(img.data_url().starts_with("data:image/png;base64,"));
    }
}
