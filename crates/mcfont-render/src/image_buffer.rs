//! CPU-side raster buffer.
//!
//! [`ImageBuffer`] wraps an `image::RgbaImage` and serves two purposes:
//! decoded glyph atlases and HUD sprites are stored in it, and it is the
//! software [`DrawSurface`] previews are composited onto.
//!
//! # Example
//!
//! ```
//! use mcfont_render::{Color, CompositeMode, DrawSurface, ImageBuffer, Rect};
//!
//! let mut canvas = ImageBuffer::new(4, 4);
//! canvas.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), Color::WHITE, CompositeMode::SourceOver);
//! // Atop only tints pixels that are already painted.
//! canvas.fill_rect(canvas.bounds(), Color::BLACK, CompositeMode::SourceAtop);
//!
//! assert_eq!(canvas.get_pixel(0, 0), Some(Color::BLACK));
//! assert_eq!(canvas.get_pixel(3, 3), Some(Color::TRANSPARENT));
//! ```

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use crate::error::{RenderError, RenderResult};
use crate::surface::{CompositeMode, DrawSurface};
use crate::types::{Color, Rect};

/// An RGBA8 image.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    inner: RgbaImage,
}

impl std::fmt::Debug for ImageBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageBuffer")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl ImageBuffer {
    // ========================================================================
    // CONSTRUCTION
    // ========================================================================

    /// Create a new transparent image with the specified dimensions.
    #[inline]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            inner: RgbaImage::new(width, height),
        }
    }

    /// Create an image filled with a solid color.
    pub fn from_color(width: u32, height: u32, color: Color) -> Self {
        Self {
            inner: RgbaImage::from_pixel(width, height, color_to_rgba(color)),
        }
    }

    /// Decode an image (PNG or any other format `image` recognizes).
    pub fn from_bytes(bytes: &[u8]) -> RenderResult<Self> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| RenderError::ImageLoad(format!("Failed to decode image: {}", e)))?;
        Self::from_dynamic_image(img)
    }

    /// Create an image from raw RGBA pixel data.
    ///
    /// The data must be exactly `width * height * 4` bytes, with pixels in
    /// row-major order, 4 bytes per pixel (R, G, B, A).
    pub fn from_rgba(data: &[u8], width: u32, height: u32) -> RenderResult<Self> {
        let expected = (width as usize) * (height as usize) * 4;
        if data.len() != expected {
            return Err(RenderError::ImageLoad(format!(
                "Invalid data size: expected {} bytes, got {}",
                expected,
                data.len()
            )));
        }
        let rgba = RgbaImage::from_raw(width, height, data.to_vec()).ok_or_else(|| {
            RenderError::ImageLoad("Failed to create image from raw data".to_string())
        })?;
        Ok(Self { inner: rgba })
    }

    /// Create from an existing `DynamicImage`.
    pub fn from_dynamic_image(img: DynamicImage) -> RenderResult<Self> {
        if img.width() == 0 || img.height() == 0 {
            return Err(RenderError::InvalidDimensions {
                width: img.width(),
                height: img.height(),
            });
        }
        Ok(Self {
            inner: img.into_rgba8(),
        })
    }

    // ========================================================================
    // PROPERTIES
    // ========================================================================

    /// Get the width of the image in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    /// Get the height of the image in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Get the dimensions as a (width, height) tuple.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.inner.dimensions()
    }

    /// Get the color of a pixel, or `None` outside the image.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Color> {
        let [r, g, b, a] = self.inner.get_pixel_checked(x, y)?.0;
        if a == 0 {
            return Some(Color::TRANSPARENT);
        }
        Some(Color::from_rgba8(r, g, b, a))
    }

    /// Get the raw RGBA bytes of a pixel, or `None` outside the image.
    pub fn get_rgba8(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.inner.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Set the color of a pixel. Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if let Some(p) = self.inner.get_pixel_mut_checked(x, y) {
            *p = color_to_rgba(color);
        }
    }

    /// Whether the pixel at (x, y) has zero alpha. Out-of-bounds pixels count
    /// as transparent.
    #[inline]
    pub fn is_transparent(&self, x: u32, y: u32) -> bool {
        self.inner.get_pixel_checked(x, y).is_none_or(|p| p.0[3] == 0)
    }

    /// Get the raw RGBA bytes.
    pub fn as_rgba8_bytes(&self) -> &[u8] {
        self.inner.as_raw()
    }

    // ========================================================================
    // EXPORT
    // ========================================================================

    /// Encode as PNG.
    pub fn to_png(&self) -> RenderResult<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        self.inner
            .write_to(&mut buffer, ImageFormat::Png)
            .map_err(|e| RenderError::ImageSave(format!("Failed to encode image: {}", e)))?;
        Ok(buffer.into_inner())
    }

    /// Save the image to a file.
    ///
    /// The format is determined by the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        self.inner
            .save(path.as_ref())
            .map_err(|e| RenderError::ImageSave(format!("Failed to save image: {}", e)))
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    fn blend_at(&mut self, x: i64, y: i64, src: Color, mode: CompositeMode) {
        if x < 0 || y < 0 {
            return;
        }
        let Some(p) = self.inner.get_pixel_mut_checked(x as u32, y as u32) else {
            return;
        };
        let dst = rgba_to_color(*p);
        *p = color_to_rgba(composite(dst, src, mode));
    }

    fn clamp_span(&self, rect: Rect) -> (i64, i64, i64, i64) {
        let (x0, y0, x1, y1) = rect.pixel_span();
        (
            x0.max(0),
            y0.max(0),
            x1.min(self.width() as i64),
            y1.min(self.height() as i64),
        )
    }
}

impl DrawSurface for ImageBuffer {
    #[inline]
    fn width(&self) -> u32 {
        self.inner.width()
    }

    #[inline]
    fn height(&self) -> u32 {
        self.inner.height()
    }

    fn draw_image(&mut self, image: &ImageBuffer, crop: Rect, dest: Rect) {
        if crop.is_empty() || dest.is_empty() {
            return;
        }
        let (x0, y0, x1, y1) = self.clamp_span(dest);
        let sx_ratio = crop.width() / dest.width();
        let sy_ratio = crop.height() / dest.height();

        for py in y0..y1 {
            let v = ((py as f32 + 0.5 - dest.top()) * sy_ratio).floor();
            let sy = crop.top() + v.min(crop.height() - 1.0).max(0.0);
            for px in x0..x1 {
                let u = ((px as f32 + 0.5 - dest.left()) * sx_ratio).floor();
                let sx = crop.left() + u.min(crop.width() - 1.0).max(0.0);
                if sx < 0.0 || sy < 0.0 {
                    continue;
                }
                let Some(src) = image.get_pixel(sx as u32, sy as u32) else {
                    continue;
                };
                if src.a > 0.0 {
                    self.blend_at(px, py, src, CompositeMode::SourceOver);
                }
            }
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color, mode: CompositeMode) {
        let (x0, y0, x1, y1) = self.clamp_span(rect);
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend_at(px, py, color, mode);
            }
        }
    }

    fn clear_rect(&mut self, rect: Rect) {
        let (x0, y0, x1, y1) = self.clamp_span(rect);
        for py in y0..y1 {
            for px in x0..x1 {
                self.inner.put_pixel(px as u32, py as u32, Rgba([0, 0, 0, 0]));
            }
        }
    }

    fn draw_surface(&mut self, other: &Self) {
        let width = self.width().min(other.width());
        let height = self.height().min(other.height());
        for y in 0..height {
            for x in 0..width {
                let src = *other.inner.get_pixel(x, y);
                if src.0[3] == 0 {
                    continue;
                }
                let dst = *self.inner.get_pixel(x, y);
                let out = composite(rgba_to_color(dst), rgba_to_color(src), CompositeMode::SourceOver);
                self.inner.put_pixel(x, y, color_to_rgba(out));
            }
        }
    }

    fn blank_like(&self) -> Self {
        Self::new(self.width(), self.height())
    }
}

/// Porter-Duff compositing on premultiplied colors.
fn composite(dst: Color, src: Color, mode: CompositeMode) -> Color {
    match mode {
        CompositeMode::SourceOver => {
            let k = 1.0 - src.a;
            Color::new(
                src.r + dst.r * k,
                src.g + dst.g * k,
                src.b + dst.b * k,
                src.a + dst.a * k,
            )
        }
        CompositeMode::SourceAtop => {
            let k = 1.0 - src.a;
            Color::new(
                src.r * dst.a + dst.r * k,
                src.g * dst.a + dst.g * k,
                src.b * dst.a + dst.b * k,
                dst.a,
            )
        }
    }
}

fn rgba_to_color(p: Rgba<u8>) -> Color {
    let [r, g, b, a] = p.0;
    Color::from_rgba8(r, g, b, a)
}

fn color_to_rgba(color: Color) -> Rgba<u8> {
    Rgba(color.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> ImageBuffer {
        // 2x2: red, green / blue, transparent
        ImageBuffer::from_rgba(
            &[255, 0, 0, 255, 0, 255, 0, 255, 0, 0, 255, 255, 0, 0, 0, 0],
            2,
            2,
        )
        .unwrap()
    }

    #[test]
    fn test_from_rgba_checks_size() {
        assert!(ImageBuffer::from_rgba(&[0; 15], 2, 2).is_err());
        assert_eq!(checker().dimensions(), (2, 2));
    }

    #[test]
    fn test_png_roundtrip() {
        let img = checker();
        let png = img.to_png().unwrap();
        assert_eq!(ImageBuffer::from_bytes(&png).unwrap(), img);
        assert!(ImageBuffer::from_bytes(b"not a png").is_err());
    }

    #[test]
    fn test_draw_image_scales_nearest() {
        let mut canvas = ImageBuffer::new(4, 4);
        canvas.draw_image(&checker(), Rect::new(0.0, 0.0, 2.0, 2.0), Rect::new(0.0, 0.0, 4.0, 4.0));

        assert_eq!(canvas.get_rgba8(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(canvas.get_rgba8(1, 1), Some([255, 0, 0, 255]));
        assert_eq!(canvas.get_rgba8(2, 0), Some([0, 255, 0, 255]));
        assert_eq!(canvas.get_rgba8(0, 3), Some([0, 0, 255, 255]));
        assert_eq!(canvas.get_rgba8(3, 3), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_draw_image_crop() {
        let mut canvas = ImageBuffer::new(3, 3);
        canvas.draw_image(&checker(), Rect::new(1.0, 0.0, 1.0, 1.0), Rect::new(1.0, 1.0, 1.0, 1.0));
        assert_eq!(canvas.get_rgba8(1, 1), Some([0, 255, 0, 255]));
        assert_eq!(canvas.get_rgba8(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_draw_image_clips_to_canvas() {
        let mut canvas = ImageBuffer::new(2, 2);
        canvas.draw_image(&checker(), Rect::new(0.0, 0.0, 2.0, 2.0), Rect::new(-1.0, -1.0, 2.0, 2.0));
        assert_eq!(canvas.get_rgba8(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_atop_keeps_destination_alpha() {
        let mut canvas = ImageBuffer::new(2, 1);
        canvas.set_pixel(0, 0, Color::WHITE);
        canvas.fill_rect(
            canvas.bounds(),
            Color::BLACK.with_alpha8(0xbf),
            CompositeMode::SourceAtop,
        );

        // 25% of white remains under 75% black.
        assert_eq!(canvas.get_rgba8(0, 0), Some([0x40, 0x40, 0x40, 255]));
        assert_eq!(canvas.get_rgba8(1, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_source_over_translucent() {
        let mut canvas = ImageBuffer::from_color(1, 1, Color::WHITE);
        canvas.fill_rect(canvas.bounds(), Color::BLACK.with_alpha(0.5), CompositeMode::SourceOver);
        let [r, _, _, a] = canvas.get_rgba8(0, 0).unwrap();
        assert_eq!(a, 255);
        assert!((127..=128).contains(&r));
    }

    #[test]
    fn test_clear_and_draw_surface() {
        let mut layer = ImageBuffer::new(2, 2);
        layer.fill_rect(layer.bounds(), Color::WHITE, CompositeMode::SourceOver);
        layer.clear_rect(Rect::new(0.0, 0.0, 1.0, 1.0));

        let mut canvas = layer.blank_like();
        canvas.draw_surface(&layer);
        assert_eq!(canvas.get_pixel(0, 0), Some(Color::TRANSPARENT));
        assert_eq!(canvas.get_pixel(1, 1), Some(Color::WHITE));

        canvas.clear();
        assert!(canvas.is_transparent(1, 1));
    }
}
