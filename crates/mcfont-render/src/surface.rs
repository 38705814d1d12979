//! Drawing surface abstraction.
//!
//! The compositor only needs a handful of canvas primitives: scaled sub-image
//! blits, rectangle fills in source-over or source-atop mode, clears, and
//! flattening one surface onto another. [`DrawSurface`] captures exactly
//! that, so previews can be painted onto the software [`ImageBuffer`] or onto
//! any other raster target.
//!
//! [`ImageBuffer`]: crate::ImageBuffer

use crate::image_buffer::ImageBuffer;
use crate::types::{Color, Rect};

/// How a fill is combined with what is already on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeMode {
    /// Paint over the destination.
    #[default]
    SourceOver,
    /// Paint only where the destination is already opaque, keeping its alpha.
    ///
    /// Used to tint glyphs after they have been drawn.
    SourceAtop,
}

/// A raster target for preview compositing.
///
/// Coordinates are device pixels and may be fractional; a pixel is affected
/// when its centre lies inside the target rectangle.
pub trait DrawSurface {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Draw the `crop` region of `image` scaled into `dest`, nearest-neighbour,
    /// in source-over mode.
    fn draw_image(&mut self, image: &ImageBuffer, crop: Rect, dest: Rect);

    /// Fill `rect` with `color`.
    fn fill_rect(&mut self, rect: Rect, color: Color, mode: CompositeMode);

    /// Make `rect` fully transparent.
    fn clear_rect(&mut self, rect: Rect);

    /// Draw another surface of the same size onto this one at the origin.
    fn draw_surface(&mut self, other: &Self);

    /// Create a transparent surface with the same dimensions.
    fn blank_like(&self) -> Self
    where
        Self: Sized;

    /// Make the whole surface transparent.
    fn clear(&mut self) {
        let bounds = self.bounds();
        self.clear_rect(bounds);
    }

    /// The full surface rectangle.
    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width() as f32, self.height() as f32)
    }
}
