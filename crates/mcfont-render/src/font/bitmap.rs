//! Slicing bitmap atlases into glyphs.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::cache::TransparencyMask;
use super::descriptor::BitmapProvider;
use crate::image_buffer::ImageBuffer;
use crate::types::Rect;

/// Where a glyph sits in its atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapGlyph {
    pub x: u32,
    pub y: u32,
    /// Cell width.
    pub w: u32,
    pub h: u32,
    /// Columns up to and including the rightmost non-transparent one.
    pub trimmed_width: u32,
}

impl BitmapGlyph {
    /// The atlas region to draw: the cell, cut off after the trimmed width.
    pub fn crop(&self) -> Rect {
        Rect::new(
            self.x as f32,
            self.y as f32,
            self.trimmed_width as f32,
            self.h as f32,
        )
    }
}

/// Glyphs contributed by one `bitmap` provider.
#[derive(Debug, Clone, PartialEq)]
pub struct BitmapMap {
    pub ascent: f32,
    pub height: f32,
    pub image: Arc<ImageBuffer>,
    pub chars: BTreeMap<u32, BitmapGlyph>,
}

impl BitmapMap {
    /// Slice `image` into the provider's character grid.
    ///
    /// Returns `None` when the grid is empty or a cell would be narrower or
    /// shorter than one pixel.
    pub fn slice(
        provider: &BitmapProvider,
        image: Arc<ImageBuffer>,
        mask: &TransparencyMask,
    ) -> Option<Self> {
        let rows = provider.chars.len() as u32;
        let cols = provider.chars.first()?.chars().count() as u32;
        if rows == 0 || cols == 0 {
            return None;
        }

        let cell_width = image.width() / cols;
        let cell_height = image.height() / rows;
        if cell_width == 0 || cell_height == 0 {
            return None;
        }

        let mut chars = BTreeMap::new();
        for (row, line) in provider.chars.iter().enumerate() {
            let y = row as u32 * cell_height;
            for (col, c) in line.chars().enumerate() {
                let x = col as u32 * cell_width;
                let trimmed_width = trimmed_width(mask, x, y, cell_width, cell_height);
                chars.insert(
                    u32::from(c),
                    BitmapGlyph {
                        x,
                        y,
                        w: cell_width,
                        h: cell_height,
                        trimmed_width,
                    },
                );
            }
        }

        Some(Self {
            ascent: provider.ascent,
            height: provider.height(),
            image,
            chars,
        })
    }

    /// Rendered width of a glyph, in font units.
    pub fn rendered_width(&self, glyph: &BitmapGlyph) -> f32 {
        round_half_up(glyph.trimmed_width as f32 / glyph.w as f32 * self.height)
    }
}

/// Width of a cell up to its rightmost column with an opaque pixel.
///
/// A fully transparent cell is one column wide.
pub fn trimmed_width(mask: &TransparencyMask, x: u32, y: u32, width: u32, height: u32) -> u32 {
    let mut rightmost = 0;
    for offset in (0..width).rev() {
        rightmost = offset;
        if !mask.column_transparent(x + offset, y, height) {
            break;
        }
    }
    rightmost + 1
}

/// Round to nearest, halves toward positive infinity.
pub(crate) fn round_half_up(value: f32) -> f32 {
    (value + 0.5).floor()
}
