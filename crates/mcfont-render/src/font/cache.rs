//! Per-asset memoization for font building.
//!
//! Decompressing a Unifont archive and scanning an atlas for transparent
//! pixels are the two expensive steps of a build. Both depend only on the
//! asset bytes, and assets are immutable for a given path, so results are
//! kept for the lifetime of the [`FontCache`] and never evicted.
//!
//! The cache is owned by the caller and handed to the builder, so a session
//! can share one across rebuilds while tests start from an empty one.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::unihex::HexArchive;
use crate::image_buffer::ImageBuffer;

/// Which pixels of an atlas are fully transparent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransparencyMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl TransparencyMask {
    /// Scan an image for pixels with zero alpha.
    pub fn from_image(image: &ImageBuffer) -> Self {
        let (width, height) = image.dimensions();
        let bits = image
            .as_rgba8_bytes()
            .chunks_exact(4)
            .map(|px| px[3] == 0)
            .collect();
        Self { width, height, bits }
    }

    /// Mask dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether the pixel at (x, y) is transparent. Outside the mask counts as
    /// transparent.
    #[inline]
    pub fn is_transparent(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return true;
        }
        self.bits[(y as usize) * (self.width as usize) + x as usize]
    }

    /// Whether every pixel of column `x` in rows `y..y + height` is transparent.
    pub fn column_transparent(&self, x: u32, y: u32, height: u32) -> bool {
        (y..y + height).all(|row| self.is_transparent(x, row))
    }
}

/// Memoized archive contents and transparency masks, keyed by storage path.
#[derive(Debug, Default)]
pub struct FontCache {
    archives: Mutex<HashMap<String, Arc<HexArchive>>>,
    masks: Mutex<HashMap<String, Arc<TransparencyMask>>>,
}

impl FontCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The parsed archive stored for `path`.
    pub fn archive(&self, path: &str) -> Option<Arc<HexArchive>> {
        self.archives.lock().get(path).cloned()
    }

    /// Store a parsed archive. An existing entry is kept and returned.
    pub fn insert_archive(&self, path: &str, archive: HexArchive) -> Arc<HexArchive> {
        self.archives
            .lock()
            .entry(path.to_string())
            .or_insert_with(|| Arc::new(archive))
            .clone()
    }

    /// The transparency mask for `path`, computing it from `image` on first use.
    pub fn mask(&self, path: &str, image: &ImageBuffer) -> Arc<TransparencyMask> {
        self.masks
            .lock()
            .entry(path.to_string())
            .or_insert_with(|| {
                tracing::trace!(target: "mcfont_render::font", path, "computing transparency mask");
                Arc::new(TransparencyMask::from_image(image))
            })
            .clone()
    }

    /// Number of cached archives.
    pub fn archive_count(&self) -> usize {
        self.archives.lock().len()
    }

    /// Number of cached masks.
    pub fn mask_count(&self) -> usize {
        self.masks.lock().len()
    }
}
