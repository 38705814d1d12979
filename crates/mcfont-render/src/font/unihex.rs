//! GNU Unifont `.hex` archives.
//!
//! A `unihex` provider points at a zip archive holding one or more `.hex`
//! files. Each line is `CODEPOINT:BITS`, where `BITS` is the glyph bitmap in
//! hex, row-major, with 16 rows. The glyph width follows from the number of
//! bits, so 32 hex digits make an 8-wide glyph and 64 make a 16-wide one.

use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use std::sync::Arc;

use zip::ZipArchive;

use super::descriptor::OverrideBand;
use crate::error::{RenderError, RenderResult};

/// Rows in a Unifont glyph.
const ROWS: usize = 16;

/// One glyph decoded from a `.hex` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexBitmap {
    pub codepoint: u32,
    pub width: u32,
    pub height: u32,
    /// Coordinates of the set bits.
    pub pixels: Vec<(u32, u32)>,
}

/// Every glyph found in the `.hex` files of one archive, in file order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HexArchive {
    glyphs: Vec<Arc<HexBitmap>>,
}

impl HexArchive {
    /// Read the top-level `.hex` entries of a zip archive.
    pub fn from_zip(bytes: &[u8]) -> RenderResult<Self> {
        let mut zip =
            ZipArchive::new(Cursor::new(bytes)).map_err(|e| RenderError::Archive(e.to_string()))?;

        let mut glyphs = Vec::new();
        for i in 0..zip.len() {
            let mut entry = zip.by_index(i).map_err(|e| RenderError::Archive(e.to_string()))?;
            let name = entry.name().to_string();
            if !entry.is_file() || name.contains('/') || !name.ends_with(".hex") {
                continue;
            }

            let mut text = String::new();
            entry
                .read_to_string(&mut text)
                .map_err(|e| RenderError::Archive(format!("{name}: {e}")))?;
            glyphs.extend(text.lines().filter_map(parse_hex_line).map(Arc::new));
        }

        tracing::debug!(target: "mcfont_render::font", glyphs = glyphs.len(), "parsed hex archive");
        Ok(Self { glyphs })
    }

    /// Create an archive from already decoded glyphs.
    pub fn from_glyphs(glyphs: impl IntoIterator<Item = HexBitmap>) -> Self {
        Self {
            glyphs: glyphs.into_iter().map(Arc::new).collect(),
        }
    }

    /// The decoded glyphs.
    pub fn glyphs(&self) -> &[Arc<HexBitmap>] {
        &self.glyphs
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// Decode one `CODEPOINT:BITS` line.
///
/// Returns `None` for malformed lines, invalid hex, or a bitmap narrower than
/// one column. A trailing partial row is dropped.
pub fn parse_hex_line(line: &str) -> Option<HexBitmap> {
    let mut parts = line.trim().split(':');
    let (cp, bits) = match (parts.next(), parts.next(), parts.next()) {
        (Some(cp), Some(bits), None) => (cp, bits),
        _ => return None,
    };
    let codepoint = u32::from_str_radix(cp, 16).ok()?;

    let mut binary = Vec::with_capacity(bits.len() * 4);
    for digit in bits.chars() {
        let nibble = digit.to_digit(16)?;
        binary.extend((0..4).rev().map(|shift| (nibble >> shift) & 1 == 1));
    }

    let width = binary.len() / ROWS;
    if width == 0 {
        return None;
    }

    let mut pixels = Vec::new();
    let rows = binary.chunks_exact(width);
    let height = rows.len();
    for (y, row) in rows.enumerate() {
        for (x, _) in row.iter().enumerate().filter(|(_, on)| **on) {
            pixels.push((x as u32, y as u32));
        }
    }

    Some(HexBitmap {
        codepoint,
        width: width as u32,
        height: height as u32,
        pixels,
    })
}

/// A Unifont glyph with the bearings of its override band.
#[derive(Debug, Clone, PartialEq)]
pub struct UnihexGlyph {
    pub left: f32,
    pub right: f32,
    bitmap: Arc<HexBitmap>,
}

impl UnihexGlyph {
    /// Pair a bitmap with bearings.
    pub fn new(bitmap: Arc<HexBitmap>, left: f32, right: f32) -> Self {
        Self { left, right, bitmap }
    }

    pub fn width(&self) -> u32 {
        self.bitmap.width
    }

    pub fn height(&self) -> u32 {
        self.bitmap.height
    }

    /// Set bits, in glyph coordinates.
    pub fn pixels(&self) -> &[(u32, u32)] {
        &self.bitmap.pixels
    }
}

/// Glyphs contributed by one `unihex` provider.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnihexMap {
    pub chars: BTreeMap<u32, UnihexGlyph>,
}

impl UnihexMap {
    /// Assign each archive glyph the first band containing its codepoint.
    ///
    /// Glyphs outside every band are left out.
    pub fn from_archive(archive: &HexArchive, bands: &[OverrideBand]) -> Self {
        let chars = archive
            .glyphs()
            .iter()
            .filter_map(|bitmap| {
                let band = bands.iter().find(|b| b.contains(bitmap.codepoint))?;
                Some((
                    bitmap.codepoint,
                    UnihexGlyph::new(Arc::clone(bitmap), band.left, band.right),
                ))
            })
            .collect();
        Self { chars }
    }
}
