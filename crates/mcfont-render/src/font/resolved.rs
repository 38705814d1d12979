//! The flattened result of building a font.

use std::collections::BTreeMap;

use super::bitmap::{BitmapGlyph, BitmapMap};
use super::unihex::{UnihexGlyph, UnihexMap};

/// Glyphs contributed by one provider.
#[derive(Debug, Clone, PartialEq)]
pub enum CharacterMap {
    Bitmap(BitmapMap),
    Unihex(UnihexMap),
}

impl CharacterMap {
    /// Whether this map has a glyph for `codepoint`.
    pub fn contains(&self, codepoint: u32) -> bool {
        match self {
            CharacterMap::Bitmap(map) => map.chars.contains_key(&codepoint),
            CharacterMap::Unihex(map) => map.chars.contains_key(&codepoint),
        }
    }

    /// The glyph for `codepoint`.
    pub fn glyph(&self, codepoint: u32) -> Option<Glyph<'_>> {
        match self {
            CharacterMap::Bitmap(map) => map.chars.get(&codepoint).map(|g| Glyph::Bitmap(map, g)),
            CharacterMap::Unihex(map) => map.chars.get(&codepoint).map(Glyph::Unihex),
        }
    }

    /// Number of glyphs.
    pub fn len(&self) -> usize {
        match self {
            CharacterMap::Bitmap(map) => map.chars.len(),
            CharacterMap::Unihex(map) => map.chars.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every codepoint with a glyph, in ascending order.
    pub fn codepoints(&self) -> Vec<u32> {
        match self {
            CharacterMap::Bitmap(map) => map.chars.keys().copied().collect(),
            CharacterMap::Unihex(map) => map.chars.keys().copied().collect(),
        }
    }
}

/// A glyph borrowed from a [`CharacterMap`].
#[derive(Debug, Clone, Copy)]
pub enum Glyph<'a> {
    /// An atlas glyph together with its map, which holds the image and metrics.
    Bitmap(&'a BitmapMap, &'a BitmapGlyph),
    Unihex(&'a UnihexGlyph),
}

/// Spacing advances and character maps resolved from a font descriptor.
///
/// Character maps are ordered by ascending priority: when several maps have
/// a glyph for the same codepoint, the one nearest the end wins.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedFont {
    pub spacing: BTreeMap<u32, f32>,
    pub characters: Vec<CharacterMap>,
}

impl ResolvedFont {
    /// An empty font. Every character renders as the placeholder box.
    pub fn new() -> Self {
        Self::default()
    }

    /// The spacing advance of `codepoint`. Zero-width entries count as absent.
    pub fn advance(&self, codepoint: u32) -> Option<f32> {
        self.spacing.get(&codepoint).copied().filter(|w| *w != 0.0)
    }

    /// The highest-priority glyph for `codepoint`.
    pub fn glyph(&self, codepoint: u32) -> Option<Glyph<'_>> {
        self.characters.iter().rev().find_map(|map| map.glyph(codepoint))
    }

    /// Whether nothing was resolved.
    pub fn is_empty(&self) -> bool {
        self.spacing.is_empty() && self.characters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::unihex::{HexArchive, parse_hex_line};
    use crate::font::descriptor::OverrideBand;

    fn unihex(codepoints: &[u32], left: f32) -> CharacterMap {
        let bits = "0".repeat(32);
        let archive = HexArchive::from_glyphs(
            codepoints
                .iter()
                .filter_map(|cp| parse_hex_line(&format!("{cp:04X}:{bits}"))),
        );
        let band = OverrideBand {
            from: 0,
            to: 0x10FFFF,
            left,
            right: 8.0,
        };
        CharacterMap::Unihex(UnihexMap::from_archive(&archive, &[band]))
    }

    #[test]
    fn test_later_map_wins() {
        let font = ResolvedFont {
            spacing: BTreeMap::new(),
            characters: vec![unihex(&[0x41, 0x42], 1.0), unihex(&[0x41], 2.0)],
        };

        let Some(Glyph::Unihex(a)) = font.glyph(0x41) else {
            panic!("expected unihex glyph");
        };
        assert_eq!(a.left, 2.0);

        let Some(Glyph::Unihex(b)) = font.glyph(0x42) else {
            panic!("expected unihex glyph");
        };
        assert_eq!(b.left, 1.0);

        assert!(font.glyph(0x43).is_none());
    }

    #[test]
    fn test_zero_advance_is_absent() {
        let mut font = ResolvedFont::new();
        font.spacing.insert(0x20, 4.0);
        font.spacing.insert(0x200c, 0.0);
        assert_eq!(font.advance(0x20), Some(4.0));
        assert_eq!(font.advance(0x200c), None);
        assert_eq!(font.advance(0x41), None);
    }

    #[test]
    fn test_codepoints_ascending() {
        let map = unihex(&[0x43, 0x41], 0.0);
        assert_eq!(map.len(), 2);
        assert_eq!(map.codepoints(), vec![0x41, 0x43]);
        assert!(map.contains(0x43));
    }
}
