//! Typed font descriptors.
//!
//! A font descriptor is the JSON file at `<namespace>/font/<name>.json`:
//!
//! ```json
//! {
//!     "providers": [
//!         { "type": "space", "advances": { " ": 4 } },
//!         { "type": "bitmap", "file": "minecraft:font/ascii.png", "ascent": 7, "chars": ["..."] },
//!         { "type": "reference", "id": "minecraft:include/default" }
//!     ]
//! }
//! ```
//!
//! Descriptors should pass [`validate_font`](super::validate_font) before they
//! are decoded into these types for building.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default bitmap provider height.
pub const DEFAULT_BITMAP_HEIGHT: f32 = 8.0;

/// An ordered list of glyph providers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FontDescriptor {
    pub providers: Vec<Provider>,
}

impl FontDescriptor {
    /// Create a descriptor from providers.
    pub fn new(providers: Vec<Provider>) -> Self {
        Self { providers }
    }

    /// Decode a descriptor, skipping providers that do not decode.
    ///
    /// Returns `None` when `providers` is missing or not a list. Used for
    /// referenced descriptors, which are never validated.
    pub fn from_value_lenient(value: &Value) -> Option<Self> {
        let entries = value.get("providers")?.as_array()?;
        let providers = entries
            .iter()
            .filter_map(|entry| match Provider::deserialize(entry) {
                Ok(provider) => Some(provider),
                Err(e) => {
                    tracing::debug!(
                        target: "mcfont_render::font",
                        error = %e,
                        "skipping undecodable provider"
                    );
                    None
                }
            })
            .collect();
        Some(Self { providers })
    }
}

/// One glyph provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Provider {
    /// Include another font.
    Reference {
        /// Namespaced font id, e.g. `minecraft:default`.
        id: String,
    },
    /// Glyphs sliced from a grid image.
    Bitmap(BitmapProvider),
    /// Invisible characters that only advance the pen.
    Space {
        /// Advance per character.
        advances: BTreeMap<String, f32>,
    },
    /// TrueType/OpenType glyphs. Recognized but not rendered.
    Ttf(TtfProvider),
    /// Glyphs from a zipped GNU Unifont `.hex` archive.
    Unihex(UnihexProvider),
}

impl Provider {
    /// The provider `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Provider::Reference { .. } => "reference",
            Provider::Bitmap(_) => "bitmap",
            Provider::Space { .. } => "space",
            Provider::Ttf(_) => "ttf",
            Provider::Unihex(_) => "unihex",
        }
    }
}

/// A `bitmap` provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BitmapProvider {
    /// Namespaced texture id, resolved under `textures/`.
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    pub ascent: f32,
    /// Grid rows; every row has the same number of characters.
    pub chars: Vec<String>,
}

impl BitmapProvider {
    /// The glyph height, defaulting to 8.
    pub fn height(&self) -> f32 {
        self.height.unwrap_or(DEFAULT_BITMAP_HEIGHT)
    }
}

/// A `ttf` provider.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TtfProvider {
    pub file: String,
    pub shift: Option<[f32; 2]>,
    pub size: Option<f32>,
    pub oversample: Option<f32>,
    pub skip: Option<Value>,
}

/// A `unihex` provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnihexProvider {
    /// Namespaced archive id, resolved without a type directory.
    pub hex_file: String,
    #[serde(default)]
    pub size_overrides: Vec<SizeOverride>,
}

/// Bearings for a range of codepoints in a `unihex` provider.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SizeOverride {
    /// First character of the range (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Last character of the range (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<f32>,
}

/// A [`SizeOverride`] with defaults applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverrideBand {
    pub from: u32,
    pub to: u32,
    pub left: f32,
    pub right: f32,
}

impl OverrideBand {
    /// Whether `codepoint` lies in `from..=to`.
    #[inline]
    pub fn contains(&self, codepoint: u32) -> bool {
        (self.from..=self.to).contains(&codepoint)
    }
}

impl From<&SizeOverride> for OverrideBand {
    fn from(o: &SizeOverride) -> Self {
        let first = |s: &Option<String>| s.as_deref().and_then(|s| s.chars().next()).map(u32::from);
        Self {
            from: first(&o.from).unwrap_or(0),
            to: first(&o.to).unwrap_or(char::MAX as u32),
            left: o.left.unwrap_or(0.0),
            right: o.right.unwrap_or(8.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_all_provider_kinds() {
        let font: FontDescriptor = serde_json::from_value(json!({
            "providers": [
                {"type": "reference", "id": "minecraft:default"},
                {"type": "bitmap", "file": "minecraft:font/ascii.png", "ascent": 7, "chars": ["ab"]},
                {"type": "space", "advances": {" ": 4, "\u{200c}": 0}},
                {"type": "ttf", "file": "custom:a.ttf", "shift": [0, 1], "size": 11, "oversample": 2, "skip": ""},
                {"type": "unihex", "hex_file": "minecraft:font/unifont.zip", "size_overrides": [
                    {"from": "\u{3001}", "to": "\u{30fe}", "left": 0, "right": 15}
                ]}
            ]
        }))
        .unwrap();

        let kinds: Vec<_> = font.providers.iter().map(Provider::kind).collect();
        assert_eq!(kinds, ["reference", "bitmap", "space", "ttf", "unihex"]);

        let Provider::Bitmap(bitmap) = &font.providers[1] else {
            panic!("expected bitmap");
        };
        assert_eq!(bitmap.height(), DEFAULT_BITMAP_HEIGHT);
    }

    #[test]
    fn test_lenient_skips_unknown_providers() {
        let value = json!({
            "providers": [
                {"type": "legacy_unicode", "sizes": "x"},
                {"type": "space", "advances": {" ": 4}}
            ]
        });
        let font = FontDescriptor::from_value_lenient(&value).unwrap();
        assert_eq!(font.providers.len(), 1);

        assert!(FontDescriptor::from_value_lenient(&json!({"providers": 3})).is_none());
        assert!(FontDescriptor::from_value_lenient(&json!([])).is_none());
    }

    #[test]
    fn test_override_band_defaults() {
        let band = OverrideBand::from(&SizeOverride::default());
        assert_eq!(band.from, 0);
        assert_eq!(band.to, 0x10FFFF);
        assert_eq!(band.left, 0.0);
        assert_eq!(band.right, 8.0);

        let band = OverrideBand::from(&SizeOverride {
            from: Some("a".into()),
            to: Some("z".into()),
            left: Some(1.0),
            right: Some(7.0),
        });
        assert!(band.contains('a' as u32));
        assert!(band.contains('z' as u32));
        assert!(!band.contains('{' as u32));
    }
}
