//! Preview configuration.
//!
//! A [`PreviewConfig`] selects the game version, the pixel scale, the HUD
//! backdrop, the base font file and the text shown at each on-screen
//! location. It can be stored as JSON or TOML:
//!
//! ```toml
//! version = "23w46a"
//! scale = 2
//! hud = "barebones"
//! base_file = "custom/font/foobar.json"
//!
//! [[locations]]
//! location = "title"
//! text = "§6Minecraft"
//! ```

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::catalog::DEFAULT_VERSION;
use crate::error::ConfigResult;
use crate::store::BlobStore;

/// Maximum number of configured locations (one per kind).
pub const MAX_LOCATIONS: usize = 4;

/// Where a line of text is shown on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewLocation {
    /// Bottom-left chat box.
    Chat,
    /// Large centered title.
    Title,
    /// Centered subtitle below the title.
    Subtitle,
    /// Centered line above the hotbar.
    Actionbar,
}

impl PreviewLocation {
    /// Order in which locations are painted.
    pub const DRAW_ORDER: [PreviewLocation; 4] = [
        PreviewLocation::Actionbar,
        PreviewLocation::Subtitle,
        PreviewLocation::Title,
        PreviewLocation::Chat,
    ];

    /// The lowercase identifier used in commands and configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            PreviewLocation::Chat => "chat",
            PreviewLocation::Title => "title",
            PreviewLocation::Subtitle => "subtitle",
            PreviewLocation::Actionbar => "actionbar",
        }
    }

    /// Whether text at this location may span several lines.
    pub fn allows_newlines(&self) -> bool {
        matches!(self, PreviewLocation::Chat)
    }
}

impl fmt::Display for PreviewLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HUD backdrop painted behind the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HudStyle {
    /// Full health, food and armor, fifth hotbar slot selected.
    #[default]
    Barebones,
    /// Randomized stats and selection.
    Random,
    /// Text only.
    None,
}

/// Text shown at one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationText {
    /// Where the text is shown.
    pub location: PreviewLocation,
    /// Raw text, including `§` format codes.
    pub text: String,
}

impl LocationText {
    /// Create a location entry.
    pub fn new(location: PreviewLocation, text: impl Into<String>) -> Self {
        Self {
            location,
            text: text.into(),
        }
    }
}

/// Configuration of a preview render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Game version whose assets are used.
    pub version: String,
    /// Integer pixel scale (GUI scale).
    pub scale: u32,
    /// HUD backdrop.
    pub hud: HudStyle,
    /// Storage path of the font descriptor being previewed.
    pub base_file: Option<String>,
    /// Text per location, at most one entry per kind.
    pub locations: Vec<LocationText>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            scale: 1,
            hud: HudStyle::default(),
            base_file: None,
            locations: vec![LocationText::new(PreviewLocation::Title, "Minecraft")],
        }
    }
}

impl PreviewConfig {
    /// Parse a JSON configuration.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str::<Self>(json)?.normalized())
    }

    /// Parse a TOML configuration.
    pub fn from_toml(text: &str) -> ConfigResult<Self> {
        Ok(toml::from_str::<Self>(text)?.normalized())
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string(self)?)
    }

    /// The effective scale (never below 1).
    pub fn scale(&self) -> u32 {
        self.scale.max(1)
    }

    /// Set or replace the text for a location.
    ///
    /// The text is unescaped with [`unescape_text`]. A new location is
    /// ignored once [`MAX_LOCATIONS`] entries exist.
    pub fn set_location(&mut self, location: PreviewLocation, text: &str) {
        let text = unescape_text(text);
        if let Some(entry) = self.locations.iter_mut().find(|l| l.location == location) {
            entry.text = text;
        } else if self.locations.len() < MAX_LOCATIONS {
            self.locations.push(LocationText::new(location, text));
        }
    }

    /// Remove the entry for a location.
    pub fn remove_location(&mut self, location: PreviewLocation) {
        self.locations.retain(|l| l.location != location);
    }

    /// The configured text for a location.
    pub fn location(&self, location: PreviewLocation) -> Option<&LocationText> {
        self.locations.iter().find(|l| l.location == location)
    }

    /// The base file, if it is a font descriptor that exists in `store`.
    pub fn base_file<'s>(&'s self, store: &impl BlobStore) -> Option<&'s str> {
        let path = self.base_file.as_deref()?;
        (is_font_descriptor_path(path) && store.exists(path)).then_some(path)
    }

    /// Select a new base file. Returns `false` (and keeps the old one) if
    /// `path` is not an existing font descriptor.
    pub fn set_base_file(&mut self, path: &str, store: &impl BlobStore) -> bool {
        if !is_font_descriptor_path(path) || !store.exists(path) {
            return false;
        }
        self.base_file = Some(path.to_string());
        true
    }

    fn normalized(mut self) -> Self {
        self.scale = self.scale.max(1);
        let mut seen = Vec::with_capacity(MAX_LOCATIONS);
        self.locations.retain(|l| {
            if seen.contains(&l.location) {
                return false;
            }
            seen.push(l.location);
            true
        });
        self
    }
}

/// Whether `path` has the `<namespace>/font/<...>.json` shape.
pub fn is_font_descriptor_path(path: &str) -> bool {
    path.split('/').nth(1) == Some("font") && path.ends_with(".json")
}

static UNICODE_ESCAPES: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?:\\u[a-fA-F0-9]{4})+")
        .map_err(|e| tracing::warn!(target: "mcfont_core", error = %e, "unicode escape pattern rejected"))
        .ok()
});

/// Expand `\uXXXX` escapes and `\n` in user-entered text.
///
/// Consecutive escapes are decoded as UTF-16, so surrogate pairs such as
/// `\ud83d\ude00` produce a single character. Unpaired surrogates become
/// U+FFFD. If the escape pattern is unavailable, `\uXXXX` is left as typed.
pub fn unescape_text(text: &str) -> String {
    let Some(pattern) = UNICODE_ESCAPES.as_ref() else {
        return text.replace("\\n", "\n");
    };
    let expanded = pattern.replace_all(text, |caps: &regex::Captures<'_>| {
        let units = caps[0]
            .split("\\u")
            .filter(|s| !s.is_empty())
            .filter_map(|hex| u16::from_str_radix(hex, 16).ok());
        char::decode_utf16(units)
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect::<String>()
    });
    expanded.replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryBlobStore;

    #[test]
    fn test_default_config() {
        let config = PreviewConfig::default();
        assert_eq!(config.version, "23w46a");
        assert_eq!(config.scale(), 1);
        assert_eq!(config.hud, HudStyle::Barebones);
        assert_eq!(
            config.location(PreviewLocation::Title).map(|l| l.text.as_str()),
            Some("Minecraft")
        );
    }

    #[test]
    fn test_from_json_normalizes() {
        let config = PreviewConfig::from_json(
            r#"{
                "scale": 0,
                "hud": "random",
                "locations": [
                    {"location": "chat", "text": "a"},
                    {"location": "chat", "text": "b"},
                    {"location": "actionbar", "text": "c"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.scale, 1);
        assert_eq!(config.hud, HudStyle::Random);
        assert_eq!(config.version, "23w46a");
        assert_eq!(config.locations.len(), 2);
        assert_eq!(config.location(PreviewLocation::Chat).unwrap().text, "a");
    }

    #[test]
    fn test_toml_roundtrip_preserves_locations() {
        let mut config = PreviewConfig::default();
        config.scale = 2;
        config.set_location(PreviewLocation::Chat, "hello");

        let text = config.to_toml().unwrap();
        let parsed = PreviewConfig::from_toml(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(PreviewConfig::from_json("{not json").is_err());
    }

    #[test]
    fn test_set_location_replaces_and_caps() {
        let mut config = PreviewConfig::default();
        config.set_location(PreviewLocation::Title, "New");
        assert_eq!(config.locations.len(), 1);
        assert_eq!(config.location(PreviewLocation::Title).unwrap().text, "New");

        for loc in PreviewLocation::DRAW_ORDER {
            config.set_location(loc, "x");
        }
        assert_eq!(config.locations.len(), MAX_LOCATIONS);

        config.remove_location(PreviewLocation::Chat);
        assert!(config.location(PreviewLocation::Chat).is_none());
    }

    #[test]
    fn test_base_file_rules() {
        let mut store = MemoryBlobStore::new();
        store.write("custom/font/a.json", b"{}".to_vec());
        store.write("custom/textures/a.json", b"{}".to_vec());

        let mut config = PreviewConfig::default();
        assert!(!config.set_base_file("custom/textures/a.json", &store));
        assert!(!config.set_base_file("custom/font/missing.json", &store));
        assert!(config.set_base_file("custom/font/a.json", &store));
        assert_eq!(config.base_file(&store), Some("custom/font/a.json"));

        store.delete_file("custom/font/a.json");
        assert_eq!(config.base_file(&store), None);
    }

    #[test]
    fn test_unescape_text() {
        let esc = |hex: &str| format!("\\u{hex}");
        assert_eq!(unescape_text(&format!("a{}b", esc("00a7"))), "a\u{a7}b");
        assert_eq!(unescape_text(r"line\nnext"), "line\nnext");
        assert_eq!(unescape_text(&format!("{}{}", esc("d83d"), esc("de00"))), "\u{1F600}");
        assert_eq!(unescape_text(&format!("{}!", esc("d83d"))), "\u{FFFD}!");
        assert_eq!(unescape_text(r"\u12"), r"\u12");
    }

    #[test]
    fn test_unicode_escape_pattern_compiles() {
        assert!(UNICODE_ESCAPES.is_some());
    }

    #[test]
    fn test_location_helpers() {
        assert!(PreviewLocation::Chat.allows_newlines());
        assert!(!PreviewLocation::Title.allows_newlines());
        assert_eq!(PreviewLocation::Actionbar.to_string(), "actionbar");
        assert!(is_font_descriptor_path("x/font/y.json"));
        assert!(!is_font_descriptor_path("x/fonts/y.json"));
    }
}
