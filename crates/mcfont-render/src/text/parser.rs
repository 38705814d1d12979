//! Splitting legacy-formatted strings into styled runs.
//!
//! Legacy formatting uses a section sign followed by one code character:
//! `0`-`f` select a color, `k l m n o` switch on a format, `r` resets.
//! Each run captures the codes seen since the previous run; codes never
//! carry over into the emitted struct of a later run, which is why layout
//! keeps its own accumulator.

use serde::{Deserialize, Serialize};

use super::color::{ChatColor, FormatCode};

/// The format-code marker.
pub const SECTION_SIGN: char = '\u{a7}';

/// A run of text with the style codes that preceded it.
///
/// Serializes as a JSON text component with absent fields omitted, so a
/// list of runs can be pasted into `/tellraw` or `/title`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParsedTextKey {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obfuscated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strikethrough: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset: Option<bool>,
    pub font: String,
}

impl ParsedTextKey {
    /// An unstyled run.
    pub fn new(text: impl Into<String>, font: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: font.into(),
            ..Self::default()
        }
    }

    /// Whether the run carries any style attribute.
    pub fn is_unstyled(&self) -> bool {
        self.color.is_none()
            && self.obfuscated.is_none()
            && self.bold.is_none()
            && self.strikethrough.is_none()
            && self.underline.is_none()
            && self.italic.is_none()
            && self.reset.is_none()
    }

    fn apply(&mut self, code: char) {
        if let Some(color) = ChatColor::from_code(code) {
            self.color = Some(color.name().to_string());
            return;
        }
        match FormatCode::from_code(code) {
            Some(FormatCode::Obfuscated) => self.obfuscated = Some(true),
            Some(FormatCode::Bold) => self.bold = Some(true),
            Some(FormatCode::Strikethrough) => self.strikethrough = Some(true),
            Some(FormatCode::Underline) => self.underline = Some(true),
            Some(FormatCode::Italic) => self.italic = Some(true),
            Some(FormatCode::Reset) => {
                *self = Self::default();
                self.reset = Some(true);
            }
            None => {}
        }
    }
}

fn is_code_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit()
}

/// Parse `raw` into styled runs tagged with `font`.
///
/// Empty segments are dropped. Input that yields no run at all produces a
/// single empty run carrying only the font.
///
/// ```
/// use mcfont_render::text::parse_text;
///
/// let runs = parse_text("\u{a7}agood\u{a7}r normal", "");
/// assert_eq!(runs.len(), 2);
/// assert_eq!(runs[0].color.as_deref(), Some("green"));
/// assert_eq!(runs[1].color, None);
/// ```
pub fn parse_text(raw: &str, font: &str) -> Vec<ParsedTextKey> {
    let mut keys = Vec::new();
    let mut pending = ParsedTextKey::default();
    let mut segment_start = 0;

    let mut chars = raw.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c != SECTION_SIGN {
            continue;
        }
        let Some(&(j, code)) = chars.peek() else {
            break;
        };
        if !is_code_char(code) {
            continue;
        }
        chars.next();

        let text = &raw[segment_start..i];
        if !text.is_empty() {
            keys.push(emit(&mut pending, text, font));
        }
        pending.apply(code);
        segment_start = j + code.len_utf8();
    }

    let tail = &raw[segment_start..];
    if !tail.is_empty() {
        keys.push(emit(&mut pending, tail, font));
    }

    if keys.is_empty() {
        keys.push(ParsedTextKey::new("", font));
    }
    keys
}

fn emit(pending: &mut ParsedTextKey, text: &str, font: &str) -> ParsedTextKey {
    let mut run = std::mem::take(pending);
    run.text = text.to_string();
    run.font = font.to_string();
    run
}
