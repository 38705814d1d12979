//! Chat commands that reproduce a preview in game.
//!
//! Chat text becomes `/tellraw @s <json>`; every other location becomes
//! `/title @s <location> <json>`. The JSON is the location's parsed runs
//! tagged with the previewed font, a bare object when there is only one.

use std::fmt::Write;

use mcfont_core::{BlobStore, LocationText, PreviewConfig, PreviewLocation};
use mcfont_render::text::parse_text;

use crate::error::{PreviewError, PreviewResult};
use crate::pipeline::font_id;

/// Escape every UTF-16 code unit from U+0100 up as lowercase `\uXXXX`.
///
/// Characters outside the Basic Multilingual Plane are escaped as their two
/// surrogates, so the command survives clients that mangle non-Latin text.
pub fn escape_non_latin(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut units = [0u16; 2];
    for c in json.chars() {
        if u32::from(c) < 0x100 {
            out.push(c);
            continue;
        }
        for unit in c.encode_utf16(&mut units) {
            let _ = write!(out, "\\u{unit:04x}");
        }
    }
    out
}

/// The text component JSON for `text` drawn with `font`.
pub fn text_component(text: &str, font: &str) -> PreviewResult<String> {
    let runs = parse_text(text, font);
    let json = match runs.as_slice() {
        [single] => serde_json::to_string(single),
        many => serde_json::to_string(many),
    }
    .map_err(|e| PreviewError::Encode(e.to_string()))?;
    Ok(escape_non_latin(&json))
}

/// The command showing `entry` in `font`.
pub fn command_for(entry: &LocationText, font: &str) -> PreviewResult<String> {
    let json = text_component(&entry.text, font)?;
    Ok(match entry.location {
        PreviewLocation::Chat => format!("/tellraw @s {json}"),
        location => format!("/title @s {location} {json}"),
    })
}

/// One command per configured location, in configuration order.
///
/// Without a valid base file there is no font to tag the text with and no
/// commands are produced.
pub fn commands(config: &PreviewConfig, store: &impl BlobStore) -> PreviewResult<Vec<String>> {
    let Some(base) = config.base_file(store) else {
        return Ok(Vec::new());
    };
    let font = font_id(base);
    config.locations.iter().map(|entry| command_for(entry, &font)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcfont_core::MemoryBlobStore;

    #[test]
    fn test_escape_non_latin() {
        assert_eq!(escape_non_latin("caf\u{e9}"), "caf\u{e9}");
        assert_eq!(escape_non_latin("\u{4e00}"), "\\u4e00");
        assert_eq!(escape_non_latin("\u{1f600}"), "\\ud83d\\ude00");
        assert_eq!(escape_non_latin("\u{a7}a"), "\u{a7}a");
    }

    #[test]
    fn test_single_run_is_object() {
        let json = text_component("hello", "custom:foobar").unwrap();
        assert_eq!(json, r#"{"text":"hello","font":"custom:foobar"}"#);
    }

    #[test]
    fn test_styled_runs_are_list() {
        let json = text_component("\u{a7}agood\u{a7}r normal", "custom:foobar").unwrap();
        assert_eq!(
            json,
            r#"[{"text":"good","color":"green","font":"custom:foobar"},{"text":" normal","reset":true,"font":"custom:foobar"}]"#
        );
    }

    #[test]
    fn test_command_per_location() {
        let chat = LocationText::new(PreviewLocation::Chat, "hi");
        assert_eq!(
            command_for(&chat, "a:b").unwrap(),
            r#"/tellraw @s {"text":"hi","font":"a:b"}"#
        );

        let title = LocationText::new(PreviewLocation::Subtitle, "\u{4e00}");
        assert_eq!(
            command_for(&title, "a:b").unwrap(),
            r#"/title @s subtitle {"text":"\u4e00","font":"a:b"}"#
        );
    }

    #[test]
    fn test_commands_need_base_file() {
        let mut store = MemoryBlobStore::new();
        let mut config = PreviewConfig::default();
        assert!(commands(&config, &store).unwrap().is_empty());

        store.write("custom/font/foobar.json", b"{}".to_vec());
        assert!(config.set_base_file("custom/font/foobar.json", &store));
        assert_eq!(
            commands(&config, &store).unwrap(),
            vec![r#"/title @s title {"text":"Minecraft","font":"custom:foobar"}"#.to_string()]
        );
    }
}
