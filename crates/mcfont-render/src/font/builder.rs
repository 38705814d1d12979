//! Resolving a font descriptor into a [`ResolvedFont`].
//!
//! Providers are walked last to first. Each provider's glyphs are appended
//! to the character-map list, and a referenced font is resolved in place,
//! so the list ends up ordered from the last-declared provider to the
//! first-declared one. Glyph lookup scans that list from the end, which
//! makes an earlier-declared provider win on overlapping codepoints.
//! Spacing is a flat map where whatever is merged last wins; that is also
//! the first-declared provider.
//!
//! References are followed with an explicit stack of frames rather than
//! recursion. A [`Visited`] set guards against reference cycles and against
//! loading the same hex archive twice; revisits are skipped silently.
//!
//! A provider whose asset cannot be fetched or decoded contributes nothing.
//! Building itself never fails.

use std::collections::HashSet;
use std::sync::Arc;

use mcfont_core::{AssetCatalog, AssetResolver, BlobStore, namespace_path, perf_span};
use serde_json::Value;
use tracing::Instrument;

use super::bitmap::BitmapMap;
use super::cache::FontCache;
use super::descriptor::{BitmapProvider, FontDescriptor, OverrideBand, Provider, UnihexProvider};
use super::resolved::{CharacterMap, ResolvedFont};
use super::unihex::{HexArchive, UnihexMap};
use crate::image_buffer::ImageBuffer;

/// Font ids and hex archives already seen in one resolution tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Visited {
    fonts: HashSet<String>,
    hex_files: HashSet<String>,
}

impl Visited {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a font id. Returns `false` if it was already seen.
    pub fn visit_font(&mut self, id: &str) -> bool {
        self.fonts.insert(id.to_string())
    }

    /// Mark a hex archive id. Returns `false` if it was already seen.
    pub fn visit_hex_file(&mut self, id: &str) -> bool {
        self.hex_files.insert(id.to_string())
    }

    pub fn has_font(&self, id: &str) -> bool {
        self.fonts.contains(id)
    }

    pub fn has_hex_file(&self, id: &str) -> bool {
        self.hex_files.contains(id)
    }
}

/// One font being resolved: the providers still to process and the
/// results so far.
struct Frame {
    id: String,
    pending: Vec<Provider>,
    resolved: ResolvedFont,
}

impl Frame {
    fn new(id: &str, descriptor: FontDescriptor) -> Self {
        Self {
            id: id.to_string(),
            // Popping from the end walks providers last to first.
            pending: descriptor.providers,
            resolved: ResolvedFont::default(),
        }
    }

    fn merge(&mut self, child: ResolvedFont) {
        self.resolved.spacing.extend(child.spacing);
        self.resolved.characters.extend(child.characters);
    }
}

/// Builds fonts against an asset resolver, memoizing decoded assets in a
/// [`FontCache`].
///
/// # Example
///
/// ```ignore
/// let cache = FontCache::new();
/// let builder = FontBuilder::new(AssetResolver::new(&catalog, &store), &cache);
/// let font = builder.build("custom:foobar", &descriptor).await;
/// ```
pub struct FontBuilder<'a, C, B> {
    assets: AssetResolver<'a, C, B>,
    cache: &'a FontCache,
}

impl<'a, C: AssetCatalog, B: BlobStore> FontBuilder<'a, C, B> {
    /// Create a builder.
    pub fn new(assets: AssetResolver<'a, C, B>, cache: &'a FontCache) -> Self {
        Self { assets, cache }
    }

    /// Resolve `descriptor`, known under `id`, with a fresh visited set.
    pub async fn build(&self, id: &str, descriptor: &FontDescriptor) -> ResolvedFont {
        let mut visited = Visited::new();
        self.build_with_visited(id, descriptor, &mut visited).await
    }

    /// Resolve `descriptor` and record every font and archive it reaches in
    /// `visited`.
    pub async fn build_with_visited(
        &self,
        id: &str,
        descriptor: &FontDescriptor,
        visited: &mut Visited,
    ) -> ResolvedFont {
        let span = tracing::debug_span!(target: "mcfont_render::font", "build", id);
        self.resolve(id, descriptor, visited)
            .instrument(span)
            .instrument(perf_span("font_build"))
            .await
    }

    async fn resolve(&self, id: &str, descriptor: &FontDescriptor, visited: &mut Visited) -> ResolvedFont {
        visited.visit_font(id);
        let mut stack = vec![Frame::new(id, descriptor.clone())];

        loop {
            let Some(frame) = stack.last_mut() else {
                return ResolvedFont::default();
            };

            let Some(provider) = frame.pending.pop() else {
                let Some(done) = stack.pop() else {
                    return ResolvedFont::default();
                };
                match stack.last_mut() {
                    Some(parent) => parent.merge(done.resolved),
                    None => {
                        tracing::debug!(
                            target: "mcfont_render::font",
                            id = %done.id,
                            maps = done.resolved.characters.len(),
                            spacing = done.resolved.spacing.len(),
                            "font built"
                        );
                        return done.resolved;
                    }
                }
                continue;
            };

            match provider {
                Provider::Reference { id } => {
                    if !visited.visit_font(&id) {
                        tracing::trace!(target: "mcfont_render::font", id = %id, "reference already included");
                        continue;
                    }
                    if let Some(referenced) = self.load_reference(&id).await {
                        stack.push(Frame::new(&id, referenced));
                    }
                }
                Provider::Space { advances } => {
                    for (key, width) in advances {
                        if let Some(c) = key.chars().next() {
                            frame.resolved.spacing.insert(u32::from(c), width);
                        }
                    }
                }
                Provider::Ttf(ttf) => {
                    tracing::trace!(target: "mcfont_render::font", file = %ttf.file, "ttf providers are not rendered");
                }
                Provider::Unihex(unihex) => {
                    if !visited.visit_hex_file(&unihex.hex_file) {
                        continue;
                    }
                    if let Some(map) = self.load_unihex(&unihex).await {
                        frame.resolved.characters.push(CharacterMap::Unihex(map));
                    }
                }
                Provider::Bitmap(bitmap) => {
                    if let Some(map) = self.load_bitmap(&bitmap).await {
                        frame.resolved.characters.push(CharacterMap::Bitmap(map));
                    }
                }
            }
        }
    }

    async fn load_reference(&self, id: &str) -> Option<FontDescriptor> {
        let path = namespace_path(&format!("{id}.json"), &["font"]);
        let bytes = match self.assets.read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(target: "mcfont_render::font", id, error = %e, "referenced font unavailable");
                return None;
            }
        };
        let value: Value = match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(target: "mcfont_render::font", path = %path, error = %e, "referenced font is not valid JSON");
                return None;
            }
        };
        let descriptor = FontDescriptor::from_value_lenient(&value);
        if descriptor.is_none() {
            tracing::warn!(target: "mcfont_render::font", path = %path, "referenced font has no provider list");
        }
        descriptor
    }

    async fn load_unihex(&self, provider: &UnihexProvider) -> Option<UnihexMap> {
        let path = namespace_path(&provider.hex_file, &[]);

        let archive = match self.cache.archive(&path) {
            Some(archive) => archive,
            None => {
                let bytes = match self.assets.read(&path).await {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        tracing::debug!(target: "mcfont_render::font", path = %path, error = %e, "hex archive unavailable");
                        return None;
                    }
                };
                match HexArchive::from_zip(&bytes) {
                    Ok(archive) => self.cache.insert_archive(&path, archive),
                    Err(e) => {
                        tracing::warn!(target: "mcfont_render::font", path = %path, error = %e, "skipping unihex provider");
                        return None;
                    }
                }
            }
        };

        let bands: Vec<OverrideBand> = provider.size_overrides.iter().map(OverrideBand::from).collect();
        Some(UnihexMap::from_archive(&archive, &bands))
    }

    async fn load_bitmap(&self, provider: &BitmapProvider) -> Option<BitmapMap> {
        let path = namespace_path(&provider.file, &["textures"]);
        let bytes = match self.assets.read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(target: "mcfont_render::font", path = %path, error = %e, "atlas unavailable");
                return None;
            }
        };
        let image = match ImageBuffer::from_bytes(&bytes) {
            Ok(image) => Arc::new(image),
            Err(e) => {
                tracing::warn!(target: "mcfont_render::font", path = %path, error = %e, "skipping bitmap provider");
                return None;
            }
        };

        let mask = self.cache.mask(&path, &image);
        let map = BitmapMap::slice(provider, image, &mask);
        if map.is_none() {
            tracing::warn!(target: "mcfont_render::font", path = %path, "atlas too small for its character grid");
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::resolved::Glyph;
    use crate::types::Color;
    use mcfont_core::{MemoryBlobStore, StaticCatalog};
    use serde_json::json;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn png(width: u32, height: u32, opaque_columns: u32) -> Vec<u8> {
        let mut image = ImageBuffer::new(width, height);
        for x in 0..opaque_columns {
            for y in 0..height {
                image.set_pixel(x, y, Color::WHITE);
            }
        }
        image.to_png().unwrap()
    }

    fn hex_zip(lines: &str) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("glyphs.hex", SimpleFileOptions::default()).unwrap();
        zip.write_all(lines.as_bytes()).unwrap();
        zip.finish().unwrap().into_inner()
    }

    fn descriptor(value: Value) -> FontDescriptor {
        serde_json::from_value(value).unwrap()
    }

    fn write_json(store: &mut MemoryBlobStore, path: &str, value: Value) {
        store.write(path, serde_json::to_vec(&value).unwrap());
    }

    #[tokio::test]
    async fn test_bitmap_and_space() {
        let catalog = StaticCatalog::default().with_asset("minecraft/textures/font/a.png", png(8, 8, 8));
        let store = MemoryBlobStore::new();
        let cache = FontCache::new();
        let builder = FontBuilder::new(AssetResolver::new(&catalog, &store), &cache);

        let font = builder
            .build(
                "custom:test",
                &descriptor(json!({"providers": [
                    {"type": "space", "advances": {" ": 4}},
                    {"type": "bitmap", "file": "minecraft:font/a.png", "ascent": 7, "chars": ["A"]}
                ]})),
            )
            .await;

        assert_eq!(font.advance(' ' as u32), Some(4.0));
        let Some(Glyph::Bitmap(map, glyph)) = font.glyph('A' as u32) else {
            panic!("expected bitmap glyph");
        };
        assert_eq!(glyph.trimmed_width, 8);
        assert_eq!(map.ascent, 7.0);
        assert_eq!(cache.mask_count(), 1);
    }

    #[tokio::test]
    async fn test_earlier_provider_wins() {
        let catalog = StaticCatalog::default()
            .with_asset("minecraft/textures/font/wide.png", png(8, 8, 8))
            .with_asset("minecraft/textures/font/narrow.png", png(8, 8, 2));
        let store = MemoryBlobStore::new();
        let cache = FontCache::new();
        let builder = FontBuilder::new(AssetResolver::new(&catalog, &store), &cache);

        let font = builder
            .build(
                "custom:test",
                &descriptor(json!({"providers": [
                    {"type": "space", "advances": {"x": 3}},
                    {"type": "bitmap", "file": "minecraft:font/narrow.png", "ascent": 7, "chars": ["A"]},
                    {"type": "bitmap", "file": "minecraft:font/wide.png", "ascent": 7, "chars": ["A"]},
                    {"type": "space", "advances": {"x": 9}}
                ]})),
            )
            .await;

        let Some(Glyph::Bitmap(_, glyph)) = font.glyph('A' as u32) else {
            panic!("expected bitmap glyph");
        };
        assert_eq!(glyph.trimmed_width, 2);
        assert_eq!(font.advance('x' as u32), Some(3.0));
    }

    #[tokio::test]
    async fn test_reference_cycle_terminates() {
        let catalog = StaticCatalog::default().with_asset("minecraft/textures/font/a.png", png(8, 8, 8));
        let mut store = MemoryBlobStore::new();
        write_json(
            &mut store,
            "custom/font/a.json",
            json!({"providers": [
                {"type": "reference", "id": "custom:b"},
                {"type": "bitmap", "file": "minecraft:font/a.png", "ascent": 7, "chars": ["A"]}
            ]}),
        );
        write_json(
            &mut store,
            "custom/font/b.json",
            json!({"providers": [
                {"type": "reference", "id": "custom:a"},
                {"type": "space", "advances": {" ": 4}}
            ]}),
        );
        let cache = FontCache::new();
        let builder = FontBuilder::new(AssetResolver::new(&catalog, &store), &cache);

        let root = descriptor(serde_json::from_slice(&store.read("custom/font/a.json").unwrap()).unwrap());
        let mut visited = Visited::new();
        let font = builder.build_with_visited("custom:a", &root, &mut visited).await;

        // A's bitmap appears once; B contributes its spacing.
        assert_eq!(font.characters.len(), 1);
        assert_eq!(font.advance(' ' as u32), Some(4.0));
        assert!(visited.has_font("custom:a"));
        assert!(visited.has_font("custom:b"));
    }

    #[tokio::test]
    async fn test_referenced_spacing_overwrites() {
        let catalog = StaticCatalog::default();
        let mut store = MemoryBlobStore::new();
        write_json(
            &mut store,
            "custom/font/inner.json",
            json!({"providers": [{"type": "space", "advances": {" ": 6}}]}),
        );
        let cache = FontCache::new();
        let builder = FontBuilder::new(AssetResolver::new(&catalog, &store), &cache);

        let font = builder
            .build(
                "custom:outer",
                &descriptor(json!({"providers": [
                    {"type": "reference", "id": "custom:inner"},
                    {"type": "space", "advances": {" ": 2}}
                ]})),
            )
            .await;
        assert_eq!(font.advance(' ' as u32), Some(6.0));
    }

    #[tokio::test]
    async fn test_unihex_cached_and_deduplicated() {
        let bits = "F".repeat(32);
        let catalog = StaticCatalog::default()
            .with_asset("minecraft/font/unifont.zip", hex_zip(&format!("0041:{bits}\n3042:{bits}\n")));
        let store = MemoryBlobStore::new();
        let cache = FontCache::new();
        let builder = FontBuilder::new(AssetResolver::new(&catalog, &store), &cache);

        let font_descriptor = descriptor(json!({"providers": [
            {"type": "unihex", "hex_file": "minecraft:font/unifont.zip", "size_overrides": [
                {"from": "A", "to": "Z", "left": 1, "right": 7}
            ]},
            {"type": "unihex", "hex_file": "minecraft:font/unifont.zip", "size_overrides": []}
        ]}));

        let font = builder.build("custom:test", &font_descriptor).await;
        // The second provider is processed first; its empty band list drops
        // every glyph, and the first provider is skipped as a revisit.
        assert_eq!(font.characters.len(), 1);
        assert!(font.glyph('A' as u32).is_none());
        assert_eq!(cache.archive_count(), 1);

        let font_descriptor = descriptor(json!({"providers": [
            {"type": "unihex", "hex_file": "minecraft:font/unifont.zip", "size_overrides": [
                {"from": "A", "to": "Z", "left": 1, "right": 7}
            ]}
        ]}));
        let font = builder.build("custom:test", &font_descriptor).await;
        let Some(Glyph::Unihex(glyph)) = font.glyph('A' as u32) else {
            panic!("expected unihex glyph");
        };
        assert_eq!((glyph.left, glyph.right), (1.0, 7.0));
        assert!(font.glyph(0x3042).is_none());
    }

    #[tokio::test]
    async fn test_soft_failures() {
        let catalog = StaticCatalog::default()
            .with_asset("minecraft/textures/font/broken.png", b"not a png".to_vec())
            .with_asset("minecraft/font/broken.zip", b"not a zip".to_vec());
        let mut store = MemoryBlobStore::new();
        store.write("custom/font/bad.json", b"{".to_vec());
        let cache = FontCache::new();
        let builder = FontBuilder::new(AssetResolver::new(&catalog, &store), &cache);

        let font = builder
            .build(
                "custom:test",
                &descriptor(json!({"providers": [
                    {"type": "bitmap", "file": "minecraft:font/broken.png", "ascent": 7, "chars": ["A"]},
                    {"type": "bitmap", "file": "minecraft:font/missing.png", "ascent": 7, "chars": ["A"]},
                    {"type": "unihex", "hex_file": "minecraft:font/broken.zip"},
                    {"type": "reference", "id": "custom:bad"},
                    {"type": "reference", "id": "custom:missing"},
                    {"type": "ttf", "file": "minecraft:x.ttf"}
                ]})),
            )
            .await;
        assert!(font.is_empty());
        assert_eq!(cache.archive_count(), 0);
    }

    #[tokio::test]
    async fn test_build_is_idempotent() {
        let catalog = StaticCatalog::default()
            .with_asset("minecraft/textures/font/a.png", png(16, 8, 3))
            .with_asset("minecraft/font/u.zip", hex_zip(&format!("0042:{}\n", "A".repeat(32))));
        let store = MemoryBlobStore::new();
        let cache = FontCache::new();
        let builder = FontBuilder::new(AssetResolver::new(&catalog, &store), &cache);
        let font_descriptor = descriptor(json!({"providers": [
            {"type": "bitmap", "file": "minecraft:font/a.png", "ascent": 7, "chars": ["AB"]},
            {"type": "unihex", "hex_file": "minecraft:font/u.zip", "size_overrides": [{}]},
            {"type": "space", "advances": {" ": 4}}
        ]}));

        let first = builder.build("custom:test", &font_descriptor).await;
        let second = builder.build("custom:test", &font_descriptor).await;
        assert_eq!(first, second);
        assert_eq!(first.characters.len(), 2);
    }
}
