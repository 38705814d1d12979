//! The end-to-end preview pipeline.
//!
//! A preview is produced in two stages:
//!
//! 1. [`Previewer::build_font`] reads the configured base file, parses it,
//!    validates it, decodes it and resolves it into a [`ResolvedFont`].
//!    Any failure here stops the pipeline with a [`PreviewError`]; nothing
//!    is drawn for an invalid descriptor.
//! 2. [`Previewer::render`] draws the HUD backdrop and every configured
//!    location onto an 854x480 canvas.
//!
//! Font builds are asynchronous and cannot be cancelled. When the input
//! changes while a build is running, start a new one and let
//! [`BuildSlot`] drop whichever result is no longer the latest.
//!
//! ```ignore
//! let cache = FontCache::new();
//! let previewer = Previewer::new(AssetResolver::new(&catalog, &store), &cache);
//! let image = previewer.preview(&config, &mut rand::thread_rng()).await?;
//! image.save("preview.png")?;
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use mcfont_core::{
    AssetCatalog, AssetResolver, BlobStore, PerfSpan, PreviewConfig, is_font_descriptor_path, to_namespace,
};
use mcfont_render::font::{FontBuilder, FontCache, FontDescriptor, ResolvedFont, validate_font};
use mcfont_render::{CANVAS_HEIGHT, CANVAS_WIDTH, Compositor, HudSprites, HudStats, ImageBuffer, draw_hud};
use parking_lot::Mutex;
use rand::Rng;
use serde_json::Value;

use crate::error::{PreviewError, PreviewResult};

/// The namespaced font id of a descriptor path.
///
/// `custom/font/foobar.json` becomes `custom:foobar`.
pub fn font_id(path: &str) -> String {
    let id = to_namespace(path, 1);
    match id.strip_suffix(".json") {
        Some(stripped) => stripped.to_string(),
        None => id,
    }
}

/// Runs the preview pipeline against one asset snapshot.
pub struct Previewer<'a, C, B> {
    assets: AssetResolver<'a, C, B>,
    cache: &'a FontCache,
}

impl<'a, C: AssetCatalog, B: BlobStore> Previewer<'a, C, B> {
    /// Create a previewer. `cache` may be shared across previewers and
    /// outlives any single build.
    pub fn new(assets: AssetResolver<'a, C, B>, cache: &'a FontCache) -> Self {
        Self { assets, cache }
    }

    pub fn assets(&self) -> AssetResolver<'a, C, B> {
        self.assets
    }

    /// Read, parse, validate and decode the configured base file.
    ///
    /// Returns the descriptor's storage path alongside it.
    pub fn load_descriptor(&self, config: &PreviewConfig) -> PreviewResult<(String, FontDescriptor)> {
        let path = config
            .base_file
            .as_deref()
            .filter(|p| is_font_descriptor_path(p))
            .ok_or(PreviewError::NoBaseFile)?;
        let bytes = self
            .assets
            .store()
            .read(path)
            .ok_or_else(|| PreviewError::MissingBaseFile(path.to_string()))?;

        let json: Value = serde_json::from_slice(&bytes).map_err(|e| {
            tracing::debug!(target: "mcfont", path, error = %e, "base file is not JSON");
            PreviewError::ParseFailed(path.to_string())
        })?;
        validate_font(&json, &self.assets)?;
        let descriptor = serde_json::from_value(json).map_err(|e| PreviewError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        Ok((path.to_string(), descriptor))
    }

    /// Resolve the configured base file into a font.
    pub async fn build_font(&self, config: &PreviewConfig) -> PreviewResult<ResolvedFont> {
        let (path, descriptor) = self.load_descriptor(config)?;
        let id = font_id(&path);
        tracing::debug!(target: "mcfont", id = %id, "building preview font");
        Ok(FontBuilder::new(self.assets, self.cache).build(&id, &descriptor).await)
    }

    /// Draw the HUD and every configured location with `font`.
    pub async fn render<R: Rng + ?Sized>(
        &self,
        config: &PreviewConfig,
        font: &ResolvedFont,
        rng: &mut R,
    ) -> ImageBuffer {
        let stats = HudStats::for_style(config.hud, rng);
        let sprites = match stats {
            Some(_) => HudSprites::load(self.assets).await,
            None => HudSprites::default(),
        };

        let _perf = PerfSpan::new("render");
        let scale = config.scale();
        let mut canvas = ImageBuffer::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        if let Some(stats) = &stats {
            draw_hud(&mut canvas, &sprites, stats, scale);
        }

        let mut compositor = Compositor::new(canvas);
        compositor.draw_locations(font, &config.locations, scale, rng);
        compositor.into_target()
    }

    /// Build the font and render it.
    pub async fn preview<R: Rng + ?Sized>(&self, config: &PreviewConfig, rng: &mut R) -> PreviewResult<ImageBuffer> {
        let font = self.build_font(config).await?;
        Ok(self.render(config, &font, rng).await)
    }
}

/// Identifies one build started through a [`BuildSlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BuildTicket(u64);

/// Holds the result of the most recently started build.
///
/// Every build takes a ticket when it starts. A finished build is stored
/// only if no newer build has started since, so a slow stale build can
/// never overwrite a fresher result.
#[derive(Default)]
pub struct BuildSlot {
    generation: AtomicU64,
    current: Mutex<Option<Arc<PreviewResult<ResolvedFont>>>>,
}

impl BuildSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a build, superseding every earlier ticket.
    pub fn begin(&self) -> BuildTicket {
        BuildTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` belongs to the latest build.
    pub fn is_latest(&self, ticket: BuildTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Store a finished build. Returns `false` if it was superseded.
    pub fn complete(&self, ticket: BuildTicket, outcome: PreviewResult<ResolvedFont>) -> bool {
        let mut current = self.current.lock();
        if !self.is_latest(ticket) {
            tracing::debug!(target: "mcfont", ticket = ticket.0, "discarding superseded build");
            return false;
        }
        *current = Some(Arc::new(outcome));
        true
    }

    /// The latest stored result, if any build has finished.
    pub fn current(&self) -> Option<Arc<PreviewResult<ResolvedFont>>> {
        self.current.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcfont_core::{MemoryBlobStore, StaticCatalog};

    fn store_with(path: &str, data: &[u8]) -> MemoryBlobStore {
        let mut store = MemoryBlobStore::new();
        store.write(path, data.to_vec());
        store
    }

    fn config(base: &str) -> PreviewConfig {
        PreviewConfig {
            base_file: Some(base.to_string()),
            ..PreviewConfig::default()
        }
    }

    #[test]
    fn test_font_id() {
        assert_eq!(font_id("custom/font/foobar.json"), "custom:foobar");
        assert_eq!(font_id("custom/font/ui/small.json"), "custom:ui/small");
    }

    #[test]
    fn test_no_base_file() {
        let catalog = StaticCatalog::default();
        let store = MemoryBlobStore::new();
        let cache = FontCache::new();
        let previewer = Previewer::new(AssetResolver::new(&catalog, &store), &cache);

        let err = previewer.load_descriptor(&PreviewConfig::default()).unwrap_err();
        assert_eq!(err, PreviewError::NoBaseFile);
        assert_eq!(err.to_string(), "No base file selected");

        let err = previewer.load_descriptor(&config("custom/textures/a.png")).unwrap_err();
        assert_eq!(err, PreviewError::NoBaseFile);
    }

    #[test]
    fn test_missing_and_malformed_base_file() {
        let catalog = StaticCatalog::default();
        let store = store_with("custom/font/broken.json", b"{\"providers\": [");
        let cache = FontCache::new();
        let previewer = Previewer::new(AssetResolver::new(&catalog, &store), &cache);

        let err = previewer.load_descriptor(&config("custom/font/gone.json")).unwrap_err();
        assert_eq!(err, PreviewError::MissingBaseFile("custom/font/gone.json".into()));

        let err = previewer.load_descriptor(&config("custom/font/broken.json")).unwrap_err();
        assert_eq!(err.to_string(), "Failed to parse custom/font/broken.json");
    }

    #[test]
    fn test_invalid_descriptor_stops_pipeline() {
        let catalog = StaticCatalog::default();
        let store = store_with("custom/font/a.json", br#"{"providers": {}}"#);
        let cache = FontCache::new();
        let previewer = Previewer::new(AssetResolver::new(&catalog, &store), &cache);

        let err = previewer.load_descriptor(&config("custom/font/a.json")).unwrap_err();
        let PreviewError::Validation(validation) = err else {
            panic!("expected a validation error");
        };
        assert_eq!(validation.path, "providers");
    }

    #[tokio::test]
    async fn test_space_only_font_builds() {
        let catalog = StaticCatalog::default();
        let store = store_with(
            "custom/font/a.json",
            br#"{"providers": [{"type": "space", "advances": {" ": 4}}]}"#,
        );
        let cache = FontCache::new();
        let previewer = Previewer::new(AssetResolver::new(&catalog, &store), &cache);

        let font = previewer.build_font(&config("custom/font/a.json")).await.unwrap();
        assert_eq!(font.advance(' ' as u32), Some(4.0));
        assert!(font.characters.is_empty());
    }

    #[test]
    fn test_build_slot_last_build_wins() {
        let slot = BuildSlot::new();
        assert!(slot.current().is_none());

        let first = slot.begin();
        let second = slot.begin();
        assert!(!slot.is_latest(first));

        assert!(slot.complete(second, Err(PreviewError::NoBaseFile)));
        assert!(!slot.complete(first, Ok(ResolvedFont::new())));

        let current = slot.current().unwrap();
        assert_eq!(*current, Err(PreviewError::NoBaseFile));
    }
}
