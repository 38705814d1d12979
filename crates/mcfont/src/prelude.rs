//! Prelude module for mcfont.
//!
//! ```ignore
//! use mcfont::prelude::*;
//! ```
//!
//! This provides access to:
//! - Asset collaborators (`AssetCatalog`, `BlobStore`, `AssetResolver`)
//! - Preview configuration (`PreviewConfig`, `PreviewLocation`, `HudStyle`)
//! - The pipeline (`Previewer`, `BuildSlot`, `PreviewError`)
//! - Font and layout types (`FontDescriptor`, `ResolvedFont`, `MadeText`)
//! - Drawing (`ImageBuffer`, `Compositor`, `Color`)

// ============================================================================
// Assets
// ============================================================================

pub use mcfont_core::{
    AssetCatalog, AssetResolver, BlobStore, MemoryBlobStore, NamespaceLookup, STARTER_FONT_PATH, StaticCatalog,
};

// ============================================================================
// Configuration
// ============================================================================

pub use mcfont_core::{HudStyle, LocationText, PreviewConfig, PreviewLocation};

// ============================================================================
// Pipeline
// ============================================================================

pub use crate::command::commands;
pub use crate::error::{PreviewError, PreviewResult};
pub use crate::pipeline::{BuildSlot, Previewer};

// ============================================================================
// Fonts and Layout
// ============================================================================

pub use mcfont_render::font::{FontBuilder, FontCache, FontDescriptor, ResolvedFont, validate_font};
pub use mcfont_render::layout::{MadeText, make_text};
pub use mcfont_render::text::parse_text;

// ============================================================================
// Drawing
// ============================================================================

pub use mcfont_render::{CANVAS_HEIGHT, CANVAS_WIDTH, Color, Compositor, DrawSurface, ImageBuffer};

#[cfg(feature = "networking")]
pub use mcfont_net::{RemoteCatalog, RemoteCatalogConfig};
