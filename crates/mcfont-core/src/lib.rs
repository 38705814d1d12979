//! Core systems for mcfont.
//!
//! This crate provides the collaborators the font pipeline runs against:
//!
//! - [`AssetCatalog`]: the vanilla assets of one game version
//! - [`BlobStore`]: the user's own resource-pack files
//! - [`AssetResolver`]: namespaced id resolution over both
//! - [`Fetching`]: in-flight tracking for bulk refreshes
//! - [`PreviewConfig`]: what to render and how
//!
//! # Example
//!
//! ```
//! use mcfont_core::{AssetResolver, MemoryBlobStore, NamespaceLookup, StaticCatalog};
//!
//! let catalog = StaticCatalog::default()
//!     .with_asset("minecraft/textures/font/ascii.png", Vec::new());
//! let store = MemoryBlobStore::with_starter_font();
//! let resolver = AssetResolver::new(&catalog, &store);
//!
//! assert_eq!(
//!     resolver.resolve_namespace("minecraft:font/ascii.png", &["textures"]).as_deref(),
//!     Some("minecraft/textures/font/ascii.png"),
//! );
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod fetching;
pub mod logging;
pub mod resolver;
pub mod store;

pub use catalog::{AssetCatalog, DEFAULT_VERSION, StaticCatalog};
pub use config::{
    HudStyle, LocationText, MAX_LOCATIONS, PreviewConfig, PreviewLocation, is_font_descriptor_path,
    unescape_text,
};
pub use error::{AssetError, AssetResult, ConfigError, ConfigResult, FileNameError};
pub use fetching::{FetchGuard, Fetching};
pub use logging::{PerfSpan, perf_span};
pub use resolver::{AssetResolver, NamespaceLookup, namespace_path, to_namespace};
pub use store::{
    ALLOWED_TYPES, BlobStore, MemoryBlobStore, STARTER_FONT_PATH, available_path, filter_path,
    validate_file,
};
