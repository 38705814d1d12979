//! mcfont - pixel-accurate previews of Minecraft resource-pack fonts.
//!
//! This is the umbrella crate: it re-exports the core collaborators, the
//! render crate under [`render`], the remote catalog under `net` (with the
//! `networking` feature) and adds the preview pipeline and command
//! generation on top.
//!
//! # Example
//!
//! ```no_run
//! use mcfont::prelude::*;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = StaticCatalog::default();
//! let store = MemoryBlobStore::with_starter_font();
//! let mut config = PreviewConfig::default();
//! config.set_base_file(STARTER_FONT_PATH, &store);
//!
//! let cache = FontCache::new();
//! let previewer = Previewer::new(AssetResolver::new(&catalog, &store), &cache);
//! let image = previewer.preview(&config, &mut rand::thread_rng()).await?;
//! image.save("preview.png")?;
//! # Ok(())
//! # }
//! ```

pub use mcfont_core::*;

/// Font resolution, layout and compositing.
pub mod render {
    pub use mcfont_render::*;
}

/// Remote asset catalog.
#[cfg(feature = "networking")]
pub mod net {
    pub use mcfont_net::*;
}

pub mod command;
mod error;
pub mod pipeline;
pub mod prelude;

pub use command::{command_for, commands, escape_non_latin, text_component};
pub use error::{PreviewError, PreviewResult};
pub use pipeline::{BuildSlot, BuildTicket, Previewer, font_id};
