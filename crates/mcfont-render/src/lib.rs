//! Font resolution, text layout and raster compositing for mcfont.
//!
//! This crate turns a resource-pack font and a legacy-formatted string into
//! a pixel-accurate image of how the game would draw it.
//!
//! # Pipeline
//!
//! 1. [`text::parse_text`] splits `§`-formatted text into styled runs.
//! 2. [`font::validate_font`] checks a font descriptor's JSON.
//! 3. [`font::FontBuilder`] resolves the descriptor, following references and
//!    loading atlases and hex archives, into a [`font::ResolvedFont`].
//! 4. [`layout::make_text`] positions a glyph for every character.
//! 5. [`compositor::Compositor`] paints the glyphs with shadow, bold,
//!    underline and color onto a [`DrawSurface`].
//!
//! # Example
//!
//! ```
//! use mcfont_render::font::ResolvedFont;
//! use mcfont_render::layout::make_text;
//! use mcfont_render::text::parse_text;
//!
//! // An empty font draws every character as the 5x8 placeholder box.
//! let font = ResolvedFont::new();
//! let text = make_text(&font, &parse_text("hi", ""), false);
//! assert_eq!(text.chars.len(), 2);
//! assert_eq!(text.width, 9.0);
//! ```

pub mod compositor;
mod error;
pub mod font;
pub mod hud;
mod image_buffer;
pub mod layout;
mod surface;
pub mod text;
mod types;

pub use error::{RenderError, RenderResult};
pub use image_buffer::ImageBuffer;
pub use surface::{CompositeMode, DrawSurface};
pub use types::{Color, Point, Rect, Size};

pub use compositor::{CANVAS_HEIGHT, CANVAS_WIDTH, Compositor, Placement};
pub use font::{FontBuilder, FontCache, FontDescriptor, ResolvedFont, ValidationError, validate_font};
pub use hud::{HudSprites, HudStats, draw_hud};
pub use layout::{CharFilters, MadeChar, MadeCharKind, MadeText, make_text, make_text_with_rng};
pub use text::{ChatColor, FormatCode, ParsedTextKey, parse_text};
