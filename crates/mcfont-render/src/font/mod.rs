//! Font descriptors, validation and resolution.
//!
//! The pipeline for a font file is:
//!
//! 1. [`validate_font`] checks the raw JSON against the provider field tables.
//! 2. The validated value is decoded into a [`FontDescriptor`].
//! 3. [`FontBuilder`] walks the providers, following references and loading
//!    atlases and hex archives, into a [`ResolvedFont`].
//!
//! Decoded archives and atlas transparency masks are memoized in a
//! [`FontCache`] owned by the caller.

mod bitmap;
mod builder;
mod cache;
mod descriptor;
mod resolved;
mod schema;
mod unihex;

pub use bitmap::{BitmapGlyph, BitmapMap, trimmed_width};
pub use builder::{FontBuilder, Visited};
pub use cache::{FontCache, TransparencyMask};
pub use descriptor::{
    BitmapProvider, DEFAULT_BITMAP_HEIGHT, FontDescriptor, OverrideBand, Provider, SizeOverride,
    TtfProvider, UnihexProvider,
};
pub use resolved::{CharacterMap, Glyph, ResolvedFont};
pub use schema::{
    FieldSpec, FieldType, PROVIDER_FIELDS, ValidationError, ValidationErrorKind, validate_font,
};
pub use unihex::{HexArchive, HexBitmap, UnihexGlyph, UnihexMap, parse_hex_line};

pub(crate) use bitmap::round_half_up;
