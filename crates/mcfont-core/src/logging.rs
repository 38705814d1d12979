//! Logging facilities for mcfont.
//!
//! mcfont uses the `tracing` crate for instrumentation. To see logs, install
//! a tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt::init();
//!
//!     // Build fonts, render previews...
//! }
//! ```
//!
//! Font resolution logs soft failures (a provider whose asset could not be
//! fetched or decoded) under [`targets::FONT`], so a pack author can find out
//! why a glyph renders as the placeholder box:
//!
//! ```text
//! RUST_LOG=mcfont_render::font=debug
//! ```

/// Span names used throughout mcfont for tracing.
///
/// These constants can be used to filter traces for specific subsystems.
pub mod span_names {
    /// Font build span.
    pub const FONT_BUILD: &str = "mcfont::font_build";
    /// Text layout span.
    pub const LAYOUT: &str = "mcfont::layout";
    /// Preview compositing span.
    pub const COMPOSITE: &str = "mcfont::composite";
    /// Asset catalog refresh span.
    pub const CATALOG: &str = "mcfont::catalog";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core target.
    pub const CORE: &str = "mcfont_core";
    /// Asset resolution and blob storage.
    pub const ASSETS: &str = "mcfont_core::assets";
    /// Font resolution and building.
    pub const FONT: &str = "mcfont_render::font";
    /// Glyph layout.
    pub const LAYOUT: &str = "mcfont_render::layout";
    /// Raster compositing.
    pub const COMPOSITOR: &str = "mcfont_render::compositor";
    /// Remote asset catalog.
    pub const NET: &str = "mcfont_net";
}

/// A guard that keeps a performance span entered until dropped.
///
/// ```ignore
/// let _perf = PerfSpan::new("font_build");
/// // ... timed work ...
/// ```
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Enter a new performance span for the named operation.
    pub fn new(name: &'static str) -> Self {
        Self {
            span: perf_span(name).entered(),
        }
    }
}

/// The span behind [`PerfSpan`], unentered.
///
/// Async code attaches it with `tracing::Instrument` instead of holding an
/// entered guard across await points.
pub fn perf_span(name: &'static str) -> tracing::Span {
    tracing::info_span!(target: "mcfont::perf", "perf", operation = name)
}

/// Macros for common tracing patterns.
///
/// These wrap the `tracing` crate macros with consistent target naming.
#[macro_export]
macro_rules! mcfont_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "mcfont_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! mcfont_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "mcfont_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! mcfont_info {
    ($($arg:tt)*) => {
        tracing::info!(target: "mcfont_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! mcfont_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "mcfont_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! mcfont_error {
    ($($arg:tt)*) => {
        tracing::error!(target: "mcfont_core", $($arg)*)
    };
}
