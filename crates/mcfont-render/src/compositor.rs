//! Painting laid-out text the way the game does.
//!
//! Glyphs are not drawn straight onto the target. Each glyph goes onto two
//! off-screen layers: the text layer at its position and the shadow layer
//! one scale unit down and to the right. Colored glyphs are tinted in place
//! with a source-atop fill. When the active color changes, and at the end
//! of every location, the layers are flushed: the shadow layer is darkened
//! with translucent black, then both are flattened onto the target and
//! cleared.
//!
//! ```ignore
//! let mut compositor = Compositor::new(ImageBuffer::new(CANVAS_WIDTH, CANVAS_HEIGHT));
//! compositor.draw_locations(&font, &config.locations, config.scale(), &mut rng);
//! let preview = compositor.into_target();
//! ```

use std::collections::HashMap;

use mcfont_core::{LocationText, PreviewLocation};
use rand::Rng;

use crate::font::{ResolvedFont, round_half_up};
use crate::layout::{MadeCharKind, MadeText, make_text_with_rng};
use crate::surface::{CompositeMode, DrawSurface};
use crate::text::{ParsedTextKey, parse_text};
use crate::types::{Color, Rect};

/// Preview canvas width.
pub const CANVAS_WIDTH: u32 = 854;
/// Preview canvas height.
pub const CANVAS_HEIGHT: u32 = 480;

/// Alpha of the glyph shadow.
pub const SHADOW_ALPHA: u8 = 0xbf;

/// Chat box background, `#0000007d`.
pub const CHAT_BACKGROUND: Color = Color::new(0.0, 0.0, 0.0, 125.0 / 255.0);

/// Chat box edge strip, `#D0D0D0`.
pub const CHAT_EDGE: Color = Color::from_rgb(208.0 / 255.0, 208.0 / 255.0, 208.0 / 255.0);

/// Where and how large a location's text is drawn, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Pen origin x.
    pub x: f32,
    /// Pen origin y; the first baseline sits here.
    pub y: f32,
    /// Device pixels per font pixel.
    pub scale: f32,
}

impl Placement {
    /// Compute the placement of `text` at `location` on a `width` x `height`
    /// canvas at GUI scale `scale`.
    pub fn for_location(
        location: PreviewLocation,
        text: &MadeText,
        scale: u32,
        width: u32,
        height: u32,
    ) -> Self {
        let s = scale as f32;
        let (w, h) = (width as f32, height as f32);
        let half_scale = (0.5 * s).floor();

        match location {
            PreviewLocation::Title => Self {
                x: (w / 2.0 - text.width * 4.0 * s / 2.0).floor() - 2.0 * s - half_scale,
                y: round_half_up(h / 2.0) - 12.0 * s,
                scale: 4.0 * s,
            },
            PreviewLocation::Subtitle => Self {
                x: (w / 2.0 - text.width * 2.0 * s / 2.0).floor() - half_scale,
                y: round_half_up(h / 2.0) + 24.0 * s,
                scale: 2.0 * s,
            },
            PreviewLocation::Actionbar => Self {
                x: (w / 2.0 - text.width * s / 2.0).floor() - half_scale,
                y: h - 65.0 * s,
                scale: s,
            },
            PreviewLocation::Chat => Self {
                x: 5.0 * s,
                y: h - 41.0 * s - text.height * s,
                scale: s,
            },
        }
    }
}

/// Draws [`MadeText`] onto a target surface through shadow and text layers.
pub struct Compositor<S> {
    target: S,
    shadow: S,
    text: S,
}

impl<S: DrawSurface> Compositor<S> {
    /// Wrap a target surface.
    pub fn new(target: S) -> Self {
        let shadow = target.blank_like();
        let text = target.blank_like();
        Self { target, shadow, text }
    }

    pub fn target(&self) -> &S {
        &self.target
    }

    /// The target, for drawing backdrops underneath the text.
    pub fn target_mut(&mut self) -> &mut S {
        &mut self.target
    }

    /// Flush pending glyphs and return the target.
    pub fn into_target(mut self) -> S {
        self.flush();
        self.target
    }

    /// Darken the shadow layer, flatten both layers onto the target and clear
    /// them.
    pub fn flush(&mut self) {
        let bounds = self.shadow.bounds();
        self.shadow
            .fill_rect(bounds, Color::BLACK.with_alpha8(SHADOW_ALPHA), CompositeMode::SourceAtop);
        self.target.draw_surface(&self.shadow);
        self.shadow.clear();
        self.target.draw_surface(&self.text);
        self.text.clear();
    }

    /// Draw `text` with its pen origin at (`x`, `y`) and `scale` device
    /// pixels per font pixel.
    ///
    /// Glyphs stay on the layers until the color changes or [`flush`] is
    /// called.
    ///
    /// [`flush`]: Compositor::flush
    pub fn draw_text(&mut self, text: &MadeText, scale: f32, x: f32, y: f32) {
        let (canvas_w, canvas_h) = (self.target.width() as f32, self.target.height() as f32);
        let mut last_color = None;

        for c in &text.chars {
            let fx = x + c.pos.x * scale;
            let fy = y + c.pos.y * scale;
            let fw = scale + c.size.width * scale;
            let fh = scale + c.size.height * scale;

            if c.filters.color != last_color {
                self.flush();
                last_color = c.filters.color;
            }

            if fx < -fw || fx > canvas_w || fy < -fh || fy > canvas_h {
                continue;
            }

            let w = c.size.width * scale;
            let h = c.size.height * scale;
            match &c.kind {
                MadeCharKind::Image { image, crop } => {
                    let mut blit = |offset: f32| {
                        self.shadow
                            .draw_image(image, *crop, Rect::new(fx + scale + offset, fy + scale, w, h));
                        self.text.draw_image(image, *crop, Rect::new(fx + offset, fy, w, h));
                    };
                    blit(0.0);
                    if c.filters.bold {
                        blit(scale);
                    }

                    if let Some(color) = c.filters.color {
                        let extra = if c.filters.bold { scale } else { 0.0 };
                        self.shadow.fill_rect(
                            Rect::new(fx + scale, fy + scale, w + extra, h),
                            color.with_alpha8(SHADOW_ALPHA),
                            CompositeMode::SourceAtop,
                        );
                        self.text.fill_rect(
                            Rect::new(fx, fy, w + extra, h),
                            color,
                            CompositeMode::SourceAtop,
                        );
                    }
                }
                MadeCharKind::Pixels { pixel_size, pixels } => {
                    let color = c.filters.color.unwrap_or(Color::WHITE);
                    let side = pixel_size * scale;
                    let mut fill = |offset: f32| {
                        for p in pixels {
                            let px = fx + p.x * scale;
                            let py = fy + p.y * scale;
                            self.shadow.fill_rect(
                                Rect::new(px + side, py + side, side + offset, side),
                                color,
                                CompositeMode::SourceOver,
                            );
                            self.text
                                .fill_rect(Rect::new(px, py, side + offset, side), color, CompositeMode::SourceOver);
                        }
                    };
                    fill(0.0);
                    if c.filters.bold {
                        fill(side);
                    }
                }
                MadeCharKind::Indicator => {}
            }

            if c.filters.underline {
                let color = c.filters.color.unwrap_or(Color::WHITE);
                let extra = if c.filters.bold { 2.0 } else { 1.0 };
                let line_w = (c.size.width + extra) * scale;
                self.shadow.fill_rect(
                    Rect::new(fx + scale, y + 3.0 * scale, line_w, scale),
                    color,
                    CompositeMode::SourceOver,
                );
                self.text
                    .fill_rect(Rect::new(fx, y + 2.0 * scale, line_w, scale), color, CompositeMode::SourceOver);
            }
        }
    }

    /// Draw the chat box behind text of `text_height` font pixels.
    pub fn draw_chat_background(&mut self, text_height: f32, scale: u32) {
        let s = scale as f32;
        let top = self.target.height() as f32 - 49.0 * s - text_height * s;
        let box_height = (text_height + 9.0) * s;
        self.target
            .fill_rect(Rect::new(0.0, top, 332.0 * s, box_height), CHAT_BACKGROUND, CompositeMode::SourceOver);
        self.target
            .fill_rect(Rect::new(0.0, top, 2.0 * s, box_height), CHAT_EDGE, CompositeMode::SourceOver);
    }

    /// Lay out and draw every configured location, in
    /// [`PreviewLocation::DRAW_ORDER`].
    ///
    /// Text is parsed and laid out once per distinct (text, newline mode)
    /// pair.
    pub fn draw_locations<R: Rng + ?Sized>(
        &mut self,
        font: &ResolvedFont,
        locations: &[LocationText],
        scale: u32,
        rng: &mut R,
    ) {
        let _span = tracing::debug_span!(
            target: "mcfont_render::compositor",
            "draw_locations",
            count = locations.len()
        )
        .entered();

        let scale = scale.max(1);
        let mut parsed: HashMap<&str, Vec<ParsedTextKey>> = HashMap::new();
        let mut made: HashMap<(&str, bool), MadeText> = HashMap::new();
        for entry in locations {
            let newlines = entry.location.allows_newlines();
            let runs = parsed
                .entry(entry.text.as_str())
                .or_insert_with(|| parse_text(&entry.text, ""));
            made.entry((entry.text.as_str(), newlines))
                .or_insert_with(|| make_text_with_rng(font, runs, newlines, rng));
        }

        for location in PreviewLocation::DRAW_ORDER {
            let Some(entry) = locations.iter().find(|l| l.location == location) else {
                continue;
            };
            let Some(text) = made.get(&(entry.text.as_str(), location.allows_newlines())) else {
                continue;
            };

            let placement =
                Placement::for_location(location, text, scale, self.target.width(), self.target.height());
            if location == PreviewLocation::Chat {
                self.flush();
                self.draw_chat_background(text.height, scale);
            }
            tracing::trace!(
                target: "mcfont_render::compositor",
                location = %location,
                x = placement.x,
                y = placement.y,
                glyphs = text.chars.len(),
                "drawing location"
            );
            self.draw_text(text, placement.scale, placement.x, placement.y);
        }

        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{
        BitmapMap, BitmapProvider, CharacterMap, HexArchive, OverrideBand, TransparencyMask,
        UnihexMap, parse_hex_line,
    };
    use crate::image_buffer::ImageBuffer;
    use crate::layout::make_text;
    use crate::text::ChatColor;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::Arc;

    const WHITE: [u8; 4] = [255, 255, 255, 255];
    const SHADOW: [u8; 4] = [0x40, 0x40, 0x40, 255];
    const CLEAR: [u8; 4] = [0, 0, 0, 0];

    fn font() -> ResolvedFont {
        let image = ImageBuffer::from_color(8, 8, Color::WHITE);
        let provider = BitmapProvider {
            file: "minecraft:font/test.png".into(),
            height: None,
            ascent: 7.0,
            chars: vec!["A".into()],
        };
        let mask = TransparencyMask::from_image(&image);
        let mut font = ResolvedFont::new();
        font.characters
            .push(CharacterMap::Bitmap(BitmapMap::slice(&provider, Arc::new(image), &mask).unwrap()));
        font
    }

    fn layout(text: &str) -> MadeText {
        make_text(&font(), &parse_text(&text.replace('&', "\u{a7}"), ""), false)
    }

    fn canvas() -> Compositor<ImageBuffer> {
        Compositor::new(ImageBuffer::new(64, 48))
    }

    #[test]
    fn test_glyph_and_shadow() {
        let mut compositor = canvas();
        compositor.draw_text(&layout("A"), 1.0, 10.0, 20.0);
        // Nothing reaches the target before a flush.
        assert_eq!(compositor.target().get_rgba8(10, 13), Some(CLEAR));

        let target = compositor.into_target();
        assert_eq!(target.get_rgba8(10, 13), Some(WHITE));
        assert_eq!(target.get_rgba8(17, 20), Some(WHITE));
        // Shadow only: one pixel right of and below the glyph.
        assert_eq!(target.get_rgba8(18, 21), Some(SHADOW));
        assert_eq!(target.get_rgba8(11, 21), Some(SHADOW));
        assert_eq!(target.get_rgba8(9, 13), Some(CLEAR));
        assert_eq!(target.get_rgba8(19, 13), Some(CLEAR));
    }

    #[test]
    fn test_bold_draws_twice() {
        let mut compositor = canvas();
        compositor.draw_text(&layout("&lA"), 1.0, 10.0, 20.0);
        let target = compositor.into_target();
        assert_eq!(target.get_rgba8(18, 13), Some(WHITE));
        assert_eq!(target.get_rgba8(19, 14), Some(SHADOW));
    }

    #[test]
    fn test_scaled_glyph() {
        let mut compositor = canvas();
        compositor.draw_text(&layout("A"), 2.0, 0.0, 14.0);
        let target = compositor.into_target();
        // Drawn 16x16 at (0, 0), shadow offset by 2.
        assert_eq!(target.get_rgba8(15, 15), Some(WHITE));
        assert_eq!(target.get_rgba8(17, 17), Some(SHADOW));
        assert_eq!(target.get_rgba8(16, 0), Some(CLEAR));
    }

    #[test]
    fn test_colored_glyph() {
        let mut compositor = canvas();
        compositor.draw_text(&layout("&cA"), 1.0, 10.0, 20.0);
        let target = compositor.into_target();

        let red = ChatColor::Red.color().to_rgba8();
        assert_eq!(target.get_rgba8(10, 13), Some(red));
        let [r, g, b, a] = target.get_rgba8(18, 21).unwrap_or_default();
        assert_eq!(a, 255);
        assert!(r > g && g == b);
        assert!(r < 0x80);
    }

    #[test]
    fn test_color_change_flushes() {
        let mut compositor = canvas();
        compositor.draw_text(&layout("A&cA"), 1.0, 0.0, 10.0);
        // The white glyph was flushed when red started; red is still pending.
        assert_eq!(compositor.target().get_rgba8(0, 3), Some(WHITE));
        assert_eq!(compositor.target().get_rgba8(9, 3), Some(CLEAR));
        compositor.flush();
        assert_eq!(compositor.target().get_rgba8(9, 3), Some(ChatColor::Red.color().to_rgba8()));
    }

    #[test]
    fn test_underline() {
        let mut compositor = canvas();
        compositor.draw_text(&layout("&nA"), 1.0, 10.0, 20.0);
        let target = compositor.into_target();
        // Spans the glyph plus one, two rows below the baseline.
        assert_eq!(target.get_rgba8(18, 22), Some(WHITE));
        assert_eq!(target.get_rgba8(19, 22), Some(CLEAR));
        assert_eq!(target.get_rgba8(19, 23), Some(SHADOW));
    }

    #[test]
    fn test_pixel_glyph() {
        let archive = HexArchive::from_glyphs(parse_hex_line(&format!("0041:{}", "F".repeat(32))));
        let band = OverrideBand {
            from: 0,
            to: 0x10FFFF,
            left: 0.0,
            right: 8.0,
        };
        let mut font = ResolvedFont::new();
        font.characters
            .push(CharacterMap::Unihex(UnihexMap::from_archive(&archive, &[band])));
        let text = make_text(&font, &parse_text("A", ""), false);

        let mut compositor = canvas();
        compositor.draw_text(&text, 2.0, 10.0, 20.0);
        let target = compositor.into_target();
        // 8x16 half-size pixels cover 8x16 device pixels at scale 2.
        assert_eq!(target.get_rgba8(10, 4), Some(WHITE));
        assert_eq!(target.get_rgba8(17, 19), Some(WHITE));
        assert_eq!(target.get_rgba8(18, 20), Some(SHADOW));
        assert_eq!(target.get_rgba8(18, 4), Some(CLEAR));
    }

    #[test]
    fn test_offscreen_glyphs_are_culled() {
        let mut compositor = canvas();
        compositor.draw_text(&layout("AAAAAAAAAAAAAAAAAAAA"), 1.0, -1000.0, 20.0);
        let target = compositor.into_target();
        assert!(target.as_rgba8_bytes().iter().all(|b| *b == 0));
    }

    #[test]
    fn test_placements() {
        let text = MadeText {
            chars: Vec::new(),
            width: 17.0,
            height: 9.0,
        };
        let at = |location, scale| Placement::for_location(location, &text, scale, CANVAS_WIDTH, CANVAS_HEIGHT);

        assert_eq!(
            at(PreviewLocation::Title, 1),
            Placement {
                x: 391.0,
                y: 228.0,
                scale: 4.0
            }
        );
        assert_eq!(
            at(PreviewLocation::Subtitle, 2),
            Placement {
                x: 392.0,
                y: 288.0,
                scale: 4.0
            }
        );
        assert_eq!(
            at(PreviewLocation::Actionbar, 1),
            Placement {
                x: 418.0,
                y: 415.0,
                scale: 1.0
            }
        );
        assert_eq!(
            at(PreviewLocation::Chat, 2),
            Placement {
                x: 10.0,
                y: 480.0 - 82.0 - 18.0,
                scale: 2.0
            }
        );
    }

    #[test]
    fn test_chat_background() {
        let mut compositor = Compositor::new(ImageBuffer::new(CANVAS_WIDTH, CANVAS_HEIGHT));
        let locations = [LocationText::new(PreviewLocation::Chat, "A")];
        compositor.draw_locations(&font(), &locations, 1, &mut StdRng::seed_from_u64(0));
        let target = compositor.into_target();

        assert_eq!(target.get_rgba8(100, 435), Some([0, 0, 0, 125]));
        assert_eq!(target.get_rgba8(1, 435), Some([208, 208, 208, 255]));
        assert_eq!(target.get_rgba8(100, 430), Some(CLEAR));
        // Glyph at x = 5, baseline 439.
        assert_eq!(target.get_rgba8(5, 432), Some(WHITE));
    }

    #[test]
    fn test_locations_share_layout() {
        let mut compositor = Compositor::new(ImageBuffer::new(CANVAS_WIDTH, CANVAS_HEIGHT));
        let locations = [
            LocationText::new(PreviewLocation::Title, "A"),
            LocationText::new(PreviewLocation::Actionbar, "A"),
        ];
        compositor.draw_locations(&font(), &locations, 1, &mut StdRng::seed_from_u64(0));
        let target = compositor.into_target();

        // Actionbar: width 8, x = floor(427 - 4) = 423, baseline 415.
        assert_eq!(target.get_rgba8(423, 408), Some(WHITE));
        // Title: x = floor(427 - 16) - 2 = 409, baseline 228, scale 4.
        assert_eq!(target.get_rgba8(409, 200), Some(WHITE));
    }
}
