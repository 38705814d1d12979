//! Turning styled runs into positioned draw instructions.
//!
//! Layout runs a pen over the text in font pixels, starting at (0, 0) with
//! the baseline at y = 0. Glyphs are placed above the baseline; each
//! explicit newline moves the baseline down by 9.
//!
//! Style is accumulated across runs until a run carries `reset`, and every
//! emitted [`MadeChar`] gets its own copy of the style in effect when it was
//! emitted.

use std::sync::{Arc, LazyLock};

use rand::Rng;

use crate::font::{Glyph, ResolvedFont, UnihexGlyph};
use crate::image_buffer::ImageBuffer;
use crate::text::{ChatColor, ParsedTextKey};
use crate::types::{Color, Point, Rect, Size};

/// Distance between baselines.
pub const LINE_HEIGHT: f32 = 9.0;

/// Color of the missing-glyph box outline.
pub const MISSING_GLYPH_COLOR: Color = Color::from_rgb(251.0 / 255.0, 251.0 / 255.0, 251.0 / 255.0);

static MISSING_GLYPH: LazyLock<Arc<ImageBuffer>> = LazyLock::new(|| {
    let mut image = ImageBuffer::new(5, 8);
    for y in 0..8 {
        for x in 0..5 {
            if x == 0 || x == 4 || y == 0 || y == 7 {
                image.set_pixel(x, y, MISSING_GLYPH_COLOR);
            }
        }
    }
    Arc::new(image)
});

/// The 5x8 box drawn for characters the font has no glyph for.
pub fn missing_glyph() -> Arc<ImageBuffer> {
    Arc::clone(&MISSING_GLYPH)
}

/// Style carried by a draw instruction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CharFilters {
    pub color: Option<Color>,
    pub bold: bool,
    pub underline: bool,
    pub obfuscated: bool,
}

impl CharFilters {
    /// Fold a run's style into the accumulated style.
    fn apply(&mut self, run: &ParsedTextKey) {
        if run.reset == Some(true) {
            *self = Self::default();
        }
        if let Some(name) = &run.color {
            self.color = ChatColor::from_name(name).map(ChatColor::color);
        }
        if run.bold == Some(true) {
            self.bold = true;
        }
        if run.underline == Some(true) {
            self.underline = true;
        }
        if run.obfuscated == Some(true) {
            self.obfuscated = true;
        }
    }

    /// Extra advance for bold text, in glyph units.
    fn bold_extra(&self) -> f32 {
        if self.bold { 1.0 } else { 0.0 }
    }
}

/// What a draw instruction paints.
#[derive(Debug, Clone, PartialEq)]
pub enum MadeCharKind {
    /// A region of an image scaled to the instruction size.
    Image { image: Arc<ImageBuffer>, crop: Rect },
    /// Square pixels of side `pixel_size`, relative to the instruction position.
    Pixels { pixel_size: f32, pixels: Vec<Point> },
    /// Nothing; only marks a spacing advance.
    Indicator,
}

/// A positioned draw instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct MadeChar {
    pub kind: MadeCharKind,
    pub pos: Point,
    pub size: Size,
    pub filters: CharFilters,
}

impl MadeChar {
    pub fn is_indicator(&self) -> bool {
        matches!(self.kind, MadeCharKind::Indicator)
    }
}

/// Laid-out text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MadeText {
    pub chars: Vec<MadeChar>,
    /// Final pen x minus one.
    pub width: f32,
    /// Final pen y.
    pub height: f32,
}

/// Lay out `runs` with `font`. Newlines break lines when `allow_newlines` is set.
pub fn make_text(font: &ResolvedFont, runs: &[ParsedTextKey], allow_newlines: bool) -> MadeText {
    make_text_with_rng(font, runs, allow_newlines, &mut rand::thread_rng())
}

/// Like [`make_text`], drawing obfuscated glyphs from `rng`.
pub fn make_text_with_rng<R: Rng + ?Sized>(
    font: &ResolvedFont,
    runs: &[ParsedTextKey],
    allow_newlines: bool,
    rng: &mut R,
) -> MadeText {
    let _span = tracing::trace_span!(target: "mcfont_render::layout", "make_text", runs = runs.len()).entered();

    let mut chars = Vec::new();
    let mut pen = Point::ZERO;
    let mut filters = CharFilters::default();
    let mut pool: Option<ObfuscationPool> = None;

    for run in runs {
        filters.apply(run);

        for c in run.text.chars() {
            let codepoint = u32::from(c);

            if let Some(advance) = font.advance(codepoint) {
                chars.push(MadeChar {
                    kind: MadeCharKind::Indicator,
                    pos: pen,
                    size: Size::new(advance, 0.0),
                    filters,
                });
                pen.x += advance;
                continue;
            }

            if allow_newlines && c == '\n' {
                pen.x = 0.0;
                pen.y += LINE_HEIGHT;
                continue;
            }

            let bold_extra = filters.bold_extra();
            let glyph = if run.obfuscated == Some(true) {
                pool.get_or_insert_with(|| ObfuscationPool::new(font)).pick(font, rng)
            } else {
                font.glyph(codepoint)
            };

            match glyph {
                None => {
                    chars.push(MadeChar {
                        kind: MadeCharKind::Image {
                            image: missing_glyph(),
                            crop: Rect::new(0.0, 0.0, 5.0, 8.0),
                        },
                        pos: Point::new(pen.x - 1.0, pen.y - 7.0),
                        size: Size::new(5.0, 8.0),
                        filters,
                    });
                    pen.x += 5.0 + bold_extra;
                }
                Some(Glyph::Bitmap(map, glyph)) => {
                    let width = map.rendered_width(glyph);
                    chars.push(MadeChar {
                        kind: MadeCharKind::Image {
                            image: Arc::clone(&map.image),
                            crop: glyph.crop(),
                        },
                        pos: Point::new(pen.x, pen.y - map.ascent),
                        size: Size::new(width, map.height),
                        filters,
                    });
                    pen.x += width + 1.0 + bold_extra;
                }
                Some(Glyph::Unihex(glyph)) => {
                    let scale = 8.0 / glyph.height() as f32;
                    pen.x -= glyph.left * scale;
                    chars.push(MadeChar {
                        kind: MadeCharKind::Pixels {
                            pixel_size: scale,
                            pixels: scaled_pixels(glyph, scale),
                        },
                        pos: Point::new(pen.x, pen.y - glyph.height() as f32 * scale),
                        size: Size::new(glyph.width() as f32 * scale, glyph.height() as f32 * scale),
                        filters,
                    });
                    pen.x += glyph.right * scale + bold_extra * scale;
                }
            }
        }
    }

    MadeText {
        chars,
        width: pen.x - 1.0,
        height: pen.y,
    }
}

/// Codepoints of every character map, collected the first time a text
/// needs an obfuscated glyph.
struct ObfuscationPool {
    codepoints: Vec<Vec<u32>>,
}

impl ObfuscationPool {
    fn new(font: &ResolvedFont) -> Self {
        Self {
            codepoints: font.characters.iter().map(|map| map.codepoints()).collect(),
        }
    }

    /// Any glyph of any character map, ignoring the input character.
    fn pick<'f, R: Rng + ?Sized>(&self, font: &'f ResolvedFont, rng: &mut R) -> Option<Glyph<'f>> {
        if self.codepoints.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.codepoints.len());
        let codepoints = &self.codepoints[index];
        if codepoints.is_empty() {
            return None;
        }
        let codepoint = codepoints[rng.gen_range(0..codepoints.len())];
        font.characters.get(index)?.glyph(codepoint)
    }
}

fn scaled_pixels(glyph: &UnihexGlyph, scale: f32) -> Vec<Point> {
    glyph
        .pixels()
        .iter()
        .map(|&(x, y)| Point::new(x as f32 * scale, y as f32 * scale))
        .collect()
}
