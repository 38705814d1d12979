//! Basic geometry and color types.
//!
//! Layout works in font pixels, where unihex glyphs can land on half-pixel
//! positions, so coordinates are `f32` throughout.

/// A point in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The origin point (0, 0).
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
}

/// A size in 2D space (width and height).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Zero size.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Check if the size has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// A rectangle defined by origin and size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    /// Create a new rectangle from origin and size.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point { x, y },
            size: Size { width, height },
        }
    }

    /// Empty rectangle at origin.
    pub const ZERO: Self = Self {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    /// Left edge x coordinate.
    #[inline]
    pub fn left(&self) -> f32 {
        self.origin.x
    }

    /// Top edge y coordinate.
    #[inline]
    pub fn top(&self) -> f32 {
        self.origin.y
    }

    /// Right edge x coordinate.
    #[inline]
    pub fn right(&self) -> f32 {
        self.origin.x + self.size.width
    }

    /// Bottom edge y coordinate.
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.height
    }

    /// Width of the rectangle.
    #[inline]
    pub fn width(&self) -> f32 {
        self.size.width
    }

    /// Height of the rectangle.
    #[inline]
    pub fn height(&self) -> f32 {
        self.size.height
    }

    /// Check if the rectangle is empty (zero or negative size).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// Device pixel columns and rows covered by this rectangle.
    ///
    /// A pixel is covered when its centre lies inside the rectangle, which
    /// matches how an unsmoothed canvas rasterizes fractional rectangles.
    pub(crate) fn pixel_span(&self) -> (i64, i64, i64, i64) {
        let x0 = (self.left() - 0.5).ceil() as i64;
        let y0 = (self.top() - 0.5).ceil() as i64;
        let x1 = (self.right() - 0.5).ceil() as i64;
        let y1 = (self.bottom() - 0.5).ceil() as i64;
        (x0, y0, x1, y1)
    }
}

/// An RGBA color with premultiplied alpha.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Create a new color from premultiplied RGBA components (0.0-1.0 range).
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from non-premultiplied RGBA components.
    #[inline]
    pub fn from_rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: r * a,
            g: g * a,
            b: b * a,
            a,
        }
    }

    /// Create a color from 8-bit RGBA components (0-255 range).
    #[inline]
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_rgba(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Create an opaque color from RGB components.
    #[inline]
    pub const fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create an opaque color from 8-bit RGB components.
    #[inline]
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Create a color from a hex string (`#RGB`, `#RRGGBB` or `#RRGGBBAA`).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

        match hex.len() {
            3 => {
                let mut rgb = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    let v = c.to_digit(16)? as u8;
                    rgb[i] = v * 17;
                }
                Some(Self::from_rgb8(rgb[0], rgb[1], rgb[2]))
            }
            6 => Some(Self::from_rgb8(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::from_rgba8(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// Convert to non-premultiplied 8-bit RGBA components.
    pub fn to_rgba8(self) -> [u8; 4] {
        let (r, g, b) = if self.a > 0.0 {
            (
                ((self.r / self.a) * 255.0).round().clamp(0.0, 255.0) as u8,
                ((self.g / self.a) * 255.0).round().clamp(0.0, 255.0) as u8,
                ((self.b / self.a) * 255.0).round().clamp(0.0, 255.0) as u8,
            )
        } else {
            (0, 0, 0)
        };
        let a = (self.a * 255.0).round().clamp(0.0, 255.0) as u8;
        [r, g, b, a]
    }

    /// Return a new color with modified alpha.
    #[inline]
    pub fn with_alpha(self, alpha: f32) -> Self {
        if self.a == 0.0 {
            return Self::new(0.0, 0.0, 0.0, alpha);
        }
        // Unpremultiply, then repremultiply with new alpha
        let factor = alpha / self.a;
        Self {
            r: self.r * factor,
            g: self.g * factor,
            b: self.b * factor,
            a: alpha,
        }
    }

    /// Return a new color with an 8-bit alpha, as in a `#RRGGBBAA` suffix.
    #[inline]
    pub fn with_alpha8(self, alpha: u8) -> Self {
        self.with_alpha(alpha as f32 / 255.0)
    }

    // Common colors
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Self = Self::from_rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::from_rgb(1.0, 1.0, 1.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex() {
        assert_eq!(Color::from_hex("#FFFFFF"), Some(Color::WHITE));
        assert_eq!(Color::from_hex("#fff"), Some(Color::WHITE));
        assert_eq!(Color::from_hex("000000").map(|c| c.to_rgba8()), Some([0, 0, 0, 255]));
        assert_eq!(Color::from_hex("#0000007d").map(|c| c.to_rgba8()), Some([0, 0, 0, 0x7d]));
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#GGGGGG"), None);
    }

    #[test]
    fn test_color_with_alpha8_roundtrip() {
        let gold = Color::from_hex("#FFAA00").unwrap().with_alpha8(0xbf);
        assert_eq!(gold.to_rgba8(), [0xFF, 0xAA, 0x00, 0xbf]);
    }

    #[test]
    fn test_rect_pixel_span() {
        assert_eq!(Rect::new(0.0, 0.0, 2.0, 2.0).pixel_span(), (0, 0, 2, 2));
        // Half-pixel rectangles cover the pixels whose centres they contain.
        assert_eq!(Rect::new(0.5, 0.0, 1.0, 1.0).pixel_span(), (0, 0, 1, 1));
        assert_eq!(Rect::new(0.25, 0.25, 0.5, 0.5).pixel_span(), (0, 0, 1, 1));
        assert_eq!(Rect::new(0.6, 0.6, 0.2, 0.2).pixel_span(), (1, 1, 1, 1));
    }

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(r.right(), 4.0);
        assert_eq!(r.bottom(), 6.0);
        assert!(Rect::ZERO.is_empty());
    }
}
