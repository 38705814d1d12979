//! Legacy-formatted text.
//!
//! Raw preview text uses `§` format codes. [`parse_text`] splits it into
//! [`ParsedTextKey`] runs, which are both the input of glyph layout and the
//! JSON text components emitted in `/title` and `/tellraw` commands.
//!
//! ```
//! use mcfont_render::text::{ChatColor, parse_text};
//!
//! let runs = parse_text("\u{a7}6Gold\u{a7}r plain", "minecraft:default");
//! assert_eq!(runs[0].color.as_deref(), Some(ChatColor::Gold.name()));
//! assert_eq!(runs[1].text, " plain");
//! ```

mod color;
mod parser;

pub use color::{ChatColor, FormatCode};
pub use parser::{ParsedTextKey, SECTION_SIGN, parse_text};
