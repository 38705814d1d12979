//! Legacy chat colors and format codes.

use crate::types::Color;

/// One of the 16 legacy chat colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChatColor {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
}

impl ChatColor {
    /// All colors in code order (`0` through `f`).
    pub const ALL: [ChatColor; 16] = [
        ChatColor::Black,
        ChatColor::DarkBlue,
        ChatColor::DarkGreen,
        ChatColor::DarkAqua,
        ChatColor::DarkRed,
        ChatColor::DarkPurple,
        ChatColor::Gold,
        ChatColor::Gray,
        ChatColor::DarkGray,
        ChatColor::Blue,
        ChatColor::Green,
        ChatColor::Aqua,
        ChatColor::Red,
        ChatColor::LightPurple,
        ChatColor::Yellow,
        ChatColor::White,
    ];

    /// The format code character.
    pub fn code(self) -> char {
        // Codes are the hex digits 0-f in declaration order.
        char::from_digit(self as u32, 16).unwrap_or('0')
    }

    /// The name used in JSON text components.
    pub fn name(self) -> &'static str {
        match self {
            ChatColor::Black => "black",
            ChatColor::DarkBlue => "dark_blue",
            ChatColor::DarkGreen => "dark_green",
            ChatColor::DarkAqua => "dark_aqua",
            ChatColor::DarkRed => "dark_red",
            ChatColor::DarkPurple => "dark_purple",
            ChatColor::Gold => "gold",
            ChatColor::Gray => "gray",
            ChatColor::DarkGray => "dark_gray",
            ChatColor::Blue => "blue",
            ChatColor::Green => "green",
            ChatColor::Aqua => "aqua",
            ChatColor::Red => "red",
            ChatColor::LightPurple => "light_purple",
            ChatColor::Yellow => "yellow",
            ChatColor::White => "white",
        }
    }

    /// The `#RRGGBB` value.
    pub fn hex(self) -> &'static str {
        match self {
            ChatColor::Black => "#000000",
            ChatColor::DarkBlue => "#0000AA",
            ChatColor::DarkGreen => "#00AA00",
            ChatColor::DarkAqua => "#00AAAA",
            ChatColor::DarkRed => "#AA0000",
            ChatColor::DarkPurple => "#AA00AA",
            ChatColor::Gold => "#FFAA00",
            ChatColor::Gray => "#AAAAAA",
            ChatColor::DarkGray => "#555555",
            ChatColor::Blue => "#5555FF",
            ChatColor::Green => "#55FF55",
            ChatColor::Aqua => "#55FFFF",
            ChatColor::Red => "#FF5555",
            ChatColor::LightPurple => "#FF55FF",
            ChatColor::Yellow => "#FFFF55",
            ChatColor::White => "#FFFFFF",
        }
    }

    /// The color as a render color.
    pub fn color(self) -> Color {
        Color::from_hex(self.hex()).unwrap_or(Color::WHITE)
    }

    /// Look up a color by its format code.
    pub fn from_code(code: char) -> Option<Self> {
        let index = code.to_digit(16)?;
        if code.is_ascii_uppercase() {
            return None;
        }
        Self::ALL.get(index as usize).copied()
    }

    /// Look up a color by its JSON name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

/// One of the 6 legacy format codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatCode {
    /// `k`
    Obfuscated,
    /// `l`
    Bold,
    /// `m`
    Strikethrough,
    /// `n`
    Underline,
    /// `o`
    Italic,
    /// `r`
    Reset,
}

impl FormatCode {
    /// Look up a format by its code.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'k' => Some(FormatCode::Obfuscated),
            'l' => Some(FormatCode::Bold),
            'm' => Some(FormatCode::Strikethrough),
            'n' => Some(FormatCode::Underline),
            'o' => Some(FormatCode::Italic),
            'r' => Some(FormatCode::Reset),
            _ => None,
        }
    }

    /// The format code character.
    pub fn code(self) -> char {
        match self {
            FormatCode::Obfuscated => 'k',
            FormatCode::Bold => 'l',
            FormatCode::Strikethrough => 'm',
            FormatCode::Underline => 'n',
            FormatCode::Italic => 'o',
            FormatCode::Reset => 'r',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_codes_roundtrip() {
        for color in ChatColor::ALL {
            assert_eq!(ChatColor::from_code(color.code()), Some(color));
            assert_eq!(ChatColor::from_name(color.name()), Some(color));
        }
        assert_eq!(ChatColor::from_code('A'), None);
        assert_eq!(ChatColor::from_code('g'), None);
        assert_eq!(ChatColor::from_name("orange"), None);
    }

    #[test]
    fn test_palette_values() {
        assert_eq!(ChatColor::from_code('a').map(ChatColor::hex), Some("#55FF55"));
        assert_eq!(ChatColor::from_code('6').map(ChatColor::name), Some("gold"));
        assert_eq!(ChatColor::Gray.color().to_rgba8(), [0xAA, 0xAA, 0xAA, 0xFF]);
    }

    #[test]
    fn test_format_codes() {
        for code in ['k', 'l', 'm', 'n', 'o', 'r'] {
            assert_eq!(FormatCode::from_code(code).map(FormatCode::code), Some(code));
        }
        assert_eq!(FormatCode::from_code('p'), None);
    }
}
