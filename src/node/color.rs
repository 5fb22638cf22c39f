/// An RGBA colour resolved from a document string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parses `#RGB`, `#RRGGBB`, `#AARRGGBB` or a named colour.
    pub fn parse(s: &str) -> Option<Color> {
        let s = s.trim();
        let Some(hex) = s.strip_prefix('#') else {
            return Self::named(s);
        };
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
        match hex.len() {
            3 => {
                let short = |i: usize| channel(i..i + 1).map(|v| v * 17);
                Some(Color::rgb(short(0)?, short(1)?, short(2)?))
            }
            6 => Some(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Some(Color {
                a: channel(0..2)?,
                r: channel(2..4)?,
                g: channel(4..6)?,
                b: channel(6..8)?,
            }),
            _ => None,
        }
    }

    /// Like [`Color::parse`], but unknown strings fall back to black.
    pub fn parse_or_black(s: &str) -> Color {
        Self::parse(s).unwrap_or(Color::BLACK)
    }

    fn named(name: &str) -> Option<Color> {
        let color = match name.to_ascii_lowercase().as_str() {
            "white" => Color::WHITE,
            "black" => Color::BLACK,
            "red" => Color::rgb(255, 0, 0),
            "green" => Color::rgb(0, 255, 0),
            "blue" => Color::rgb(0, 0, 255),
            "gray" | "grey" => Color::rgb(136, 136, 136),
            "yellow" => Color::rgb(255, 255, 0),
            "cyan" => Color::rgb(0, 255, 255),
            "magenta" => Color::rgb(255, 0, 255),
            "transparent" => Color::TRANSPARENT,
            _ => return None,
        };
        Some(color)
    }
}
