/// Color scheme definitions for the terminal
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::profile_types::OriginTag;

/// A color in RGB format, written as `#RRGGBB` in settings files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn as_array(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = String;

    /// Accepts `#RRGGBB` and the short `#RGB` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .filter(|hex| hex.is_ascii())
            .ok_or_else(|| format!("color '{s}' must be '#' followed by hex digits"))?;
        let channel =
            |h: &str| u8::from_str_radix(h, 16).map_err(|_| format!("invalid color '{s}'"));
        match hex.len() {
            6 => Ok(Color::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let r = channel(&hex[0..1])?;
                let g = channel(&hex[1..2])?;
                let b = channel(&hex[2..3])?;
                Ok(Color::new(r * 17, g * 17, b * 17))
            }
            _ => Err(format!("invalid color '{s}'")),
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let text = String::deserialize(d)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// A named terminal palette: 16 ANSI colors plus foreground, background,
/// cursor and selection colors.
///
/// Colors a settings file leaves out are taken from the Campbell palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColorScheme {
    pub name: String,
    pub foreground: Color,
    pub background: Color,
    pub cursor_color: Color,
    pub selection_background: Color,

    // ANSI colors (0-15)
    pub black: Color,
    pub red: Color,
    pub green: Color,
    pub yellow: Color,
    pub blue: Color,
    #[serde(alias = "magenta")]
    pub purple: Color,
    pub cyan: Color,
    pub white: Color,
    pub bright_black: Color,
    pub bright_red: Color,
    pub bright_green: Color,
    pub bright_yellow: Color,
    pub bright_blue: Color,
    #[serde(alias = "brightMagenta")]
    pub bright_purple: Color,
    pub bright_cyan: Color,
    pub bright_white: Color,

    /// Layer the scheme was defined in
    #[serde(skip)]
    pub origin: OriginTag,
}

impl ColorScheme {
    /// Get ANSI color by index (0-15)
    pub fn ansi_color(&self, index: u8) -> Color {
        match index {
            0 => self.black,
            1 => self.red,
            2 => self.green,
            3 => self.yellow,
            4 => self.blue,
            5 => self.purple,
            6 => self.cyan,
            7 => self.white,
            8 => self.bright_black,
            9 => self.bright_red,
            10 => self.bright_green,
            11 => self.bright_yellow,
            12 => self.bright_blue,
            13 => self.bright_purple,
            14 => self.bright_cyan,
            15 => self.bright_white,
            _ => self.foreground,
        }
    }

    /// The Campbell palette, used when no layer defines any scheme
    pub fn campbell() -> Self {
        Self {
            name: "Campbell".to_string(),
            foreground: Color::new(0xCC, 0xCC, 0xCC),
            background: Color::new(0x0C, 0x0C, 0x0C),
            cursor_color: Color::new(0xFF, 0xFF, 0xFF),
            selection_background: Color::new(0xFF, 0xFF, 0xFF),
            black: Color::new(0x0C, 0x0C, 0x0C),
            red: Color::new(0xC5, 0x0F, 0x1F),
            green: Color::new(0x13, 0xA1, 0x0E),
            yellow: Color::new(0xC1, 0x9C, 0x00),
            blue: Color::new(0x00, 0x37, 0xDA),
            purple: Color::new(0x88, 0x17, 0x98),
            cyan: Color::new(0x3A, 0x96, 0xDD),
            white: Color::new(0xCC, 0xCC, 0xCC),
            bright_black: Color::new(0x76, 0x76, 0x76),
            bright_red: Color::new(0xE7, 0x48, 0x56),
            bright_green: Color::new(0x16, 0xC6, 0x0C),
            bright_yellow: Color::new(0xF9, 0xF1, 0xA5),
            bright_blue: Color::new(0x3B, 0x78, 0xFF),
            bright_purple: Color::new(0xB4, 0x00, 0x9E),
            bright_cyan: Color::new(0x61, 0xD6, 0xD6),
            bright_white: Color::new(0xF2, 0xF2, 0xF2),
            origin: OriginTag::BuiltIn,
        }
    }
}

/// Unnamed Campbell palette; fills the colors a parsed scheme omits.
impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            name: String::new(),
            origin: OriginTag::default(),
            ..Self::campbell()
        }
    }
}
