//! Appearance settings shared by a profile's focused and unfocused states.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::defaults;

/// Cursor shape drawn in the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CursorShape {
    Bar,
    Vintage,
    Underscore,
    FilledBox,
    EmptyBox,
    DoubleUnderscore,
}

/// How a background image is scaled into the terminal area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StretchMode {
    None,
    Fill,
    Uniform,
    UniformToFill,
}

/// Where a background image is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageAlignment {
    Center,
    Left,
    Top,
    Right,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Font weight on the 1-999 OpenType scale.
///
/// Settings files may spell the weight as a number or as one of the usual
/// names (`"normal"`, `"bold"`, `"semi-light"`...). Known weights are written
/// back by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontWeight(pub u16);

const FONT_WEIGHT_NAMES: &[(&str, u16)] = &[
    ("thin", 100),
    ("extra-light", 200),
    ("light", 300),
    ("semi-light", 350),
    ("normal", 400),
    ("medium", 500),
    ("semi-bold", 600),
    ("bold", 700),
    ("extra-bold", 800),
    ("black", 900),
    ("extra-black", 950),
];

impl FontWeight {
    pub const NORMAL: FontWeight = FontWeight(400);
    pub const BOLD: FontWeight = FontWeight(700);

    pub fn from_name(name: &str) -> Option<FontWeight> {
        FONT_WEIGHT_NAMES
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, w)| FontWeight(*w))
    }

    pub fn name(&self) -> Option<&'static str> {
        FONT_WEIGHT_NAMES
            .iter()
            .find(|(_, w)| *w == self.0)
            .map(|(n, _)| *n)
    }
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "{}", self.0),
        }
    }
}

impl Serialize for FontWeight {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self.name() {
            Some(name) => s.serialize_str(name),
            None => s.serialize_u16(self.0),
        }
    }
}

impl<'de> Deserialize<'de> for FontWeight {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u16),
            Name(String),
        }

        match Raw::deserialize(d)? {
            Raw::Number(n) if (1..=999).contains(&n) => Ok(FontWeight(n)),
            Raw::Number(n) => Err(serde::de::Error::custom(format!(
                "font weight {n} is outside 1-999"
            ))),
            Raw::Name(name) => FontWeight::from_name(&name).ok_or_else(|| {
                serde::de::Error::custom(format!("unknown font weight '{name}'"))
            }),
        }
    }
}

/// Font keys of a profile record. Each key inherits independently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<FontWeight>,
}

impl FontSettings {
    pub fn is_empty(&self) -> bool {
        self.face.is_none() && self.size.is_none() && self.weight.is_none()
    }

    /// Fill keys unset here from `lower`.
    pub fn fill_from(&mut self, lower: &FontSettings) {
        if self.face.is_none() {
            self.face.clone_from(&lower.face);
        }
        if self.size.is_none() {
            self.size = lower.size;
        }
        if self.weight.is_none() {
            self.weight = lower.weight;
        }
    }
}

/// Appearance keys as they appear in one record. `None` means inherit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppearanceSettings {
    /// Color scheme name; resolved against the global scheme collection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_scheme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor_shape: Option<CursorShape>,

    /// Cursor height in percent, used by the vintage shape
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor_height: Option<u32>,

    /// Image path, `desktopWallpaper`, or empty to disable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image_opacity: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image_stretch_mode: Option<StretchMode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image_alignment: Option<ImageAlignment>,

    #[serde(
        default,
        rename = "experimental.retroTerminalEffect",
        skip_serializing_if = "Option::is_none"
    )]
    pub retro_terminal_effect: Option<bool>,
}

impl AppearanceSettings {
    pub fn is_empty(&self) -> bool {
        *self == AppearanceSettings::default()
    }

    /// Fill keys unset here from `lower`.
    pub fn fill_from(&mut self, lower: &AppearanceSettings) {
        if self.color_scheme.is_none() {
            self.color_scheme.clone_from(&lower.color_scheme);
        }
        if self.cursor_shape.is_none() {
            self.cursor_shape = lower.cursor_shape;
        }
        if self.cursor_height.is_none() {
            self.cursor_height = lower.cursor_height;
        }
        if self.background_image.is_none() {
            self.background_image.clone_from(&lower.background_image);
        }
        if self.background_image_opacity.is_none() {
            self.background_image_opacity = lower.background_image_opacity;
        }
        if self.background_image_stretch_mode.is_none() {
            self.background_image_stretch_mode = lower.background_image_stretch_mode;
        }
        if self.background_image_alignment.is_none() {
            self.background_image_alignment = lower.background_image_alignment;
        }
        if self.retro_terminal_effect.is_none() {
            self.retro_terminal_effect = lower.retro_terminal_effect;
        }
    }
}

/// Which appearance of a profile a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppearanceSlot {
    Default,
    Unfocused,
}

impl fmt::Display for AppearanceSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppearanceSlot::Default => write!(f, "default appearance"),
            AppearanceSlot::Unfocused => write!(f, "unfocused appearance"),
        }
    }
}

/// Fully resolved appearance of a profile.
///
/// Font fields are mirrored from the owning profile's font keys; every other
/// field comes from the appearance chain with built-in defaults filling gaps.
#[derive(Debug, Clone, PartialEq)]
pub struct AppearanceConfig {
    pub font_face: String,
    pub font_size: f64,
    pub font_weight: FontWeight,
    pub cursor_shape: CursorShape,
    pub cursor_height: u32,
    /// `None` when no image is configured or the image was disabled
    pub background_image: Option<String>,
    pub background_image_opacity: f64,
    pub background_image_stretch_mode: StretchMode,
    pub background_image_alignment: ImageAlignment,
    /// `None` means the global default scheme applies
    pub color_scheme: Option<String>,
    pub retro_terminal_effect: bool,
}

impl AppearanceConfig {
    /// Build a resolved view from merged appearance keys and font keys.
    pub(crate) fn resolve(appearance: &AppearanceSettings, font: &FontSettings) -> Self {
        Self {
            font_face: font.face.clone().unwrap_or_else(defaults::font_face),
            font_size: font.size.unwrap_or_else(defaults::font_size),
            font_weight: font.weight.unwrap_or_else(defaults::font_weight),
            cursor_shape: appearance
                .cursor_shape
                .unwrap_or_else(defaults::cursor_shape),
            cursor_height: appearance
                .cursor_height
                .unwrap_or_else(defaults::cursor_height),
            background_image: appearance
                .background_image
                .clone()
                .filter(|path| !path.is_empty()),
            background_image_opacity: appearance
                .background_image_opacity
                .unwrap_or_else(defaults::background_image_opacity),
            background_image_stretch_mode: appearance
                .background_image_stretch_mode
                .unwrap_or_else(defaults::background_image_stretch_mode),
            background_image_alignment: appearance
                .background_image_alignment
                .unwrap_or_else(defaults::background_image_alignment),
            color_scheme: appearance.color_scheme.clone(),
            retro_terminal_effect: appearance.retro_terminal_effect.unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_weight_names_and_numbers() {
        let w: FontWeight = serde_json::from_str("\"bold\"").unwrap();
        assert_eq!(w, FontWeight::BOLD);
        let w: FontWeight = serde_json::from_str("450").unwrap();
        assert_eq!(w, FontWeight(450));
        assert!(serde_json::from_str::<FontWeight>("\"heavy-ish\"").is_err());
        assert!(serde_json::from_str::<FontWeight>("1200").is_err());
        assert_eq!(serde_json::to_string(&FontWeight(600)).unwrap(), "\"semi-bold\"");
        assert_eq!(serde_json::to_string(&FontWeight(450)).unwrap(), "450");
    }

    #[test]
    fn test_absent_keys_stay_unset() {
        let a: AppearanceSettings = serde_json::from_str(r#"{"cursorShape":"filledBox"}"#).unwrap();
        assert_eq!(a.cursor_shape, Some(CursorShape::FilledBox));
        assert!(a.color_scheme.is_none());
        assert!(a.background_image.is_none());
        assert_eq!(
            serde_json::to_value(&a).unwrap(),
            serde_json::json!({"cursorShape": "filledBox"})
        );
    }

    #[test]
    fn test_retro_effect_key() {
        let a: AppearanceSettings =
            serde_json::from_str(r#"{"experimental.retroTerminalEffect":true}"#).unwrap();
        assert_eq!(a.retro_terminal_effect, Some(true));
    }

    #[test]
    fn test_fill_from_keeps_explicit_values() {
        let mut upper = AppearanceSettings {
            color_scheme: Some("One Half Dark".to_string()),
            ..Default::default()
        };
        let lower = AppearanceSettings {
            color_scheme: Some("Campbell".to_string()),
            cursor_height: Some(40),
            ..Default::default()
        };
        upper.fill_from(&lower);
        assert_eq!(upper.color_scheme.as_deref(), Some("One Half Dark"));
        assert_eq!(upper.cursor_height, Some(40));
    }

    #[test]
    fn test_resolve_treats_empty_image_as_disabled() {
        let appearance = AppearanceSettings {
            background_image: Some(String::new()),
            ..Default::default()
        };
        let config = AppearanceConfig::resolve(&appearance, &FontSettings::default());
        assert!(config.background_image.is_none());
        assert_eq!(config.font_face, "Cascadia Mono");
        assert_eq!(config.cursor_shape, CursorShape::Bar);
    }
}
