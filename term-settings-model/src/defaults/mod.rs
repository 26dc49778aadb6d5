//! Built-in default values.
//!
//! The defaults document ships inside the crate; the free functions below
//! supply the value of a setting when no layer (user record, templates or
//! defaults record) sets it.

use crate::profile_types::{CursorShape, FontWeight, ImageAlignment, StretchMode};

/// The defaults layer, versioned with the crate.
pub const DEFAULTS_JSON: &str = include_str!("defaults.json");

// ── Profile ────────────────────────────────────────────────────────────────

pub fn profile_name() -> String {
    "Default".to_string()
}

pub fn font_face() -> String {
    "Cascadia Mono".to_string()
}

pub fn font_size() -> f64 {
    12.0
}

pub fn font_weight() -> FontWeight {
    FontWeight::NORMAL
}

pub fn cursor_shape() -> CursorShape {
    CursorShape::Bar
}

pub fn cursor_height() -> u32 {
    25
}

pub fn background_image_opacity() -> f64 {
    1.0
}

pub fn background_image_stretch_mode() -> StretchMode {
    StretchMode::UniformToFill
}

pub fn background_image_alignment() -> ImageAlignment {
    ImageAlignment::Center
}

// ── Globals ────────────────────────────────────────────────────────────────

pub fn color_scheme() -> String {
    "Campbell".to_string()
}

pub fn initial_cols() -> u32 {
    120
}

pub fn initial_rows() -> u32 {
    30
}

pub fn copy_on_select() -> bool {
    false
}

pub fn confirm_close_all_tabs() -> bool {
    true
}

pub fn always_show_tabs() -> bool {
    true
}

// ── Media ──────────────────────────────────────────────────────────────────

/// Background image value that refers to the desktop wallpaper, not a file.
pub const DESKTOP_WALLPAPER: &str = "desktopWallpaper";
