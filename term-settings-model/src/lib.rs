//! Layered settings engine for term-settings.
//!
//! This crate turns the built-in defaults document, extension fragments and
//! the user's settings file into one validated [`Settings`] snapshot. It
//! includes:
//!
//! - Layer parsing, merging and reference resolution
//! - A validator that repairs bad settings and reports [`SettingsWarning`]s
//! - Profile inheritance through templates and base records
//! - Color schemes, global settings and the action table
//! - A serializer that writes back only what the user changed
//! - Snapshot publishing through [`SettingsStore`]

pub mod actions;
pub mod defaults;
pub mod env_vars;
pub mod error;
pub mod globals;
mod layer;
mod merge;
pub mod persistence;
pub mod profile_types;
mod resolve;
mod serialize;
pub mod settings;
pub mod store;
pub mod themes;
mod validation;
pub mod warnings;

// Re-export main types for convenience
pub use actions::{ActionEntry, ActionMap, Command};
pub use env_vars::{expand_path, substitute_variables};
pub use error::{ParseError, PersistenceError, SettingsLoadError};
pub use globals::{GlobalAppSettings, GlobalSettings, LaunchMode};
pub use persistence::{SettingsFragment, config_dir, settings_path};
pub use profile_types::{
    AppearanceConfig, AppearanceSettings, AppearanceSlot, CursorShape, FontSettings, FontWeight,
    ImageAlignment, OriginTag, Profile, ProfileId, ProfileSettings, StretchMode, format_guid,
    parse_guid,
};
pub use settings::{NewTerminalArgs, Settings};
pub use store::SettingsStore;
pub use themes::{Color, ColorScheme};
pub use warnings::{SettingsWarning, WarningContext, WarningKind};

// Chord types appear in the action map's API
pub use term_settings_keybindings::{KeyChord, parse_key_chord};
