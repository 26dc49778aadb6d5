//! Recoverable problems found (and repaired) while validating settings.

use std::fmt;

use crate::profile_types::{AppearanceSlot, ProfileId, format_guid};

/// What was wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    /// The default-profile reference did not name an active profile
    DefaultProfileNotFound,
    /// Two profiles shared a name and origin, or an identity within one layer
    DuplicateProfile,
    /// A scheme reference named a scheme that does not exist
    UnknownColorScheme,
    /// A background image path was missing or unreadable
    InvalidBackgroundImage,
    /// Two entries of one layer bound the same chord
    KeybindingConflict,
    /// A chord string could not be parsed
    InvalidKeyChord,
    /// A command named an action that does not exist
    UnknownAction,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WarningKind::DefaultProfileNotFound => "DefaultProfileNotFound",
            WarningKind::DuplicateProfile => "DuplicateProfile",
            WarningKind::UnknownColorScheme => "UnknownColorScheme",
            WarningKind::InvalidBackgroundImage => "InvalidBackgroundImage",
            WarningKind::KeybindingConflict => "KeybindingConflict",
            WarningKind::InvalidKeyChord => "InvalidKeyChord",
            WarningKind::UnknownAction => "UnknownAction",
        };
        f.write_str(s)
    }
}

/// Where the problem was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningContext {
    /// A global setting, by its JSON key
    Globals { setting: &'static str },
    /// A profile, optionally narrowed to one of its appearances
    Profile {
        guid: ProfileId,
        name: String,
        slot: Option<AppearanceSlot>,
    },
    /// A key chord of the action table
    Keybinding { keys: String },
    /// A command of the action table, by action name
    Command { action: String },
}

impl fmt::Display for WarningContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningContext::Globals { setting } => write!(f, "global setting '{setting}'"),
            WarningContext::Profile { guid, name, slot } => {
                write!(f, "profile '{name}' {}", format_guid(guid))?;
                if let Some(slot) = slot {
                    write!(f, " ({slot})")?;
                }
                Ok(())
            }
            WarningContext::Keybinding { keys } => write!(f, "keybinding '{keys}'"),
            WarningContext::Command { action } => write!(f, "command '{action}'"),
        }
    }
}

/// One repair the validator made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsWarning {
    pub kind: WarningKind,
    pub context: WarningContext,
    /// Human-readable description of the problem and the repair
    pub detail: String,
}

impl SettingsWarning {
    pub(crate) fn new(
        kind: WarningKind,
        context: WarningContext,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            context,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for SettingsWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}: {}", self.kind, self.context, self.detail)
    }
}
