//! Profile provenance tracking.
//!
//! Tracks which layer a profile (or color scheme, or action) came from. The
//! tag is derived while parsing and is never written back to disk.

use std::fmt;

/// Where a record came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OriginTag {
    /// Shipped with the application in the defaults document
    BuiltIn,
    /// Authored by the user in their settings file
    #[default]
    User,
    /// Produced by a profile generator, or created through the edit API
    Generated,
    /// Contributed by an extension fragment
    Fragment,
}

impl OriginTag {
    /// Stable lowercase key, also used when deriving profile identities
    pub fn as_str(&self) -> &'static str {
        match self {
            OriginTag::BuiltIn => "builtin",
            OriginTag::User => "user",
            OriginTag::Generated => "generated",
            OriginTag::Fragment => "fragment",
        }
    }

    /// Returns true if records with this origin are persisted in the user file
    pub fn is_user_owned(&self) -> bool {
        matches!(self, OriginTag::User | OriginTag::Generated)
    }
}

impl fmt::Display for OriginTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
