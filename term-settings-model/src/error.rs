//! Typed error variants for the term-settings-model crate.
//!
//! Parse and structural failures never escape a load call: they are stored in
//! the resulting [`Settings`](crate::Settings) as its fatal state. Callers who
//! prefer a `Result` use [`Settings::into_result`](crate::Settings::into_result).
//!
//! # Example
//!
//! ```rust,no_run
//! use term_settings_model::{Settings, SettingsLoadError};
//!
//! match Settings::load_all().map(Settings::into_result) {
//!     Ok(Ok(settings)) => println!("{} profiles", settings.active_profiles().len()),
//!     Ok(Err(SettingsLoadError::Deserialization { origin })) => {
//!         eprintln!("could not parse the {origin} settings");
//!     }
//!     Ok(Err(fatal)) => eprintln!("{fatal}"),
//!     Err(io) => eprintln!("{io}"),
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

use crate::profile_types::OriginTag;

/// A layer could not be parsed. Carries the layer's origin so callers can
/// tell a broken user file from a broken defaults document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to parse {origin} settings: {message}")]
pub struct ParseError {
    pub origin: OriginTag,
    pub message: String,
}

impl ParseError {
    pub(crate) fn new(origin: OriginTag, message: impl Into<String>) -> Self {
        Self {
            origin,
            message: message.into(),
        }
    }
}

/// Fatal load states. A snapshot carrying one of these is unusable; the
/// caller falls back to [`Settings::load_defaults`](crate::Settings::load_defaults).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum SettingsLoadError {
    /// The merged profile set is empty.
    #[error("no profiles are defined")]
    NoProfiles,

    /// Every profile in the merged set is hidden.
    #[error("all profiles are hidden")]
    AllProfilesHidden,

    /// A layer failed to parse; the raw message is kept on the snapshot.
    #[error("failed to parse {origin} settings")]
    Deserialization { origin: OriginTag },
}

/// Errors that can occur when reading or writing settings files.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// An I/O error occurred on `path`.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The in-memory settings could not be encoded as JSON.
    #[error("failed to encode settings: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The snapshot failed to load; writing it would discard the user's file.
    #[error("refusing to write settings that failed to load: {0}")]
    Unusable(SettingsLoadError),
}

impl PersistenceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PersistenceError::Io {
            path: path.into(),
            source,
        }
    }
}
