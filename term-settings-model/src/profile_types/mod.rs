//! Profile types for terminal session configurations.
//!
//! ## Sub-modules
//!
//! - [`appearance`]: appearance and font keys, and the resolved `AppearanceConfig`
//! - [`identity`]: `ProfileId` parsing, formatting and derivation
//! - [`matchers`]: commandline matching for launch requests
//! - [`origin`]: `OriginTag`, the layer a record came from
//! - [`profile`]: `ProfileSettings` records and the merged `Profile`

pub mod appearance;
pub mod identity;
pub mod matchers;
pub mod origin;
pub mod profile;

pub use appearance::{
    AppearanceConfig, AppearanceSettings, AppearanceSlot, CursorShape, FontSettings, FontWeight,
    ImageAlignment, StretchMode,
};
pub use identity::{ProfileId, derive_profile_id, format_guid, parse_guid};
pub use origin::OriginTag;
pub use profile::{Profile, ProfileSettings};
