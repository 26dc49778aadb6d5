//! Profile identity helpers.
//!
//! Identities are UUIDs written in braced, hyphenated form
//! (`{61c54bbd-c2c6-5271-96e7-009a87ff44bf}`). Records that omit an identity
//! get one derived from their namespace and name, so the same text always
//! yields the same identity.

use serde::{Deserialize, Deserializer};
use uuid::Uuid;

/// Unique identifier for a profile
pub type ProfileId = Uuid;

/// Namespace for identities derived from a profile's namespace and name.
const PROFILE_NAMESPACE: Uuid = Uuid::from_u128(0x2bde4a90_d05f_401c_9492_e40884ead1d8);

/// Derive a stable identity for a record without an explicit `guid`.
///
/// `namespace` is the record's generator source when it has one, otherwise
/// the origin key of the layer it was parsed from.
pub fn derive_profile_id(namespace: &str, name: &str) -> ProfileId {
    Uuid::new_v5(&PROFILE_NAMESPACE, format!("{namespace}:{name}").as_bytes())
}

/// Format an identity the way settings files store it.
pub fn format_guid(id: &ProfileId) -> String {
    format!("{{{}}}", id.hyphenated())
}

/// Parse an identity with or without surrounding braces.
pub fn parse_guid(s: &str) -> Option<ProfileId> {
    let trimmed = s.trim();
    let inner = trimmed
        .strip_prefix('{')
        .and_then(|t| t.strip_suffix('}'))
        .unwrap_or(trimmed);
    Uuid::parse_str(inner).ok()
}

/// Deserialize an optional identity stored as a (braced) string.
pub(crate) fn deserialize_guid_opt<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<ProfileId>, D::Error> {
    let raw: Option<String> = Option::deserialize(d)?;
    match raw {
        None => Ok(None),
        Some(text) => parse_guid(&text)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid guid '{text}'"))),
    }
}
