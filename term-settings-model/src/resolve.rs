//! Reference resolver.
//!
//! Looks up every symbolic reference of a merged model (scheme names, the
//! default-profile reference) and reports what did not resolve. It neither
//! repairs nor warns; that is the validator's job.

use crate::merge::SettingsModel;
use crate::profile_types::{AppearanceSlot, ProfileId, parse_guid};

/// A profile appearance naming a scheme that does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UnresolvedScheme {
    pub profile: ProfileId,
    pub slot: AppearanceSlot,
    pub scheme: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ResolvedReferences {
    /// Profile named by the default-profile reference, hidden or not
    pub default_profile: Option<ProfileId>,
    pub default_scheme_resolved: bool,
    pub unresolved_schemes: Vec<UnresolvedScheme>,
}

/// Resolve a default-profile reference: identity first, then exact name.
pub(crate) fn resolve_profile_reference(
    model: &SettingsModel,
    reference: &str,
) -> Option<ProfileId> {
    if let Some(guid) = parse_guid(reference)
        && model.find_profile(&guid).is_some()
    {
        return Some(guid);
    }
    model
        .profiles
        .iter()
        .find(|p| p.name() == reference)
        .map(|p| p.guid())
}

pub(crate) fn resolve(model: &SettingsModel) -> ResolvedReferences {
    let default_profile = model
        .globals
        .default_profile()
        .and_then(|reference| resolve_profile_reference(model, reference));

    let default_scheme_resolved = model
        .find_scheme(&model.globals.default_color_scheme())
        .is_some();

    let mut unresolved_schemes = Vec::new();
    for profile in &model.profiles {
        for slot in [AppearanceSlot::Default, AppearanceSlot::Unfocused] {
            let Some(scheme) = profile.appearance_value(slot, |a| a.color_scheme.clone()) else {
                continue;
            };
            if model.find_scheme(&scheme).is_none() {
                log::trace!(
                    "Profile '{}' ({slot}) references missing scheme '{scheme}'",
                    profile.name()
                );
                unresolved_schemes.push(UnresolvedScheme {
                    profile: profile.guid(),
                    slot,
                    scheme,
                });
            }
        }
    }

    ResolvedReferences {
        default_profile,
        default_scheme_resolved,
        unresolved_schemes,
    }
}
