//! Layer merger: defaults + fragments + user → one [`SettingsModel`].
//!
//! Profiles are matched by identity. A user record that matches an existing
//! profile becomes that profile's own settings, keeping its position and
//! origin; the matched record stays underneath as the base parent, so only
//! the keys the user wrote override anything.

use std::collections::HashMap;
use std::sync::Arc;

use crate::actions::ActionEntry;
use crate::globals::GlobalAppSettings;
use crate::layer::{ParsedLayer, ProfileRecord};
use crate::profile_types::{OriginTag, Profile, ProfileId, ProfileSettings};
use crate::themes::ColorScheme;

/// The merged, not yet validated, settings.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SettingsModel {
    pub globals: GlobalAppSettings,
    /// The user layer's `profiles.defaults`
    pub user_defaults: Arc<ProfileSettings>,
    /// The defaults layer's `profiles.defaults`
    pub base_defaults: Arc<ProfileSettings>,
    /// All profiles: defaults, then fragments, then user-added
    pub profiles: Vec<Profile>,
    pub schemes: Vec<ColorScheme>,
    /// Defaults entries followed by user entries
    pub actions: Vec<ActionEntry>,
    /// Resolved default profile; filled in by validation
    pub default_profile: Option<ProfileId>,
    /// In-layer identity collisions the parser set aside
    pub pending_duplicates: Vec<ProfileRecord>,
}

impl SettingsModel {
    pub fn find_profile(&self, guid: &ProfileId) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.guid() == *guid)
    }

    pub fn find_scheme(&self, name: &str) -> Option<&ColorScheme> {
        self.schemes.iter().find(|s| s.name == name)
    }
}

/// Merge the layers. `user` is `None` on first run.
pub(crate) fn merge(
    defaults: &ParsedLayer,
    fragments: &[ParsedLayer],
    user: Option<&ParsedLayer>,
) -> SettingsModel {
    let empty_user = ParsedLayer::empty(OriginTag::User);
    let user = user.unwrap_or(&empty_user);

    let base_defaults = Arc::clone(&defaults.profile_defaults);
    let user_defaults = Arc::clone(&user.profile_defaults);

    let mut profiles: Vec<Profile> = Vec::new();
    let mut index: HashMap<ProfileId, usize> = HashMap::new();
    let mut pending_duplicates = defaults.duplicates.clone();

    let inherit = |record: &ProfileRecord| {
        Profile::new(
            record.guid,
            record.origin,
            ProfileSettings::default(),
            Some(Arc::clone(&record.settings)),
            Arc::clone(&user_defaults),
            Arc::clone(&base_defaults),
        )
    };

    for record in &defaults.profiles {
        index.insert(record.guid, profiles.len());
        profiles.push(inherit(record));
    }

    for fragment in fragments {
        for record in &fragment.profiles {
            if index.contains_key(&record.guid) {
                log::warn!(
                    "Fragment profile '{}' ({}) collides with an existing profile; skipped",
                    record.name(),
                    record.guid
                );
                continue;
            }
            log::trace!("Adding fragment profile '{}'", record.name());
            index.insert(record.guid, profiles.len());
            profiles.push(inherit(record));
        }
        pending_duplicates.extend(fragment.duplicates.iter().cloned());
        if !fragment.globals.is_empty() || !fragment.actions.is_empty() {
            log::debug!("Ignoring global settings and actions in a fragment");
        }
    }

    for record in &user.profiles {
        match index.get(&record.guid) {
            Some(&i) => {
                log::trace!("Overlaying user record on profile '{}'", record.name());
                let profile = &mut profiles[i];
                *profile.settings_mut() = (*record.settings).clone();
                profile.set_in_user_layer(true);
            }
            None => {
                log::trace!("Adding user profile '{}'", record.name());
                let mut profile = Profile::new(
                    record.guid,
                    record.origin,
                    (*record.settings).clone(),
                    None,
                    Arc::clone(&user_defaults),
                    Arc::clone(&base_defaults),
                );
                profile.set_in_user_layer(true);
                index.insert(record.guid, profiles.len());
                profiles.push(profile);
            }
        }
    }
    pending_duplicates.extend(user.duplicates.iter().cloned());

    let schemes = merge_schemes(defaults, fragments, user);

    let mut actions = defaults.actions.clone();
    actions.extend(user.actions.iter().cloned());

    log::debug!(
        "Merged settings: {} profiles, {} schemes, {} actions",
        profiles.len(),
        schemes.len(),
        actions.len()
    );

    SettingsModel {
        globals: GlobalAppSettings::new(defaults.globals.clone(), user.globals.clone()),
        user_defaults,
        base_defaults,
        profiles,
        schemes,
        actions,
        default_profile: None,
        pending_duplicates,
    }
}

fn merge_schemes(
    defaults: &ParsedLayer,
    fragments: &[ParsedLayer],
    user: &ParsedLayer,
) -> Vec<ColorScheme> {
    let mut schemes = defaults.schemes.clone();
    for fragment in fragments {
        for scheme in &fragment.schemes {
            if schemes.iter().any(|s| s.name == scheme.name) {
                log::debug!("Fragment scheme '{}' already defined; skipped", scheme.name);
                continue;
            }
            schemes.push(scheme.clone());
        }
    }
    for scheme in &user.schemes {
        match schemes.iter_mut().find(|s| s.name == scheme.name) {
            Some(existing) => *existing = scheme.clone(),
            None => schemes.push(scheme.clone()),
        }
    }
    if schemes.is_empty() {
        log::info!("No color schemes defined; using the built-in Campbell palette");
        schemes.push(ColorScheme::campbell());
    }
    schemes
}
