//! Settings validator.
//!
//! Runs a fixed sequence of passes over a merged model. A pass either repairs
//! what it finds and records a [`SettingsWarning`], or (pass 1 only) marks the
//! whole configuration unusable. Running the validator again over its own
//! output yields no further warnings.

use std::collections::{HashMap, HashSet};
use std::fs::File;

use term_settings_keybindings::{KeybindingRegistry, parse_key_chord};

use crate::actions::ActionEntry;
use crate::defaults::DESKTOP_WALLPAPER;
use crate::env_vars::expand_path;
use crate::error::SettingsLoadError;
use crate::merge::SettingsModel;
use crate::profile_types::{AppearanceSlot, OriginTag, Profile, ProfileId, format_guid};
use crate::resolve::ResolvedReferences;
use crate::warnings::{SettingsWarning, WarningContext, WarningKind};

/// Result of a validation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ValidationOutcome {
    pub warnings: Vec<SettingsWarning>,
    pub fatal: Option<SettingsLoadError>,
}

struct Validator<'a> {
    model: &'a mut SettingsModel,
    refs: &'a ResolvedReferences,
    warnings: Vec<SettingsWarning>,
}

/// Validate and repair `model` in place.
pub(crate) fn validate(
    model: &mut SettingsModel,
    refs: &ResolvedReferences,
) -> ValidationOutcome {
    let mut validator = Validator {
        model,
        refs,
        warnings: Vec::new(),
    };

    if let Err(fatal) = validator.check_profiles_exist() {
        log::error!("Settings are unusable: {fatal}");
        return ValidationOutcome {
            warnings: validator.warnings,
            fatal: Some(fatal),
        };
    }
    validator.check_default_profile();
    validator.check_duplicate_profiles();
    validator.check_color_schemes();
    validator.check_media_resources();
    validator.check_keybindings();
    validator.check_command_color_schemes();

    ValidationOutcome {
        warnings: validator.warnings,
        fatal: None,
    }
}

fn profile_context(profile: &Profile, slot: Option<AppearanceSlot>) -> WarningContext {
    WarningContext::Profile {
        guid: profile.guid(),
        name: profile.name(),
        slot,
    }
}

impl Validator<'_> {
    fn warn(&mut self, kind: WarningKind, context: WarningContext, detail: String) {
        let warning = SettingsWarning::new(kind, context, detail);
        log::warn!("{warning}");
        self.warnings.push(warning);
    }

    fn first_active(&self) -> Option<ProfileId> {
        self.model
            .profiles
            .iter()
            .find(|p| !p.hidden())
            .map(Profile::guid)
    }

    fn is_active(&self, guid: &ProfileId) -> bool {
        self.model.find_profile(guid).is_some_and(|p| !p.hidden())
    }

    // ── Pass 1 ─────────────────────────────────────────────────────────────

    fn check_profiles_exist(&self) -> Result<(), SettingsLoadError> {
        if self.model.profiles.is_empty() {
            return Err(SettingsLoadError::NoProfiles);
        }
        if self.model.profiles.iter().all(Profile::hidden) {
            return Err(SettingsLoadError::AllProfilesHidden);
        }
        Ok(())
    }

    // ── Pass 2 ─────────────────────────────────────────────────────────────

    fn check_default_profile(&mut self) {
        let first_active = self.first_active();
        let configured = self.model.globals.default_profile().map(str::to_string);

        let Some(reference) = configured else {
            self.model.default_profile = first_active;
            return;
        };

        if let Some(guid) = self.refs.default_profile
            && self.is_active(&guid)
        {
            self.model.default_profile = Some(guid);
            return;
        }

        self.model.default_profile = first_active;
        let Some(fallback) = first_active else {
            return;
        };
        let fallback_text = format_guid(&fallback);
        self.model.globals.user_layer_mut().default_profile = Some(fallback_text.clone());
        self.warn(
            WarningKind::DefaultProfileNotFound,
            WarningContext::Globals {
                setting: "defaultProfile",
            },
            format!("'{reference}' is not an active profile; using {fallback_text}"),
        );
    }

    // ── Pass 3 ─────────────────────────────────────────────────────────────

    fn check_duplicate_profiles(&mut self) {
        let pending = std::mem::take(&mut self.model.pending_duplicates);
        for record in pending {
            self.warn(
                WarningKind::DuplicateProfile,
                WarningContext::Profile {
                    guid: record.guid,
                    name: record.name(),
                    slot: None,
                },
                format!(
                    "identity repeated within the {} settings; the later record was ignored",
                    record.origin
                ),
            );
        }

        let mut seen: HashMap<(String, OriginTag), ProfileId> = HashMap::new();
        let mut dropped: Vec<(ProfileId, ProfileId)> = Vec::new();
        for profile in &self.model.profiles {
            let key = (profile.name(), profile.origin());
            match seen.get(&key) {
                Some(&kept) => dropped.push((profile.guid(), kept)),
                None => {
                    seen.insert(key, profile.guid());
                }
            }
        }

        for (guid, kept) in dropped {
            let Some(profile) = self.model.find_profile(&guid) else {
                continue;
            };
            let context = profile_context(profile, None);
            self.model.profiles.retain(|p| p.guid() != guid);
            self.warn(
                WarningKind::DuplicateProfile,
                context,
                format!("same name and origin as {}; dropped", format_guid(&kept)),
            );
            if self.model.default_profile == Some(guid) {
                self.model.default_profile = if self.is_active(&kept) {
                    Some(kept)
                } else {
                    self.first_active()
                };
                // the configured reference named the dropped record
                if self.refs.default_profile == Some(guid)
                    && let Some(replacement) = self.model.default_profile
                {
                    self.model.globals.user_layer_mut().default_profile =
                        Some(format_guid(&replacement));
                }
            }
        }
    }

    // ── Pass 4 ─────────────────────────────────────────────────────────────

    fn check_color_schemes(&mut self) {
        if !self.refs.default_scheme_resolved {
            let missing = self.model.globals.default_color_scheme();
            if self.model.find_scheme(&missing).is_none()
                && let Some(first) = self.model.schemes.first().map(|s| s.name.clone())
            {
                self.model.globals.user_layer_mut().default_color_scheme = Some(first.clone());
                self.warn(
                    WarningKind::UnknownColorScheme,
                    WarningContext::Globals {
                        setting: "defaultColorScheme",
                    },
                    format!("color scheme '{missing}' not found; using '{first}'"),
                );
            }
        }

        let fallback = self.model.globals.default_color_scheme();
        let refs = self.refs;
        for unresolved in &refs.unresolved_schemes {
            let Some(profile) = self
                .model
                .profiles
                .iter_mut()
                .find(|p| p.guid() == unresolved.profile)
            else {
                continue;
            };
            profile
                .settings_mut()
                .appearance_mut(unresolved.slot)
                .color_scheme = Some(fallback.clone());
            let context = profile_context(profile, Some(unresolved.slot));
            self.warn(
                WarningKind::UnknownColorScheme,
                context,
                format!(
                    "color scheme '{}' not found; using '{fallback}'",
                    unresolved.scheme
                ),
            );
        }
    }

    // ── Pass 5 ─────────────────────────────────────────────────────────────

    fn check_media_resources(&mut self) {
        let mut invalid: Vec<(usize, AppearanceSlot, String)> = Vec::new();
        for (index, profile) in self.model.profiles.iter().enumerate() {
            for slot in [AppearanceSlot::Default, AppearanceSlot::Unfocused] {
                let Some(path) = profile.appearance_value(slot, |a| a.background_image.clone())
                else {
                    continue;
                };
                if path.is_empty() || path == DESKTOP_WALLPAPER {
                    continue;
                }
                if !is_readable_file(&path) {
                    invalid.push((index, slot, path));
                }
            }
        }

        for (index, slot, path) in invalid {
            let Some(profile) = self.model.profiles.get_mut(index) else {
                continue;
            };
            profile
                .settings_mut()
                .appearance_mut(slot)
                .background_image = Some(String::new());
            let context = profile_context(profile, Some(slot));
            self.warn(
                WarningKind::InvalidBackgroundImage,
                context,
                format!("'{path}' is not a readable file; background image disabled"),
            );
        }
    }

    // ── Pass 6 ─────────────────────────────────────────────────────────────

    fn check_keybindings(&mut self) {
        let entries = std::mem::take(&mut self.model.actions);
        let mut kept: Vec<ActionEntry> = Vec::with_capacity(entries.len());
        let mut registries: HashMap<OriginTag, KeybindingRegistry<usize>> = HashMap::new();

        for mut entry in entries {
            if !entry.command.is_unbound() && entry.command.shortcut_action().is_none() {
                self.warn(
                    WarningKind::UnknownAction,
                    WarningContext::Command {
                        action: entry.command.action.clone(),
                    },
                    "unknown action; entry removed".to_string(),
                );
                continue;
            }

            let index = kept.len();
            let unbinds = entry.command.is_unbound();
            let registry = registries.entry(entry.origin).or_default();
            let mut keys = Vec::with_capacity(entry.keys.len());
            let mut seen_here = HashSet::new();
            let mut conflicts = Vec::new();
            let mut invalid = Vec::new();

            for text in std::mem::take(&mut entry.keys) {
                let chord = match parse_key_chord(&text) {
                    Ok(chord) => chord,
                    Err(e) => {
                        invalid.push((text, e));
                        continue;
                    }
                };
                if !seen_here.insert(chord) {
                    continue;
                }
                if unbinds {
                    registry.unbind(&chord);
                } else if let Some(conflict) = registry.bind_checked(chord, index) {
                    conflicts.push(conflict);
                }
                keys.push(text);
            }
            entry.keys = keys;

            for (text, e) in invalid {
                self.warn(
                    WarningKind::InvalidKeyChord,
                    WarningContext::Keybinding { keys: text },
                    format!("{e}; chord dropped from '{}'", entry.command.action),
                );
            }
            for conflict in conflicts {
                let Some(loser) = kept.get_mut(conflict.displaced) else {
                    continue;
                };
                loser
                    .keys
                    .retain(|k| parse_key_chord(k).map_or(true, |c| c != conflict.chord));
                let detail = format!(
                    "'{}' replaces '{}' in the {} settings",
                    entry.command.action, loser.command.action, entry.origin
                );
                self.warn(
                    WarningKind::KeybindingConflict,
                    WarningContext::Keybinding {
                        keys: conflict.chord.to_string(),
                    },
                    detail,
                );
            }
            kept.push(entry);
        }

        self.model.actions = kept;
    }

    // ── Pass 7 ─────────────────────────────────────────────────────────────

    fn check_command_color_schemes(&mut self) {
        let mut repairs = Vec::new();
        for (index, entry) in self.model.actions.iter().enumerate() {
            if let Some(name) = entry.command.color_scheme()
                && self.model.find_scheme(name).is_none()
            {
                repairs.push((index, name.to_string()));
            }
        }

        for (index, name) in repairs {
            let Some(entry) = self.model.actions.get_mut(index) else {
                continue;
            };
            entry.command.remove_color_scheme();
            let action = entry.command.action.clone();
            self.warn(
                WarningKind::UnknownColorScheme,
                WarningContext::Command { action },
                format!("color scheme '{name}' not found; argument removed"),
            );
        }
    }
}

fn is_readable_file(path: &str) -> bool {
    let expanded = expand_path(path);
    expanded.is_file() && File::open(&expanded).is_ok()
}
