//! The configuration snapshot.
//!
//! [`Settings`] is built once per load by running parse, merge, resolve and
//! validate over the layers, and is never changed afterwards. Edit calls
//! return a new snapshot built from a copy of this one.
//!
//! # Loading
//!
//! ```no_run
//! use term_settings_model::Settings;
//!
//! let settings = Settings::load_all()?;
//! for warning in settings.warnings() {
//!     eprintln!("{warning}");
//! }
//! # Ok::<(), term_settings_model::PersistenceError>(())
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use crate::actions::{ActionEntry, ActionMap};
use crate::defaults::DEFAULTS_JSON;
use crate::error::{ParseError, PersistenceError, SettingsLoadError};
use crate::globals::GlobalAppSettings;
use crate::layer::ParsedLayer;
use crate::merge::{SettingsModel, merge};
use crate::persistence::{self, SettingsFragment};
use crate::profile_types::matchers::best_commandline_match;
use crate::profile_types::{
    AppearanceSlot, OriginTag, Profile, ProfileId, ProfileSettings, format_guid, parse_guid,
};
use crate::resolve::resolve;
use crate::serialize;
use crate::themes::ColorScheme;
use crate::validation::validate;
use crate::warnings::SettingsWarning;

/// What a new terminal was asked to open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTerminalArgs {
    /// Profile identity or name
    pub profile: Option<String>,
    /// Index into the active profiles
    pub profile_index: Option<usize>,
    pub commandline: Option<String>,
}

impl NewTerminalArgs {
    pub fn with_profile(profile: impl Into<String>) -> Self {
        Self {
            profile: Some(profile.into()),
            ..Self::default()
        }
    }

    pub fn with_commandline(commandline: impl Into<String>) -> Self {
        Self {
            commandline: Some(commandline.into()),
            ..Self::default()
        }
    }
}

/// A validated, immutable configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    model: SettingsModel,
    /// Indices into `model.profiles` of the non-hidden profiles
    active: Vec<usize>,
    by_guid: HashMap<ProfileId, usize>,
    action_map: ActionMap,
    warnings: Vec<SettingsWarning>,
    load_error: Option<SettingsLoadError>,
    deserialization_message: Option<String>,
    universal: bool,
}

impl Settings {
    // ── Construction ───────────────────────────────────────────────────────

    /// Build a snapshot from a defaults document and an optional user
    /// document. `None` means the user has no settings file yet.
    pub fn from_json(defaults: &str, user: Option<&str>) -> Self {
        Self::from_layers(defaults, &[], user)
    }

    /// Build a snapshot from defaults, fragments and the user document.
    ///
    /// A fragment that fails to parse is skipped. A defaults or user document
    /// that fails to parse yields a snapshot whose
    /// [`load_error`](Self::load_error) is set.
    pub fn from_layers(
        defaults: &str,
        fragments: &[SettingsFragment],
        user: Option<&str>,
    ) -> Self {
        let (defaults, fragments, user) = match parse_layers(defaults, fragments, user) {
            Ok(layers) => layers,
            Err(e) => return Self::failed(e),
        };

        let mut model = merge(&defaults, &fragments, user.as_ref());
        let refs = resolve(&model);
        let outcome = validate(&mut model, &refs);
        log::info!(
            "Loaded settings: {} profiles, {} schemes, {} actions, {} warnings",
            model.profiles.len(),
            model.schemes.len(),
            model.actions.len(),
            outcome.warnings.len()
        );
        Self::from_model(model, outcome.warnings, outcome.fatal)
    }

    /// The built-in defaults alone.
    pub fn load_defaults() -> Self {
        Self::from_json(DEFAULTS_JSON, None)
    }

    /// Built-in defaults, every fragment in the configuration directory, and
    /// the user settings file.
    pub fn load_all() -> Result<Self, PersistenceError> {
        let path = persistence::settings_path();
        log::info!("Loading settings from {}", path.display());
        let user = persistence::read_optional(&path)?;
        if user.is_none() {
            log::info!("No settings file at {}; using defaults", path.display());
        }
        let fragments = persistence::read_fragments();
        Ok(Self::from_layers(DEFAULTS_JSON, &fragments, user.as_deref()))
    }

    /// Globals, schemes and actions of the built-in defaults and the user
    /// file, without validating profiles. Meant for early startup.
    pub fn load_universal() -> Result<Self, PersistenceError> {
        let user = persistence::read_optional(&persistence::settings_path())?;
        Ok(Self::universal_from_json(DEFAULTS_JSON, user.as_deref()))
    }

    /// [`load_universal`](Self::load_universal) over in-memory documents.
    pub fn universal_from_json(defaults: &str, user: Option<&str>) -> Self {
        let (defaults, _, user) = match parse_layers(defaults, &[], user) {
            Ok(layers) => layers,
            Err(e) => return Self::failed(e),
        };
        let model = merge(&defaults, &[], user.as_ref());
        let mut settings = Self::from_model(model, Vec::new(), None);
        settings.universal = true;
        settings
    }

    fn failed(error: ParseError) -> Self {
        log::error!("{error}");
        let model = merge(&ParsedLayer::empty(OriginTag::BuiltIn), &[], None);
        let mut settings = Self::from_model(
            model,
            Vec::new(),
            Some(SettingsLoadError::Deserialization {
                origin: error.origin,
            }),
        );
        settings.deserialization_message = Some(error.message);
        settings
    }

    fn from_model(
        model: SettingsModel,
        warnings: Vec<SettingsWarning>,
        load_error: Option<SettingsLoadError>,
    ) -> Self {
        let active = model
            .profiles
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.hidden())
            .map(|(i, _)| i)
            .collect();
        let by_guid = model
            .profiles
            .iter()
            .enumerate()
            .map(|(i, p)| (p.guid(), i))
            .collect();
        let action_map = ActionMap::from_entries(&model.actions);
        Self {
            model,
            active,
            by_guid,
            action_map,
            warnings,
            load_error,
            deserialization_message: None,
            universal: false,
        }
    }

    /// Apply `edit` to a copy of the model, revalidate, and wrap the result.
    /// Warnings raised by the edit are appended to the existing ones. A load
    /// error on `self` stays with the edited snapshot.
    fn edited(&self, edit: impl FnOnce(&mut SettingsModel)) -> Self {
        let mut model = self.model.clone();
        edit(&mut model);
        let refs = resolve(&model);
        let outcome = validate(&mut model, &refs);
        let mut warnings = self.warnings.clone();
        warnings.extend(outcome.warnings);
        let mut settings = Self::from_model(model, warnings, self.load_error.or(outcome.fatal));
        if self.load_error.is_some() {
            settings.deserialization_message = self.deserialization_message.clone();
        }
        settings.universal = self.universal;
        settings
    }

    // ── Accessors ──────────────────────────────────────────────────────────

    /// Every profile, hidden ones included, in merge order.
    pub fn all_profiles(&self) -> &[Profile] {
        &self.model.profiles
    }

    /// The non-hidden profiles, in merge order.
    pub fn active_profiles(&self) -> Vec<&Profile> {
        self.active
            .iter()
            .filter_map(|&i| self.model.profiles.get(i))
            .collect()
    }

    pub fn find_profile(&self, guid: &ProfileId) -> Option<&Profile> {
        self.by_guid
            .get(guid)
            .and_then(|&i| self.model.profiles.get(i))
    }

    pub fn default_profile(&self) -> Option<&Profile> {
        self.model
            .default_profile
            .and_then(|guid| self.find_profile(&guid))
    }

    pub fn global_settings(&self) -> &GlobalAppSettings {
        &self.model.globals
    }

    pub fn color_schemes(&self) -> &[ColorScheme] {
        &self.model.schemes
    }

    pub fn color_scheme(&self, name: &str) -> Option<&ColorScheme> {
        self.model.find_scheme(name)
    }

    pub fn actions(&self) -> &[ActionEntry] {
        &self.model.actions
    }

    pub fn action_map(&self) -> &ActionMap {
        &self.action_map
    }

    /// The user layer's profile template (`profiles.defaults`).
    pub fn profile_defaults(&self) -> &ProfileSettings {
        &self.model.user_defaults
    }

    pub fn warnings(&self) -> &[SettingsWarning] {
        &self.warnings
    }

    pub fn load_error(&self) -> Option<SettingsLoadError> {
        self.load_error
    }

    /// The parser's message when a layer failed to parse.
    pub fn deserialization_error_message(&self) -> Option<&str> {
        self.deserialization_message.as_deref()
    }

    /// Whether this snapshot came from [`load_universal`](Self::load_universal).
    pub fn is_universal(&self) -> bool {
        self.universal
    }

    /// An independent copy of the snapshot.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// `Err` when the snapshot carries a fatal load error.
    pub fn into_result(self) -> Result<Self, SettingsLoadError> {
        match self.load_error {
            Some(e) => Err(e),
            None => Ok(self),
        }
    }

    // ── Queries ────────────────────────────────────────────────────────────

    /// The profile a new terminal should use.
    ///
    /// Tries, in order: `profile` as an identity then as a name,
    /// `profile_index` into the active profiles, the profile whose
    /// commandline best matches `commandline` (generated profiles first),
    /// and finally the default profile.
    pub fn get_profile_for_args(&self, args: &NewTerminalArgs) -> Option<&Profile> {
        if let Some(reference) = args.profile.as_deref() {
            if let Some(guid) = parse_guid(reference)
                && let Some(profile) = self.find_profile(&guid)
            {
                return Some(profile);
            }
            if let Some(profile) = self.model.profiles.iter().find(|p| p.name() == reference) {
                return Some(profile);
            }
            log::debug!("No profile matches '{reference}'");
        }

        if let Some(index) = args.profile_index
            && let Some(profile) = self.active_profiles().get(index).copied()
        {
            return Some(profile);
        }

        if let Some(commandline) = args.commandline.as_deref() {
            let active = self.active_profiles();
            let generated = active
                .iter()
                .copied()
                .filter(|p| p.origin() == OriginTag::Generated);
            if let Some(profile) = best_commandline_match(generated, commandline)
                .or_else(|| best_commandline_match(active.iter().copied(), commandline))
            {
                return Some(profile);
            }
        }

        self.default_profile()
    }

    /// The scheme `profile` uses when focused, falling back to the global
    /// default scheme.
    pub fn get_color_scheme_for_profile(&self, profile: &Profile) -> Option<&ColorScheme> {
        profile
            .color_scheme_name(AppearanceSlot::Default)
            .and_then(|name| self.model.find_scheme(&name))
            .or_else(|| {
                self.model
                    .find_scheme(&self.model.globals.default_color_scheme())
            })
    }

    // ── Edits ──────────────────────────────────────────────────────────────

    /// Add a new generated profile named "Profile N".
    pub fn create_new_profile(&self) -> (Self, ProfileId) {
        let guid = Uuid::new_v4();
        let name = first_unused(&self.model.profiles, |n| format!("Profile {n}"), 1);
        let settings = self.edited(|model| {
            let mut profile = Profile::new(
                guid,
                OriginTag::Generated,
                ProfileSettings::new().name(name),
                None,
                Arc::clone(&model.user_defaults),
                Arc::clone(&model.base_defaults),
            );
            profile.set_in_user_layer(true);
            model.profiles.push(profile);
        });
        (settings, guid)
    }

    /// Copy a profile's own and base fields into a new generated profile.
    pub fn duplicate_profile(&self, guid: &ProfileId) -> Option<(Self, ProfileId)> {
        let source = self.find_profile(guid)?;
        let base_name = source.name();

        let mut own = source.settings().clone();
        if let Some(base) = source.base_settings() {
            own.fill_from(base);
        }
        let plain_copy = format!("{base_name} (Copy)");
        let copy_name = if self.model.profiles.iter().any(|p| p.name() == plain_copy) {
            first_unused(&self.model.profiles, |n| format!("{base_name} (Copy {n})"), 2)
        } else {
            plain_copy
        };
        own.name = Some(copy_name);
        own.source = None;

        let new_guid = Uuid::new_v4();
        let settings = self.edited(|model| {
            let mut profile = Profile::new(
                new_guid,
                OriginTag::Generated,
                own,
                None,
                Arc::clone(&model.user_defaults),
                Arc::clone(&model.base_defaults),
            );
            profile.set_in_user_layer(true);
            model.profiles.push(profile);
        });
        Some((settings, new_guid))
    }

    /// Edit a profile's own settings. `None` when no profile has `guid`.
    pub fn update_profile(
        &self,
        guid: &ProfileId,
        update: impl FnOnce(&mut ProfileSettings),
    ) -> Option<Self> {
        let index = *self.by_guid.get(guid)?;
        Some(self.edited(|model| {
            if let Some(profile) = model.profiles.get_mut(index) {
                update(profile.settings_mut());
                profile.set_in_user_layer(true);
            }
        }))
    }

    /// Point every reference to scheme `old` at `new`: the global default,
    /// the user template, both appearance slots of every profile, and
    /// `colorScheme` command arguments.
    pub fn update_color_scheme_references(&self, old: &str, new: &str) -> Self {
        self.edited(|model| rewrite_scheme_references(model, old, new))
    }

    /// Rename a scheme and update every reference to it. The renamed scheme
    /// becomes user-owned. `None` when `old` does not exist or `new` is taken.
    pub fn rename_color_scheme(&self, old: &str, new: &str) -> Option<Self> {
        self.model.find_scheme(old)?;
        if old != new && self.model.find_scheme(new).is_some() {
            log::warn!("Cannot rename scheme '{old}': '{new}' already exists");
            return None;
        }
        Some(self.edited(|model| {
            if let Some(scheme) = model.schemes.iter_mut().find(|s| s.name == old) {
                scheme.name = new.to_string();
                scheme.origin = OriginTag::User;
            }
            rewrite_scheme_references(model, old, new);
        }))
    }

    /// Make `guid` the default profile. `None` unless it names an active
    /// profile.
    pub fn set_default_profile(&self, guid: &ProfileId) -> Option<Self> {
        if self.find_profile(guid).is_none_or(Profile::hidden) {
            return None;
        }
        let guid = *guid;
        Some(self.edited(|model| {
            model.globals.user_layer_mut().default_profile = Some(format_guid(&guid));
            model.default_profile = Some(guid);
        }))
    }

    // ── Serialization ──────────────────────────────────────────────────────

    /// The user-layer diff as a JSON document.
    pub fn to_json(&self) -> serde_json::Result<Value> {
        serialize::to_json(&self.model)
    }

    /// Write the user-layer diff to the settings file.
    pub fn write_settings_to_disk(&self) -> Result<(), PersistenceError> {
        self.write_settings_to(&persistence::settings_path())
    }

    /// Write the user-layer diff to `path`. Refused when the snapshot
    /// carries a load error.
    pub fn write_settings_to(&self, path: &Path) -> Result<(), PersistenceError> {
        if let Some(fatal) = self.load_error {
            log::error!("Not writing {}: {fatal}", path.display());
            return Err(PersistenceError::Unusable(fatal));
        }
        let json = serde_json::to_string_pretty(&self.to_json()?)?;
        persistence::write_atomic(path, &json)
    }
}

type Layers = (ParsedLayer, Vec<ParsedLayer>, Option<ParsedLayer>);

fn parse_layers(
    defaults: &str,
    fragments: &[SettingsFragment],
    user: Option<&str>,
) -> Result<Layers, ParseError> {
    let defaults = ParsedLayer::parse(defaults, OriginTag::BuiltIn)?;
    let fragments = fragments
        .iter()
        .filter_map(
            |fragment| match ParsedLayer::parse_fragment(&fragment.content, &fragment.source) {
                Ok(layer) => Some(layer),
                Err(e) => {
                    log::warn!("Skipping fragment from '{}': {e}", fragment.source);
                    None
                }
            },
        )
        .collect();
    let user = user
        .map(|text| ParsedLayer::parse(text, OriginTag::User))
        .transpose()?;
    Ok((defaults, fragments, user))
}

/// First name produced by `make_name` for n = start, start+1, ... that no
/// profile uses.
fn first_unused(profiles: &[Profile], make_name: impl Fn(usize) -> String, start: usize) -> String {
    (start..)
        .map(make_name)
        .find(|candidate| profiles.iter().all(|p| p.name() != *candidate))
        .unwrap_or_default()
}

fn rewrite_scheme_references(model: &mut SettingsModel, old: &str, new: &str) {
    if model.globals.default_color_scheme() == old {
        model.globals.user_layer_mut().default_color_scheme = Some(new.to_string());
    }

    let mut template = (*model.user_defaults).clone();
    let mut template_changed = false;
    for slot in [AppearanceSlot::Default, AppearanceSlot::Unfocused] {
        if template.appearance(slot).and_then(|a| a.color_scheme.as_deref()) == Some(old) {
            template.appearance_mut(slot).color_scheme = Some(new.to_string());
            template_changed = true;
        }
    }
    if template_changed {
        let template = Arc::new(template);
        model.user_defaults = Arc::clone(&template);
        for profile in &mut model.profiles {
            profile.set_user_template(Arc::clone(&template));
        }
    }

    for profile in &mut model.profiles {
        for slot in [AppearanceSlot::Default, AppearanceSlot::Unfocused] {
            if profile.appearance_value(slot, |a| a.color_scheme.clone()).as_deref() == Some(old) {
                profile.settings_mut().appearance_mut(slot).color_scheme = Some(new.to_string());
            }
        }
    }

    for entry in &mut model.actions {
        if entry.command.color_scheme() == Some(old) {
            entry
                .command
                .args
                .insert("colorScheme".to_string(), Value::String(new.to_string()));
        }
    }
}
