//! Profile records and the merged `Profile` view.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::appearance::{
    AppearanceConfig, AppearanceSettings, AppearanceSlot, CursorShape, FontSettings, FontWeight,
};
use super::identity::ProfileId;
use super::origin::OriginTag;
use crate::defaults;

/// The keys one profile record (or template) sets explicitly.
///
/// Every field is optional: a missing key inherits from the next layer in the
/// profile's chain instead of resetting to a type default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSettings {
    /// Display name for the profile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Hidden profiles stay loadable but are left out of the active list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,

    /// Command to launch (e.g. "pwsh.exe -NoLogo", "/bin/zsh -l")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commandline: Option<String>,

    /// Working directory for the session (if None, the launcher decides)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_directory: Option<String>,

    /// Icon path or glyph
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Fixed tab title (if None, the running program names the tab)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_title: Option<String>,

    /// Namespace of the generator that produced this profile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<FontSettings>,

    /// Focused appearance keys live directly on the profile object
    #[serde(flatten)]
    pub appearance: AppearanceSettings,

    /// Appearance used while the terminal does not have focus
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unfocused_appearance: Option<AppearanceSettings>,
}

impl ProfileSettings {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the display name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the hidden flag
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = Some(hidden);
        self
    }

    /// Set the commandline
    pub fn commandline(mut self, commandline: impl Into<String>) -> Self {
        self.commandline = Some(commandline.into());
        self
    }

    /// Set the starting directory
    pub fn starting_directory(mut self, dir: impl Into<String>) -> Self {
        self.starting_directory = Some(dir.into());
        self
    }

    /// Set the color scheme of the focused appearance
    pub fn color_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.appearance.color_scheme = Some(scheme.into());
        self
    }

    /// Set the background image of the focused appearance
    pub fn background_image(mut self, path: impl Into<String>) -> Self {
        self.appearance.background_image = Some(path.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == ProfileSettings::default()
    }

    /// Fill keys unset here from `lower`. Font and appearance objects merge
    /// key by key.
    pub fn fill_from(&mut self, lower: &ProfileSettings) {
        if self.name.is_none() {
            self.name.clone_from(&lower.name);
        }
        if self.hidden.is_none() {
            self.hidden = lower.hidden;
        }
        if self.commandline.is_none() {
            self.commandline.clone_from(&lower.commandline);
        }
        if self.starting_directory.is_none() {
            self.starting_directory.clone_from(&lower.starting_directory);
        }
        if self.icon.is_none() {
            self.icon.clone_from(&lower.icon);
        }
        if self.tab_title.is_none() {
            self.tab_title.clone_from(&lower.tab_title);
        }
        if self.source.is_none() {
            self.source.clone_from(&lower.source);
        }
        match (&mut self.font, &lower.font) {
            (Some(font), Some(lower_font)) => font.fill_from(lower_font),
            (None, Some(lower_font)) => self.font = Some(lower_font.clone()),
            _ => {}
        }
        self.appearance.fill_from(&lower.appearance);
        match (&mut self.unfocused_appearance, &lower.unfocused_appearance) {
            (Some(unfocused), Some(lower_unfocused)) => unfocused.fill_from(lower_unfocused),
            (None, Some(lower_unfocused)) => {
                self.unfocused_appearance = Some(lower_unfocused.clone())
            }
            _ => {}
        }
    }

    /// Appearance keys for `slot`, if this record has any.
    pub fn appearance(&self, slot: AppearanceSlot) -> Option<&AppearanceSettings> {
        match slot {
            AppearanceSlot::Default => Some(&self.appearance),
            AppearanceSlot::Unfocused => self.unfocused_appearance.as_ref(),
        }
    }

    /// Appearance keys for `slot`, created on demand.
    pub fn appearance_mut(&mut self, slot: AppearanceSlot) -> &mut AppearanceSettings {
        match slot {
            AppearanceSlot::Default => &mut self.appearance,
            AppearanceSlot::Unfocused => self.unfocused_appearance.get_or_insert_default(),
        }
    }
}

/// A merged profile.
///
/// Holds the profile's own record plus shared read-only parents. A key is
/// looked up in order: own record, user template, the profile's defaults or
/// fragment record, defaults template, built-in default.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    guid: ProfileId,
    origin: OriginTag,
    own: ProfileSettings,
    in_user_layer: bool,
    base: Option<Arc<ProfileSettings>>,
    user_template: Arc<ProfileSettings>,
    defaults_template: Arc<ProfileSettings>,
}

impl Profile {
    pub(crate) fn new(
        guid: ProfileId,
        origin: OriginTag,
        own: ProfileSettings,
        base: Option<Arc<ProfileSettings>>,
        user_template: Arc<ProfileSettings>,
        defaults_template: Arc<ProfileSettings>,
    ) -> Self {
        Self {
            guid,
            origin,
            own,
            in_user_layer: false,
            base,
            user_template,
            defaults_template,
        }
    }

    pub fn guid(&self) -> ProfileId {
        self.guid
    }

    pub fn origin(&self) -> OriginTag {
        self.origin
    }

    /// Keys set by the user layer (or by repairs) for this profile.
    pub fn settings(&self) -> &ProfileSettings {
        &self.own
    }

    pub(crate) fn settings_mut(&mut self) -> &mut ProfileSettings {
        &mut self.own
    }

    /// The defaults or fragment record this profile overlays, if any.
    pub fn base_settings(&self) -> Option<&ProfileSettings> {
        self.base.as_deref()
    }

    /// Whether the user layer carries an entry for this profile.
    pub fn in_user_layer(&self) -> bool {
        self.in_user_layer
    }

    pub(crate) fn set_in_user_layer(&mut self, in_user_layer: bool) {
        self.in_user_layer = in_user_layer;
    }

    pub(crate) fn set_user_template(&mut self, template: Arc<ProfileSettings>) {
        self.user_template = template;
    }

    /// Records in lookup order.
    fn layers(&self) -> impl Iterator<Item = &ProfileSettings> {
        std::iter::once(&self.own)
            .chain(std::iter::once(&*self.user_template))
            .chain(self.base.as_deref())
            .chain(std::iter::once(&*self.defaults_template))
    }

    fn lookup<T>(&self, f: impl Fn(&ProfileSettings) -> Option<T>) -> Option<T> {
        self.layers().find_map(f)
    }

    pub fn name(&self) -> String {
        self.lookup(|s| s.name.clone())
            .unwrap_or_else(defaults::profile_name)
    }

    pub fn hidden(&self) -> bool {
        self.lookup(|s| s.hidden).unwrap_or(false)
    }

    pub fn commandline(&self) -> Option<String> {
        self.lookup(|s| s.commandline.clone())
    }

    pub fn starting_directory(&self) -> Option<String> {
        self.lookup(|s| s.starting_directory.clone())
    }

    pub fn icon(&self) -> Option<String> {
        self.lookup(|s| s.icon.clone())
    }

    pub fn tab_title(&self) -> Option<String> {
        self.lookup(|s| s.tab_title.clone())
    }

    pub fn source(&self) -> Option<String> {
        self.lookup(|s| s.source.clone())
    }

    pub fn font_face(&self) -> String {
        self.lookup(|s| s.font.as_ref().and_then(|f| f.face.clone()))
            .unwrap_or_else(defaults::font_face)
    }

    pub fn font_size(&self) -> f64 {
        self.lookup(|s| s.font.as_ref().and_then(|f| f.size))
            .unwrap_or_else(defaults::font_size)
    }

    pub fn font_weight(&self) -> FontWeight {
        self.lookup(|s| s.font.as_ref().and_then(|f| f.weight))
            .unwrap_or_else(defaults::font_weight)
    }

    pub fn cursor_shape(&self) -> CursorShape {
        self.lookup(|s| s.appearance.cursor_shape)
            .unwrap_or_else(defaults::cursor_shape)
    }

    /// Explicit scheme reference of `slot`. The unfocused slot falls back to
    /// the focused reference.
    pub fn color_scheme_name(&self, slot: AppearanceSlot) -> Option<String> {
        let focused = || self.lookup(|s| s.appearance.color_scheme.clone());
        match slot {
            AppearanceSlot::Default => focused(),
            AppearanceSlot::Unfocused => self
                .lookup(|s| {
                    s.unfocused_appearance
                        .as_ref()
                        .and_then(|a| a.color_scheme.clone())
                })
                .or_else(focused),
        }
    }

    /// First value set for an appearance key in `slot`'s own chain, without
    /// the unfocused-to-focused fallback.
    pub(crate) fn appearance_value<T>(
        &self,
        slot: AppearanceSlot,
        f: impl Fn(&AppearanceSettings) -> Option<T>,
    ) -> Option<T> {
        self.lookup(|s| s.appearance(slot).and_then(&f))
    }

    /// Whether any layer configures an unfocused appearance.
    pub fn has_unfocused_appearance(&self) -> bool {
        self.layers().any(|s| s.unfocused_appearance.is_some())
    }

    /// Every record in the chain merged into one, without built-in defaults.
    pub fn resolved_settings(&self) -> ProfileSettings {
        let mut merged = ProfileSettings::default();
        for layer in self.layers() {
            merged.fill_from(layer);
        }
        merged
    }

    pub fn default_appearance(&self) -> AppearanceConfig {
        let merged = self.resolved_settings();
        AppearanceConfig::resolve(&merged.appearance, &merged.font.unwrap_or_default())
    }

    /// The unfocused appearance, when configured. Keys it leaves unset fall
    /// back to the default appearance.
    pub fn unfocused_appearance(&self) -> Option<AppearanceConfig> {
        let merged = self.resolved_settings();
        let mut unfocused = merged.unfocused_appearance?;
        unfocused.fill_from(&merged.appearance);
        Some(AppearanceConfig::resolve(
            &unfocused,
            &merged.font.unwrap_or_default(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile_types::identity::derive_profile_id;

    fn template(scheme: &str) -> Arc<ProfileSettings> {
        Arc::new(ProfileSettings::new().color_scheme(scheme))
    }

    #[test]
    fn test_lookup_order() {
        let base = Arc::new(
            ProfileSettings::new()
                .name("Ubuntu")
                .commandline("wsl.exe -d Ubuntu")
                .color_scheme("Base"),
        );
        let profile = Profile::new(
            derive_profile_id("builtin", "Ubuntu"),
            OriginTag::BuiltIn,
            ProfileSettings::new().starting_directory("~"),
            Some(base),
            template("UserTemplate"),
            template("DefaultsTemplate"),
        );
        assert_eq!(profile.name(), "Ubuntu");
        assert_eq!(profile.starting_directory().as_deref(), Some("~"));
        // user template sits above the base record
        assert_eq!(
            profile.color_scheme_name(AppearanceSlot::Default).as_deref(),
            Some("UserTemplate")
        );
    }

    #[test]
    fn test_defaults_template_and_builtin_fallback() {
        let profile = Profile::new(
            derive_profile_id("user", "x"),
            OriginTag::User,
            ProfileSettings::new(),
            None,
            Arc::new(ProfileSettings::new()),
            template("Campbell"),
        );
        assert_eq!(profile.name(), "Default");
        assert_eq!(
            profile.color_scheme_name(AppearanceSlot::Default).as_deref(),
            Some("Campbell")
        );
        assert_eq!(profile.font_size(), 12.0);
        assert!(!profile.hidden());
    }

    #[test]
    fn test_unfocused_falls_back_to_default_appearance() {
        let mut own = ProfileSettings::new().color_scheme("One Half Dark");
        own.appearance.cursor_height = Some(50);
        own.unfocused_appearance = Some(AppearanceSettings {
            cursor_shape: Some(CursorShape::EmptyBox),
            ..Default::default()
        });
        let profile = Profile::new(
            derive_profile_id("user", "y"),
            OriginTag::User,
            own,
            None,
            Arc::new(ProfileSettings::new()),
            Arc::new(ProfileSettings::new()),
        );
        let unfocused = profile.unfocused_appearance().unwrap();
        assert_eq!(unfocused.cursor_shape, CursorShape::EmptyBox);
        assert_eq!(unfocused.cursor_height, 50);
        assert_eq!(unfocused.color_scheme.as_deref(), Some("One Half Dark"));
        assert_eq!(
            profile.color_scheme_name(AppearanceSlot::Unfocused).as_deref(),
            Some("One Half Dark")
        );
    }

    #[test]
    fn test_no_unfocused_appearance_by_default() {
        let profile = Profile::new(
            derive_profile_id("user", "z"),
            OriginTag::User,
            ProfileSettings::new(),
            None,
            Arc::new(ProfileSettings::new()),
            Arc::new(ProfileSettings::new()),
        );
        assert!(!profile.has_unfocused_appearance());
        assert!(profile.unfocused_appearance().is_none());
    }

    #[test]
    fn test_record_parses_flattened_appearance() {
        let record: ProfileSettings = serde_json::from_str(
            r#"{"name":"cmd","colorScheme":"Campbell","font":{"size":14},
                "unfocusedAppearance":{"colorScheme":"One Half Light"}}"#,
        )
        .unwrap();
        assert_eq!(record.appearance.color_scheme.as_deref(), Some("Campbell"));
        assert_eq!(record.font.as_ref().and_then(|f| f.size), Some(14.0));
        assert_eq!(
            record
                .appearance(AppearanceSlot::Unfocused)
                .and_then(|a| a.color_scheme.as_deref()),
            Some("One Half Light")
        );
    }
}
