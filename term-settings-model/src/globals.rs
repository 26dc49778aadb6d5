//! Application-wide settings.
//!
//! Each layer parses into a [`GlobalSettings`] record where every key is
//! optional. [`GlobalAppSettings`] stacks the user record over the defaults
//! record and answers the effective value of each key.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::defaults;

/// How the first window opens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LaunchMode {
    #[default]
    Default,
    Maximized,
    Fullscreen,
    Focus,
}

/// Global keys of one layer. `None` means the layer does not set the key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSettings {
    /// Braced GUID or profile name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_color_scheme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_cols: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_rows: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_on_select: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm_close_all_tabs: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub always_show_tabs: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_mode: Option<LaunchMode>,

    /// Feature flags, merged key by key across layers
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub features: BTreeMap<String, bool>,
}

impl GlobalSettings {
    pub fn is_empty(&self) -> bool {
        *self == GlobalSettings::default()
    }
}

/// Effective global settings: the user record over the defaults record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalAppSettings {
    defaults: GlobalSettings,
    user: GlobalSettings,
}

impl GlobalAppSettings {
    pub(crate) fn new(defaults: GlobalSettings, user: GlobalSettings) -> Self {
        Self { defaults, user }
    }

    /// Keys the user layer sets; this is what gets written back to disk.
    pub fn user_layer(&self) -> &GlobalSettings {
        &self.user
    }

    pub(crate) fn user_layer_mut(&mut self) -> &mut GlobalSettings {
        &mut self.user
    }

    pub fn defaults_layer(&self) -> &GlobalSettings {
        &self.defaults
    }

    /// The configured default-profile reference, before resolution.
    pub fn default_profile(&self) -> Option<&str> {
        self.user
            .default_profile
            .as_deref()
            .or(self.defaults.default_profile.as_deref())
    }

    pub fn default_color_scheme(&self) -> String {
        self.user
            .default_color_scheme
            .clone()
            .or_else(|| self.defaults.default_color_scheme.clone())
            .unwrap_or_else(defaults::color_scheme)
    }

    pub fn initial_cols(&self) -> u32 {
        self.user
            .initial_cols
            .or(self.defaults.initial_cols)
            .unwrap_or_else(defaults::initial_cols)
    }

    pub fn initial_rows(&self) -> u32 {
        self.user
            .initial_rows
            .or(self.defaults.initial_rows)
            .unwrap_or_else(defaults::initial_rows)
    }

    pub fn copy_on_select(&self) -> bool {
        self.user
            .copy_on_select
            .or(self.defaults.copy_on_select)
            .unwrap_or_else(defaults::copy_on_select)
    }

    pub fn confirm_close_all_tabs(&self) -> bool {
        self.user
            .confirm_close_all_tabs
            .or(self.defaults.confirm_close_all_tabs)
            .unwrap_or_else(defaults::confirm_close_all_tabs)
    }

    pub fn always_show_tabs(&self) -> bool {
        self.user
            .always_show_tabs
            .or(self.defaults.always_show_tabs)
            .unwrap_or_else(defaults::always_show_tabs)
    }

    pub fn launch_mode(&self) -> LaunchMode {
        self.user
            .launch_mode
            .or(self.defaults.launch_mode)
            .unwrap_or_default()
    }

    /// All feature flags; user values win per key.
    pub fn features(&self) -> BTreeMap<String, bool> {
        let mut merged = self.defaults.features.clone();
        merged.extend(self.user.features.iter().map(|(k, v)| (k.clone(), *v)));
        merged
    }

    /// Whether a feature flag is on. Unknown flags are off.
    pub fn feature_enabled(&self, name: &str) -> bool {
        self.user
            .features
            .get(name)
            .or_else(|| self.defaults.features.get(name))
            .copied()
            .unwrap_or(false)
    }
}
