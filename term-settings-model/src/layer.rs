//! Layer parser: one JSON document → one [`ParsedLayer`].
//!
//! A layer is parsed on its own, before any merging. Parsing is all or
//! nothing: the first record that fails typed deserialization fails the whole
//! layer with a [`ParseError`] naming the layer's origin.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::actions::ActionEntry;
use crate::error::ParseError;
use crate::globals::GlobalSettings;
use crate::profile_types::identity::deserialize_guid_opt;
use crate::profile_types::{OriginTag, ProfileId, ProfileSettings, derive_profile_id};
use crate::themes::ColorScheme;

/// One profile record of a layer.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ProfileRecord {
    pub guid: ProfileId,
    pub origin: OriginTag,
    pub settings: Arc<ProfileSettings>,
}

impl ProfileRecord {
    pub fn name(&self) -> String {
        self.settings
            .name
            .clone()
            .unwrap_or_else(crate::defaults::profile_name)
    }
}

/// The parse result of one JSON document.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParsedLayer {
    pub origin: OriginTag,
    pub globals: GlobalSettings,
    /// The `profiles.defaults` template
    pub profile_defaults: Arc<ProfileSettings>,
    /// Profile records in document order, identities unique
    pub profiles: Vec<ProfileRecord>,
    pub profiles_by_guid: HashMap<ProfileId, usize>,
    pub schemes: Vec<ColorScheme>,
    /// `actions` followed by legacy `keybindings`
    pub actions: Vec<ActionEntry>,
    /// Records whose identity repeated an earlier record of this layer
    pub duplicates: Vec<ProfileRecord>,
}

#[derive(Deserialize)]
struct RawDocument {
    #[serde(flatten)]
    globals: GlobalSettings,
    #[serde(default)]
    profiles: Option<Value>,
    #[serde(default)]
    schemes: Vec<Value>,
    #[serde(default)]
    actions: Vec<Value>,
    #[serde(default)]
    keybindings: Vec<Value>,
}

#[derive(Deserialize)]
struct RawProfile {
    #[serde(default, deserialize_with = "deserialize_guid_opt")]
    guid: Option<ProfileId>,
    #[serde(flatten)]
    settings: ProfileSettings,
}

impl ParsedLayer {
    /// A layer with nothing in it (absent or blank user file).
    pub fn empty(origin: OriginTag) -> Self {
        Self {
            origin,
            globals: GlobalSettings::default(),
            profile_defaults: Arc::new(ProfileSettings::default()),
            profiles: Vec::new(),
            profiles_by_guid: HashMap::new(),
            schemes: Vec::new(),
            actions: Vec::new(),
            duplicates: Vec::new(),
        }
    }

    /// Parse `content` as a layer of the given origin.
    pub fn parse(content: &str, origin: OriginTag) -> Result<Self, ParseError> {
        Self::parse_in_namespace(content, origin, None)
    }

    /// Parse a fragment. Records without an identity derive one from the
    /// fragment's source name instead of the generic origin key.
    pub fn parse_fragment(content: &str, source: &str) -> Result<Self, ParseError> {
        Self::parse_in_namespace(content, OriginTag::Fragment, Some(source))
    }

    fn parse_in_namespace(
        content: &str,
        origin: OriginTag,
        namespace: Option<&str>,
    ) -> Result<Self, ParseError> {
        if content.trim().is_empty() {
            log::debug!("{origin} settings are empty");
            return Ok(Self::empty(origin));
        }

        let value: Value =
            serde_json::from_str(content).map_err(|e| ParseError::new(origin, e.to_string()))?;
        if !value.is_object() {
            return Err(ParseError::new(
                origin,
                "the settings document must be a JSON object",
            ));
        }
        let raw: RawDocument =
            serde_json::from_value(value).map_err(|e| ParseError::new(origin, e.to_string()))?;

        let mut layer = Self::empty(origin);
        layer.globals = raw.globals;

        let (template, list) = match raw.profiles {
            None | Some(Value::Null) => (None, Vec::new()),
            Some(Value::Array(list)) => (None, list),
            Some(Value::Object(mut object)) => {
                let template = object.remove("defaults");
                let list = match object.remove("list") {
                    None | Some(Value::Null) => Vec::new(),
                    Some(Value::Array(list)) => list,
                    Some(_) => {
                        return Err(ParseError::new(origin, "profiles.list must be an array"));
                    }
                };
                (template, list)
            }
            Some(_) => {
                return Err(ParseError::new(
                    origin,
                    "profiles must be an array or an object with \"defaults\" and \"list\"",
                ));
            }
        };

        if let Some(template) = template {
            layer.profile_defaults = Arc::new(parse_template(template, origin)?);
        }

        for (index, value) in list.into_iter().enumerate() {
            let raw: RawProfile = serde_json::from_value(value)
                .map_err(|e| ParseError::new(origin, format!("profiles[{index}]: {e}")))?;
            layer.push_profile(raw, namespace);
        }

        for (index, value) in raw.schemes.into_iter().enumerate() {
            let mut scheme: ColorScheme = serde_json::from_value(value)
                .map_err(|e| ParseError::new(origin, format!("schemes[{index}]: {e}")))?;
            if scheme.name.is_empty() {
                return Err(ParseError::new(
                    origin,
                    format!("schemes[{index}]: a color scheme needs a name"),
                ));
            }
            scheme.origin = origin;
            match layer.schemes.iter_mut().find(|s| s.name == scheme.name) {
                Some(existing) => {
                    log::debug!("Scheme '{}' redefined in {origin} settings", scheme.name);
                    *existing = scheme;
                }
                None => layer.schemes.push(scheme),
            }
        }

        let tables = [("actions", raw.actions), ("keybindings", raw.keybindings)];
        for (key, entries) in tables {
            for (index, value) in entries.into_iter().enumerate() {
                let mut entry: ActionEntry = serde_json::from_value(value)
                    .map_err(|e| ParseError::new(origin, format!("{key}[{index}]: {e}")))?;
                entry.origin = origin;
                layer.actions.push(entry);
            }
        }

        log::debug!(
            "Parsed {origin} settings: {} profiles, {} schemes, {} actions",
            layer.profiles.len(),
            layer.schemes.len(),
            layer.actions.len()
        );
        Ok(layer)
    }

    fn push_profile(&mut self, raw: RawProfile, namespace: Option<&str>) {
        let settings = raw.settings;
        let origin = if settings.source.is_some() {
            OriginTag::Generated
        } else {
            self.origin
        };
        let guid = raw.guid.unwrap_or_else(|| {
            let namespace = settings
                .source
                .as_deref()
                .or(namespace)
                .unwrap_or(self.origin.as_str());
            derive_profile_id(namespace, settings.name.as_deref().unwrap_or_default())
        });
        let record = ProfileRecord {
            guid,
            origin,
            settings: Arc::new(settings),
        };

        if self.profiles_by_guid.contains_key(&guid) {
            log::warn!(
                "Profile '{}' repeats identity {} in {} settings; keeping the first",
                record.name(),
                guid,
                self.origin
            );
            self.duplicates.push(record);
            return;
        }
        self.profiles_by_guid.insert(guid, self.profiles.len());
        self.profiles.push(record);
    }
}

fn parse_template(value: Value, origin: OriginTag) -> Result<ProfileSettings, ParseError> {
    let raw: RawProfile = serde_json::from_value(value)
        .map_err(|e| ParseError::new(origin, format!("profiles.defaults: {e}")))?;
    if raw.guid.is_some() {
        log::warn!("Ignoring 'guid' in the {origin} profile template");
    }
    let mut settings = raw.settings;
    if settings.name.take().is_some() {
        log::warn!("Ignoring 'name' in the {origin} profile template");
    }
    Ok(settings)
}
