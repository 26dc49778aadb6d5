//! Serializer: the user-layer diff of a merged model.
//!
//! Only what the user layer (or a repair) set is written: profiles from the
//! defaults layer that nobody touched contribute nothing, so a model loaded
//! without user data serializes to `{}`.

use serde_json::{Map, Value};

use crate::merge::SettingsModel;
use crate::profile_types::{OriginTag, format_guid};

pub(crate) fn to_json(model: &SettingsModel) -> serde_json::Result<Value> {
    let mut root = match serde_json::to_value(model.globals.user_layer())? {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    let mut list = Vec::new();
    for profile in &model.profiles {
        if !profile.in_user_layer() && profile.settings().is_empty() {
            continue;
        }
        let mut entry = match serde_json::to_value(profile.settings())? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        entry.insert("guid".to_string(), Value::String(format_guid(&profile.guid())));
        list.push(Value::Object(entry));
    }

    if !model.user_defaults.is_empty() {
        let mut profiles = Map::new();
        profiles.insert(
            "defaults".to_string(),
            serde_json::to_value(&*model.user_defaults)?,
        );
        profiles.insert("list".to_string(), Value::Array(list));
        root.insert("profiles".to_string(), Value::Object(profiles));
    } else if !list.is_empty() {
        root.insert("profiles".to_string(), Value::Array(list));
    }

    let schemes = model
        .schemes
        .iter()
        .filter(|s| s.origin.is_user_owned())
        .map(serde_json::to_value)
        .collect::<serde_json::Result<Vec<_>>>()?;
    if !schemes.is_empty() {
        root.insert("schemes".to_string(), Value::Array(schemes));
    }

    let actions = model
        .actions
        .iter()
        .filter(|a| a.origin == OriginTag::User)
        .map(serde_json::to_value)
        .collect::<serde_json::Result<Vec<_>>>()?;
    if !actions.is_empty() {
        root.insert("actions".to_string(), Value::Array(actions));
    }

    Ok(Value::Object(root))
}
