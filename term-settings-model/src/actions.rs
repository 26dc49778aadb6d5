//! Action entries (`actions` / legacy `keybindings`) and the derived chord map.
//!
//! An entry binds zero or more chords to a command:
//!
//! ```json
//! { "command": "copy", "keys": "ctrl+shift+c" }
//! { "command": { "action": "splitPane", "split": "auto" }, "keys": ["alt+shift+d"] }
//! { "command": null, "keys": "ctrl+w" }
//! ```
//!
//! A `null` command (or `"unbound"`) removes whatever an earlier entry bound
//! to those chords.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use term_settings_keybindings::{KeyChord, KeybindingRegistry, ShortcutAction, parse_key_chord};

use crate::profile_types::OriginTag;

/// Name of the action that removes a binding.
pub const UNBOUND: &str = "unbound";

/// A command: an action name plus optional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub action: String,
    pub args: Map<String, Value>,
}

impl Command {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            args: Map::new(),
        }
    }

    pub fn unbound() -> Self {
        Self::new(UNBOUND)
    }

    pub fn is_unbound(&self) -> bool {
        self.action == UNBOUND
    }

    /// The catalogue entry for this command's action, if it is a known one.
    pub fn shortcut_action(&self) -> Option<ShortcutAction> {
        ShortcutAction::from_name(&self.action)
    }

    /// The `colorScheme` argument of an action that takes one.
    pub fn color_scheme(&self) -> Option<&str> {
        if !self
            .shortcut_action()
            .is_some_and(|action| action.accepts_color_scheme())
        {
            return None;
        }
        self.args.get("colorScheme").and_then(Value::as_str)
    }

    pub(crate) fn remove_color_scheme(&mut self) -> Option<Value> {
        self.args.remove("colorScheme")
    }

    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(Self::unbound()),
            Value::String(action) => Ok(Self::new(action)),
            Value::Object(mut args) => match args.remove("action") {
                Some(Value::String(action)) => Ok(Self { action, args }),
                Some(Value::Null) => Ok(Self {
                    action: UNBOUND.to_string(),
                    args,
                }),
                _ => Err("command object needs a string \"action\"".to_string()),
            },
            other => Err(format!(
                "command must be a string, an object or null, found {other}"
            )),
        }
    }

    fn to_value(&self) -> Value {
        if self.is_unbound() && self.args.is_empty() {
            return Value::Null;
        }
        if self.args.is_empty() {
            return Value::String(self.action.clone());
        }
        let mut object = Map::new();
        object.insert("action".to_string(), Value::String(self.action.clone()));
        object.extend(self.args.iter().map(|(k, v)| (k.clone(), v.clone())));
        Value::Object(object)
    }
}

impl Serialize for Command {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(s)
    }
}

impl<'de> Deserialize<'de> for Command {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Command::from_value(Value::deserialize(d)?).map_err(serde::de::Error::custom)
    }
}

/// One entry of the action table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ActionEntryJson", into = "ActionEntryJson")]
pub struct ActionEntry {
    pub command: Command,
    /// Chord strings as written; may be empty for command-palette-only entries
    pub keys: Vec<String>,
    pub name: Option<String>,
    /// Layer the entry came from
    pub origin: OriginTag,
}

impl ActionEntry {
    pub fn new(command: Command, keys: &[&str]) -> Self {
        Self {
            command,
            keys: keys.iter().map(|k| k.to_string()).collect(),
            name: None,
            origin: OriginTag::User,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

#[derive(Serialize, Deserialize)]
struct ActionEntryJson {
    #[serde(default)]
    command: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    keys: Option<OneOrMany>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl TryFrom<ActionEntryJson> for ActionEntry {
    type Error = String;

    fn try_from(raw: ActionEntryJson) -> Result<Self, Self::Error> {
        let keys = match raw.keys {
            None => Vec::new(),
            Some(OneOrMany::One(k)) => vec![k],
            Some(OneOrMany::Many(ks)) => ks,
        };
        Ok(Self {
            command: Command::from_value(raw.command)?,
            keys,
            name: raw.name,
            origin: OriginTag::User,
        })
    }
}

impl From<ActionEntry> for ActionEntryJson {
    fn from(entry: ActionEntry) -> Self {
        let keys = match entry.keys.len() {
            0 => None,
            1 => entry.keys.into_iter().next().map(OneOrMany::One),
            _ => Some(OneOrMany::Many(entry.keys)),
        };
        Self {
            command: entry.command.to_value(),
            keys,
            name: entry.name,
        }
    }
}

/// Chord → action lookup built from a validated action table.
///
/// Entries are applied in order, so a later entry (the user layer comes
/// after the defaults) overrides an earlier one on the same chord, and an
/// unbound entry clears it.
#[derive(Debug, Clone, Default)]
pub struct ActionMap {
    entries: Vec<ActionEntry>,
    registry: KeybindingRegistry<usize>,
}

impl ActionMap {
    pub fn from_entries(entries: &[ActionEntry]) -> Self {
        let mut registry = KeybindingRegistry::new();
        for (index, entry) in entries.iter().enumerate() {
            for keys in &entry.keys {
                let Ok(chord) = parse_key_chord(keys) else {
                    log::debug!("Skipping unparseable chord '{keys}' in action map");
                    continue;
                };
                if entry.command.is_unbound() {
                    registry.unbind(&chord);
                } else {
                    registry.bind(chord, index);
                }
            }
        }
        Self {
            entries: entries.to_vec(),
            registry,
        }
    }

    /// The command bound to a chord.
    pub fn lookup(&self, chord: &KeyChord) -> Option<&Command> {
        self.registry
            .lookup(chord)
            .and_then(|i| self.entries.get(*i))
            .map(|entry| &entry.command)
    }

    /// The command bound to a chord string, if it parses and is bound.
    pub fn lookup_str(&self, keys: &str) -> Option<&Command> {
        self.lookup(&parse_key_chord(keys).ok()?)
    }

    /// Every chord currently bound to `action`, in canonical form, sorted.
    pub fn chords_for(&self, action: &str) -> Vec<String> {
        let mut chords: Vec<String> = self
            .registry
            .iter()
            .filter(|(_, i)| {
                self.entries
                    .get(**i)
                    .is_some_and(|e| e.command.action == action)
            })
            .map(|(chord, _)| chord.to_string())
            .collect();
        chords.sort();
        chords
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}
