//! Keybinding system for term-settings.
//!
//! This crate turns chord strings from settings files into normalized
//! [`KeyChord`] values and keeps a registry of chord → binding so that
//! collisions can be detected.
//!
//! Features:
//! - Chord parsing with modifier aliases and canonical formatting
//! - Catalogue of shortcut actions ([`ShortcutAction`])
//! - Registry with last-one-wins semantics and conflict reporting

pub mod actions;
pub mod parser;

pub use actions::ShortcutAction;
pub use parser::{KeyChord, Modifiers, NamedKey, ParseError, ParsedKey, parse_key_chord};

use std::collections::HashMap;

/// Two bindings that claimed the same chord.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordConflict<T> {
    pub chord: KeyChord,
    /// The binding that lost the chord
    pub displaced: T,
    /// The binding that now owns the chord
    pub winner: T,
}

/// Registry of keybindings mapping key chords to a binding payload.
///
/// Binding a chord that is already bound replaces the previous payload
/// (last one wins); [`KeybindingRegistry::bind`] hands the displaced payload
/// back so the caller can decide whether that is a conflict.
#[derive(Debug, Clone)]
pub struct KeybindingRegistry<T = String> {
    bindings: HashMap<KeyChord, T>,
}

impl<T> Default for KeybindingRegistry<T> {
    fn default() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }
}

impl<T: Clone> KeybindingRegistry<T> {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `chord` to `payload`, returning the payload it displaced.
    pub fn bind(&mut self, chord: KeyChord, payload: T) -> Option<T> {
        self.bindings.insert(chord, payload)
    }

    /// Bind `chord` to `payload`, reporting a [`ChordConflict`] when the
    /// chord already belonged to another payload.
    pub fn bind_checked(&mut self, chord: KeyChord, payload: T) -> Option<ChordConflict<T>> {
        let displaced = self.bind(chord, payload.clone())?;
        log::debug!("Keybinding conflict on '{chord}'");
        Some(ChordConflict {
            chord,
            displaced,
            winner: payload,
        })
    }

    /// Remove any binding for `chord`.
    pub fn unbind(&mut self, chord: &KeyChord) -> Option<T> {
        self.bindings.remove(chord)
    }

    /// Look up the payload bound to a chord.
    pub fn lookup(&self, chord: &KeyChord) -> Option<&T> {
        self.bindings.get(chord)
    }

    /// Look up the payload bound to a chord string.
    ///
    /// Returns `None` when the string does not parse.
    pub fn lookup_str(&self, keys: &str) -> Option<&T> {
        let chord = parse_key_chord(keys).ok()?;
        self.bindings.get(&chord)
    }

    /// Iterate over all bindings in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&KeyChord, &T)> {
        self.bindings.iter()
    }

    /// Check if the registry has any bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Get the number of registered bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }
}
