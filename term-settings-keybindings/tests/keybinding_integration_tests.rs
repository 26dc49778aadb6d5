//! Integration tests for term-settings-keybindings.
//!
//! These tests exercise the full parse → registry → lookup pipeline through
//! the public API only.

use term_settings_keybindings::{
    KeybindingRegistry, NamedKey, ParsedKey, ShortcutAction, parse_key_chord,
};

fn bind_all(bindings: &[(&str, &str)]) -> (KeybindingRegistry, Vec<String>) {
    let mut registry = KeybindingRegistry::new();
    let mut conflicts = Vec::new();
    for (keys, action) in bindings {
        let chord = parse_key_chord(keys).unwrap();
        if let Some(conflict) = registry.bind_checked(chord, action.to_string()) {
            conflicts.push(conflict.chord.to_string());
        }
    }
    (registry, conflicts)
}

// ---------------------------------------------------------------------------
// Registry construction
// ---------------------------------------------------------------------------

#[test]
fn registry_starts_empty() {
    let registry: KeybindingRegistry = KeybindingRegistry::new();
    assert!(registry.is_empty());
    assert_eq!(registry.len(), 0);
}

#[test]
fn registry_counts_distinct_chords() {
    let (registry, conflicts) =
        bind_all(&[("ctrl+a", "copy"), ("ctrl+b", "paste"), ("ctrl+c", "find")]);
    assert_eq!(registry.len(), 3);
    assert!(conflicts.is_empty());
}

#[test]
fn registry_equivalent_chords_collide() {
    let (registry, conflicts) = bind_all(&[
        ("ctrl+shift+pgup", "scrollUp"),
        ("Shift+Control+PageUp", "scrollToTop"),
    ]);
    assert_eq!(registry.len(), 1);
    assert_eq!(conflicts, ["ctrl+shift+pgup"]);
    assert_eq!(
        registry.lookup_str("ctrl+shift+pgup").map(String::as_str),
        Some("scrollToTop")
    );
}

#[test]
fn registry_distinct_modifiers_do_not_collide() {
    let (registry, conflicts) = bind_all(&[
        ("ctrl+t", "newTab"),
        ("ctrl+shift+t", "duplicateTab"),
        ("alt+t", "renameTab"),
    ]);
    assert_eq!(registry.len(), 3);
    assert!(conflicts.is_empty());
}

#[test]
fn registry_unbind_frees_chord() {
    let (mut registry, _) = bind_all(&[("ctrl+w", "closeTab")]);
    let chord = parse_key_chord("Ctrl+W").unwrap();
    assert_eq!(registry.unbind(&chord).as_deref(), Some("closeTab"));
    assert!(registry.bind_checked(chord, "closePane".to_string()).is_none());
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[test]
fn parse_canonical_text_is_stable() {
    for input in ["ctrl+shift+t", "alt+enter", "ctrl+alt+shift+win+f5", "ctrl++"] {
        let chord = parse_key_chord(input).unwrap();
        let reparsed = parse_key_chord(&chord.to_string()).unwrap();
        assert_eq!(chord, reparsed, "canonical form of '{input}' must re-parse");
    }
}

#[test]
fn parse_named_keys() {
    assert_eq!(
        parse_key_chord("esc").unwrap().key,
        ParsedKey::Named(NamedKey::Escape)
    );
    assert_eq!(
        parse_key_chord("ctrl+minus").unwrap().key,
        ParsedKey::Named(NamedKey::Minus)
    );
}

// ---------------------------------------------------------------------------
// Action catalogue
// ---------------------------------------------------------------------------

#[test]
fn known_actions_resolve() {
    assert_eq!(
        ShortcutAction::from_name("newTab"),
        Some(ShortcutAction::NewTab)
    );
    assert_eq!(
        ShortcutAction::from_name("commandPalette"),
        Some(ShortcutAction::ToggleCommandPalette)
    );
    assert!(ShortcutAction::from_name("notAnAction").is_none());
}
