//! Key chord parser.
//!
//! Parses human-readable chord strings like "ctrl+shift+t" into [`KeyChord`]
//! values. Two strings that describe the same physical chord ("Shift+Ctrl+T",
//! "ctrl+shift+t") parse to equal chords, which is what conflict detection
//! relies on. The canonical text form is produced by `Display`.

use std::fmt;

use thiserror::Error;

/// Error type for chord parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ParseError(String);

/// Set of active modifiers for a key chord.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    /// Windows / Super / Cmd key
    pub win: bool,
}

impl Modifiers {
    pub fn is_empty(&self) -> bool {
        !(self.ctrl || self.alt || self.shift || self.win)
    }
}

/// Named (non-character) keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Enter,
    Escape,
    Space,
    Tab,
    Backspace,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    Plus,
    Minus,
    /// The context-menu key
    App,
    /// F1 through F24
    Function(u8),
    /// Numpad digits 0-9
    Numpad(u8),
    NumpadAdd,
    NumpadMinus,
    NumpadMultiply,
    NumpadDivide,
    NumpadPeriod,
}

impl NamedKey {
    fn canonical_name(&self) -> String {
        match self {
            NamedKey::Enter => "enter".to_string(),
            NamedKey::Escape => "esc".to_string(),
            NamedKey::Space => "space".to_string(),
            NamedKey::Tab => "tab".to_string(),
            NamedKey::Backspace => "backspace".to_string(),
            NamedKey::Delete => "delete".to_string(),
            NamedKey::Insert => "insert".to_string(),
            NamedKey::Home => "home".to_string(),
            NamedKey::End => "end".to_string(),
            NamedKey::PageUp => "pgup".to_string(),
            NamedKey::PageDown => "pgdn".to_string(),
            NamedKey::Up => "up".to_string(),
            NamedKey::Down => "down".to_string(),
            NamedKey::Left => "left".to_string(),
            NamedKey::Right => "right".to_string(),
            NamedKey::Plus => "plus".to_string(),
            NamedKey::Minus => "minus".to_string(),
            NamedKey::App => "app".to_string(),
            NamedKey::Function(n) => format!("f{n}"),
            NamedKey::Numpad(n) => format!("numpad_{n}"),
            NamedKey::NumpadAdd => "numpad_plus".to_string(),
            NamedKey::NumpadMinus => "numpad_minus".to_string(),
            NamedKey::NumpadMultiply => "numpad_multiply".to_string(),
            NamedKey::NumpadDivide => "numpad_divide".to_string(),
            NamedKey::NumpadPeriod => "numpad_period".to_string(),
        }
    }
}

/// The actual key (either a character or a named key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParsedKey {
    /// A single character key, stored lowercase (e.g., 't', '1', ',')
    Character(char),
    /// A named key (e.g., F1, Enter, Escape)
    Named(NamedKey),
}

/// A parsed key chord (modifiers + key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub modifiers: Modifiers,
    pub key: ParsedKey,
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::with_capacity(5);

        if self.modifiers.ctrl {
            parts.push("ctrl".to_string());
        }
        if self.modifiers.alt {
            parts.push("alt".to_string());
        }
        if self.modifiers.shift {
            parts.push("shift".to_string());
        }
        if self.modifiers.win {
            parts.push("win".to_string());
        }

        match &self.key {
            ParsedKey::Character(c) => parts.push(c.to_string()),
            ParsedKey::Named(n) => parts.push(n.canonical_name()),
        }

        write!(f, "{}", parts.join("+"))
    }
}

impl std::str::FromStr for KeyChord {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_key_chord(s)
    }
}

/// Parse a key chord string into a [`KeyChord`].
///
/// Supported format: "modifier+modifier+key", case-insensitive.
///
/// Modifiers:
/// - `ctrl`, `control`
/// - `alt`, `option`
/// - `shift`
/// - `win`, `super`, `cmd`, `command`, `meta`
///
/// Keys:
/// - Single characters: `a`, `1`, `,`, and `+` itself (`ctrl++`)
/// - Named keys: `f1`-`f24`, `enter`, `esc`, `space`, `tab`, `pgup`,
///   `numpad_0`-`numpad_9`, etc.
pub fn parse_key_chord(s: &str) -> Result<KeyChord, ParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ParseError("Empty key chord".to_string()));
    }

    // A trailing "++" means the key is '+' itself.
    let (modifier_part, key_part) = if s == "+" {
        ("", "+")
    } else if let Some(prefix) = s.strip_suffix("++") {
        (prefix, "+")
    } else {
        match s.rfind('+') {
            Some(idx) => (&s[..idx], &s[idx + 1..]),
            None => ("", s),
        }
    };

    let key_part = key_part.trim();
    if key_part.is_empty() {
        return Err(ParseError(format!(
            "Key chord '{s}' ends with a modifier, no key specified"
        )));
    }

    let mut modifiers = Modifiers::default();
    if !modifier_part.is_empty() {
        for part in modifier_part.split('+').map(str::trim) {
            if !apply_modifier(&mut modifiers, part) {
                if part.is_empty() {
                    return Err(ParseError(format!("Empty modifier in key chord '{s}'")));
                }
                return Err(ParseError(format!(
                    "Multiple keys specified in '{s}': found '{part}' before '{key_part}'"
                )));
            }
        }
    }

    if is_modifier_name(key_part) {
        return Err(ParseError(format!(
            "Key chord '{s}' ends with a modifier, no key specified"
        )));
    }

    let key = parse_key(key_part)?;
    Ok(KeyChord { modifiers, key })
}

fn is_modifier_name(part: &str) -> bool {
    let mut scratch = Modifiers::default();
    apply_modifier(&mut scratch, part)
}

fn apply_modifier(modifiers: &mut Modifiers, part: &str) -> bool {
    match part.to_lowercase().as_str() {
        "ctrl" | "control" => modifiers.ctrl = true,
        "alt" | "option" => modifiers.alt = true,
        "shift" => modifiers.shift = true,
        "win" | "super" | "cmd" | "command" | "meta" => modifiers.win = true,
        _ => return false,
    }
    true
}

/// Parse a key string into a ParsedKey.
fn parse_key(s: &str) -> Result<ParsedKey, ParseError> {
    if let Some(named) = parse_named_key(s) {
        return Ok(ParsedKey::Named(named));
    }

    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(ParsedKey::Character(c.to_ascii_lowercase()));
    }

    Err(ParseError(format!("Unknown key: '{s}'")))
}

fn parse_named_key(s: &str) -> Option<NamedKey> {
    let lower = s.to_lowercase();

    if let Some(n) = lower.strip_prefix('f')
        && let Ok(n) = n.parse::<u8>()
    {
        return (1..=24).contains(&n).then_some(NamedKey::Function(n));
    }

    if let Some(n) = lower
        .strip_prefix("numpad_")
        .or_else(|| lower.strip_prefix("numpad"))
        && let Ok(n) = n.parse::<u8>()
    {
        return (n <= 9).then_some(NamedKey::Numpad(n));
    }

    match lower.as_str() {
        "enter" | "return" => Some(NamedKey::Enter),
        "escape" | "esc" => Some(NamedKey::Escape),
        "space" => Some(NamedKey::Space),
        "tab" => Some(NamedKey::Tab),
        "backspace" => Some(NamedKey::Backspace),
        "delete" | "del" => Some(NamedKey::Delete),
        "insert" | "ins" => Some(NamedKey::Insert),
        "home" => Some(NamedKey::Home),
        "end" => Some(NamedKey::End),
        "pageup" | "pgup" => Some(NamedKey::PageUp),
        "pagedown" | "pgdn" => Some(NamedKey::PageDown),

        "up" | "arrowup" => Some(NamedKey::Up),
        "down" | "arrowdown" => Some(NamedKey::Down),
        "left" | "arrowleft" => Some(NamedKey::Left),
        "right" | "arrowright" => Some(NamedKey::Right),

        "plus" => Some(NamedKey::Plus),
        "minus" => Some(NamedKey::Minus),
        "app" | "menu" => Some(NamedKey::App),

        "numpad_plus" | "numpad_add" => Some(NamedKey::NumpadAdd),
        "numpad_minus" | "numpad_subtract" => Some(NamedKey::NumpadMinus),
        "numpad_multiply" => Some(NamedKey::NumpadMultiply),
        "numpad_divide" => Some(NamedKey::NumpadDivide),
        "numpad_period" | "numpad_decimal" => Some(NamedKey::NumpadPeriod),

        _ => None,
    }
}
