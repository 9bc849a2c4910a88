//! Global keyboard shortcuts
//!
//! Besides mapping keys to messages, the viewer swallows the host's
//! print, save, view-source and developer-tools shortcuts while focused.

use crate::session::messages::Msg;

/// Non-character keys the viewer cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedKey {
    ArrowLeft,
    ArrowRight,
    PageUp,
    PageDown,
    Delete,
    Backspace,
    Escape,
    F12,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Character(String),
    Named(NamedKey),
}

impl Key {
    pub fn character(c: &str) -> Self {
        Key::Character(c.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub control: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        control: false,
        shift: false,
        alt: false,
    };
    pub const CTRL: Self = Self {
        control: true,
        shift: false,
        alt: false,
    };
    pub const CTRL_SHIFT: Self = Self {
        control: true,
        shift: true,
        alt: false,
    };

    pub fn control(self) -> bool {
        self.control
    }

    pub fn shift(self) -> bool {
        self.shift
    }
}

/// What to do with a key press
#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    /// Dispatch this message
    Msg(Msg),
    /// Consume the key so the host's default action does not run
    Suppress,
    /// Not ours; let the host handle it
    Ignore,
}

pub fn handle_key_event(key: &Key, modifiers: Modifiers, has_selection: bool) -> KeyOutcome {
    let ch = match key {
        Key::Character(c) => Some(c.to_lowercase()),
        Key::Named(_) => None,
    };
    let ch = ch.as_deref();

    match (key, ch) {
        // Undo/redo shortcuts
        (_, Some("z")) if modifiers.control() && !modifiers.shift() => KeyOutcome::Msg(Msg::undo()),
        (_, Some("y")) if modifiers.control() => KeyOutcome::Msg(Msg::redo()),
        (_, Some("z")) if modifiers.control() && modifiers.shift() => {
            KeyOutcome::Msg(Msg::redo())
        }
        // Delete only acts on a selection
        (Key::Named(NamedKey::Delete | NamedKey::Backspace), _) if has_selection => {
            KeyOutcome::Msg(Msg::delete_selected())
        }
        // Zoom and rotation
        (_, Some("=" | "+")) if modifiers.control() => KeyOutcome::Msg(Msg::zoom_in()),
        (_, Some("-" | "_")) if modifiers.control() => KeyOutcome::Msg(Msg::zoom_out()),
        (_, Some("r")) if modifiers.control() && !modifiers.shift() => {
            KeyOutcome::Msg(Msg::rotate())
        }
        // Abandon a pending text prompt
        (Key::Named(NamedKey::Escape), _) => KeyOutcome::Msg(Msg::cancel_text()),
        // Page navigation
        (Key::Named(NamedKey::ArrowRight | NamedKey::PageDown), _) if !modifiers.control() => {
            KeyOutcome::Msg(Msg::next_page())
        }
        (Key::Named(NamedKey::ArrowLeft | NamedKey::PageUp), _) if !modifiers.control() => {
            KeyOutcome::Msg(Msg::previous_page())
        }
        // Print, save and view source
        (_, Some("p" | "s" | "u")) if modifiers.control() && !modifiers.shift() => {
            KeyOutcome::Suppress
        }
        // Developer tools
        (_, Some("i" | "j" | "c")) if modifiers.control() && modifiers.shift() => {
            KeyOutcome::Suppress
        }
        (Key::Named(NamedKey::F12), _) => KeyOutcome::Suppress,
        _ => KeyOutcome::Ignore,
    }
}

/// Parse a chord such as `"Ctrl+Shift+Z"`, `"Delete"` or `"PageDown"`
pub fn parse_chord(chord: &str) -> Option<(Key, Modifiers)> {
    let mut modifiers = Modifiers::NONE;
    let parts: Vec<&str> = chord.split('+').map(str::trim).collect();
    // A trailing empty part means the key itself was '+', as in "Ctrl++"
    let (key_part, modifier_parts) = match parts.as_slice() {
        [mods @ .., "", ""] => ("+", mods),
        [mods @ .., last] => (*last, mods),
        [] => return None,
    };

    for part in modifier_parts {
        match part.to_ascii_lowercase().as_str() {
            "ctrl" | "control" | "cmd" | "meta" => modifiers.control = true,
            "shift" => modifiers.shift = true,
            "alt" | "option" => modifiers.alt = true,
            _ => return None,
        }
    }

    let named = match key_part.to_ascii_lowercase().as_str() {
        "left" | "arrowleft" => Some(NamedKey::ArrowLeft),
        "right" | "arrowright" => Some(NamedKey::ArrowRight),
        "pageup" => Some(NamedKey::PageUp),
        "pagedown" => Some(NamedKey::PageDown),
        "delete" | "del" => Some(NamedKey::Delete),
        "backspace" => Some(NamedKey::Backspace),
        "escape" | "esc" => Some(NamedKey::Escape),
        "f12" => Some(NamedKey::F12),
        _ => None,
    };
    let key = match named {
        Some(named) => Key::Named(named),
        None if key_part.chars().count() == 1 => Key::character(key_part),
        None => return None,
    };
    Some((key, modifiers))
}
