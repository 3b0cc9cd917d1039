//! Typed view over the configured key bindings.
//!
//! The config file stores bindings as plain strings (`"h"`, `"left"`,
//! `"ctrl+right"`). This module turns them into key events the terminal
//! reports and maps those events back to the clock's actions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::warn;

use crate::config::Keymaps;

/// Every action a key can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // === TIME TRAVEL ===
    /// Move one hour back.
    PrevHour,
    /// Move one hour forward.
    NextHour,
    /// Move one day back.
    PrevDay,
    /// Move one day forward.
    NextDay,
    /// Move one week back.
    PrevWeek,
    /// Move one week forward.
    NextWeek,

    // === DISPLAY ===
    /// Show or hide dates.
    ToggleDate,
    /// Open the selected time in a web browser.
    OpenWeb,
    /// Jump back to the current time.
    Now,
}

impl Action {
    /// All actions, in the order they appear in the `[keymaps]` table.
    pub const ALL: [Self; 9] = [
        Self::PrevHour,
        Self::NextHour,
        Self::PrevDay,
        Self::NextDay,
        Self::PrevWeek,
        Self::NextWeek,
        Self::ToggleDate,
        Self::OpenWeb,
        Self::Now,
    ];

    /// Get the key used for this action in the `[keymaps]` table.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::PrevHour => "prev_hour",
            Self::NextHour => "next_hour",
            Self::PrevDay => "prev_day",
            Self::NextDay => "next_day",
            Self::PrevWeek => "prev_week",
            Self::NextWeek => "next_week",
            Self::ToggleDate => "toggle_date",
            Self::OpenWeb => "open_web",
            Self::Now => "now",
        }
    }

    /// Built-in bindings used when the config leaves an action unbound.
    const fn default_bindings(&self) -> &'static [&'static str] {
        match self {
            Self::PrevHour => &["h", "left"],
            Self::NextHour => &["l", "right"],
            Self::PrevDay => &["H", "shift+left"],
            Self::NextDay => &["L", "shift+right"],
            Self::PrevWeek => &["<", "ctrl+left"],
            Self::NextWeek => &[">", "ctrl+right"],
            Self::ToggleDate => &["d"],
            Self::OpenWeb => &["o"],
            Self::Now => &["n"],
        }
    }
}

/// Error produced for a binding string that names no key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyBindingError {
    /// The binding string is empty.
    #[error("empty key binding")]
    Empty,
    /// The key name is not recognised.
    #[error("unknown key '{0}'")]
    UnknownKey(String),
}

/// A key binding (key + modifiers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    /// The key itself.
    pub code: KeyCode,
    /// Modifiers held with the key; never SHIFT for character keys.
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    /// Create a new key binding.
    ///
    /// Shift on a character key is folded into the character's case, so
    /// `Char('h')` + SHIFT and `Char('H')` are the same binding. Characters
    /// whose uppercase form is more than one character are kept as is.
    #[must_use]
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        match code {
            KeyCode::Char(c) if modifiers.contains(KeyModifiers::SHIFT) => Self {
                code: KeyCode::Char(uppercase_char(c)),
                modifiers: modifiers.difference(KeyModifiers::SHIFT),
            },
            KeyCode::BackTab => Self {
                code,
                modifiers: modifiers.difference(KeyModifiers::SHIFT),
            },
            _ => Self { code, modifiers },
        }
    }

    /// Create a key binding from a KeyEvent.
    #[must_use]
    pub fn from_event(event: KeyEvent) -> Self {
        Self::new(event.code, event.modifiers)
    }

    /// Parses a binding string such as `"h"`, `"left"` or `"ctrl+right"`.
    pub fn parse(binding: &str) -> Result<Self, KeyBindingError> {
        if binding.is_empty() {
            return Err(KeyBindingError::Empty);
        }

        let mut modifiers = KeyModifiers::NONE;
        let mut rest = binding;
        while let Some((modifier, tail)) = split_modifier(rest) {
            modifiers |= modifier;
            rest = tail;
        }

        let code = parse_key(rest).ok_or_else(|| KeyBindingError::UnknownKey(rest.to_string()))?;
        Ok(Self::new(code, modifiers))
    }
}

fn uppercase_char(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

/// Splits a leading `ctrl+`, `alt-`, ... off a binding string.
fn split_modifier(binding: &str) -> Option<(KeyModifiers, &str)> {
    let (head, tail) = binding.split_once(|c: char| c == '+' || c == '-')?;
    if tail.is_empty() {
        return None;
    }

    let modifier = match head.to_ascii_lowercase().as_str() {
        "ctrl" | "control" => KeyModifiers::CONTROL,
        "alt" | "meta" => KeyModifiers::ALT,
        "shift" => KeyModifiers::SHIFT,
        _ => return None,
    };
    Some((modifier, tail))
}

fn parse_key(key: &str) -> Option<KeyCode> {
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(c));
    }

    let lower = key.to_ascii_lowercase();
    let code = match lower.as_str() {
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "space" => KeyCode::Char(' '),
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" | "pgup" => KeyCode::PageUp,
        "pagedown" | "pgdown" => KeyCode::PageDown,
        "delete" | "del" => KeyCode::Delete,
        "backspace" => KeyCode::Backspace,
        _ => {
            let n: u8 = lower.strip_prefix('f')?.parse().ok()?;
            if !(1..=12).contains(&n) {
                return None;
            }
            KeyCode::F(n)
        }
    };
    Some(code)
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            f.write_str("ctrl+")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            f.write_str("alt+")?;
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            f.write_str("shift+")?;
        }

        match self.code {
            KeyCode::Char(' ') => f.write_str("space"),
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::F(n) => write!(f, "f{n}"),
            KeyCode::Left => f.write_str("left"),
            KeyCode::Right => f.write_str("right"),
            KeyCode::Up => f.write_str("up"),
            KeyCode::Down => f.write_str("down"),
            KeyCode::Enter => f.write_str("enter"),
            KeyCode::Esc => f.write_str("esc"),
            KeyCode::Tab => f.write_str("tab"),
            KeyCode::BackTab => f.write_str("backtab"),
            KeyCode::Home => f.write_str("home"),
            KeyCode::End => f.write_str("end"),
            KeyCode::PageUp => f.write_str("pageup"),
            KeyCode::PageDown => f.write_str("pagedown"),
            KeyCode::Delete => f.write_str("delete"),
            KeyCode::Backspace => f.write_str("backspace"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Shortcut registry that maps key events to actions.
///
/// Two actions may list the same binding; the action that comes first in
/// [`Action::ALL`] keeps it. Configured bindings always take precedence
/// over built-in ones.
#[derive(Debug, Clone, Default)]
pub struct ShortcutRegistry {
    bindings: HashMap<KeyBinding, Action>,
}

impl ShortcutRegistry {
    /// Build a registry from the configured bindings only.
    ///
    /// Bindings that do not parse are skipped with a warning.
    pub fn from_keymaps(keymaps: &Keymaps) -> Self {
        let mut registry = Self::default();
        for action in Action::ALL {
            for binding in keymaps.bindings(action) {
                registry.register_str(binding, action);
            }
        }
        registry
    }

    /// Build a registry from the configured bindings, using the built-in
    /// bindings for every action the config leaves empty.
    ///
    /// Built-in bindings only take keys the config left free.
    pub fn with_defaults(keymaps: &Keymaps) -> Self {
        let mut registry = Self::from_keymaps(keymaps);
        for action in Action::ALL {
            if keymaps.bindings(action).is_empty() {
                for binding in action.default_bindings() {
                    registry.register_str(binding, action);
                }
            }
        }
        registry
    }

    fn register_str(&mut self, binding: &str, action: Action) {
        match KeyBinding::parse(binding) {
            Ok(parsed) => {
                self.bindings.entry(parsed).or_insert(action);
            }
            Err(err) => {
                warn!(action = action.id(), binding, error = %err, "Ignoring key binding");
            }
        }
    }

    /// Look up the action for a key event.
    #[must_use]
    pub fn lookup(&self, event: KeyEvent) -> Option<Action> {
        self.bindings.get(&KeyBinding::from_event(event)).copied()
    }

    /// Check if a key event triggers a specific action.
    #[must_use]
    pub fn matches(&self, event: KeyEvent, action: Action) -> bool {
        self.lookup(event) == Some(action)
    }

    /// Bindings that trigger `action`, sorted by their display form.
    pub fn bindings_for(&self, action: Action) -> Vec<KeyBinding> {
        let mut bindings: Vec<KeyBinding> = self
            .bindings
            .iter()
            .filter(|(_, bound)| **bound == action)
            .map(|(binding, _)| *binding)
            .collect();
        bindings.sort_by_key(ToString::to_string);
        bindings
    }
}
