//! Core types for the keymap system: Token, Modifiers, SpecialKey, RawKey, KeyEvent

use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// Modifier keys as a bitfield for efficient storage and comparison
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const CTRL: Modifiers = Modifiers(0b0001);
    pub const SHIFT: Modifiers = Modifiers(0b0010);
    pub const ALT: Modifiers = Modifiers(0b0100);
    pub const META: Modifiers = Modifiers(0b1000); // Cmd on macOS, Win on Windows

    /// Create modifiers from individual flags
    pub const fn new(ctrl: bool, shift: bool, alt: bool, meta: bool) -> Self {
        let mut bits = 0u8;
        if ctrl {
            bits |= 0b0001;
        }
        if shift {
            bits |= 0b0010;
        }
        if alt {
            bits |= 0b0100;
        }
        if meta {
            bits |= 0b1000;
        }
        Modifiers(bits)
    }

    /// Check if ctrl is held
    #[inline]
    pub const fn ctrl(self) -> bool {
        self.0 & 0b0001 != 0
    }

    /// Check if shift is held
    #[inline]
    pub const fn shift(self) -> bool {
        self.0 & 0b0010 != 0
    }

    /// Check if alt/option is held
    #[inline]
    pub const fn alt(self) -> bool {
        self.0 & 0b0100 != 0
    }

    /// Check if meta (cmd/win) is held
    #[inline]
    pub const fn meta(self) -> bool {
        self.0 & 0b1000 != 0
    }

    /// Emacs meta: either alt or the meta/command key
    #[inline]
    pub const fn emacs_meta(self) -> bool {
        self.alt() || self.meta()
    }

    /// Check if no modifiers are held
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Combine two modifier sets
    #[inline]
    pub const fn union(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }

    /// Check if this contains all modifiers in other
    #[inline]
    pub const fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

/// Non-printable keys the normalizer knows how to name
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpecialKey {
    Escape,
    Return,
    Enter,
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    Tab,
    Backspace,
    PrintScreen,
    Insert,
    Pause,
    Delete,
    /// Function keys; only F1-F24 are representable
    F(u8),
    /// OEM 102 key, reported instead of `_` for Ctrl+underscore on some Windows layouts
    Oem102,
    /// A platform key code with no canonical name
    Unidentified(u32),
}

/// Raw key descriptor for one physical keystroke, as delivered by the host
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RawKey {
    /// Character produced by the key, if any
    pub char_code: Option<char>,
    /// Named key, used when the key produced no printable character
    pub special: Option<SpecialKey>,
    pub mods: Modifiers,
}

impl RawKey {
    /// A character keystroke
    pub const fn char(c: char, mods: Modifiers) -> Self {
        Self {
            char_code: Some(c),
            special: None,
            mods,
        }
    }

    /// A named keystroke
    pub const fn special(key: SpecialKey, mods: Modifiers) -> Self {
        Self {
            char_code: None,
            special: Some(key),
            mods,
        }
    }

    /// A descriptor that normalizes to the empty token
    pub const fn noop() -> Self {
        Self {
            char_code: None,
            special: None,
            mods: Modifiers::NONE,
        }
    }

    /// True for printable ASCII (0x20 through 0x7e)
    pub fn is_printable(&self) -> bool {
        self.char_code.is_some_and(|c| (' '..='~').contains(&c))
    }

    /// True when the key produced an ASCII digit
    pub fn is_digit(&self) -> bool {
        self.char_code.is_some_and(|c| c.is_ascii_digit())
    }
}

/// Where a key event came from
///
/// Replaces mutation of the event object: the tag travels with the event
/// back into the dispatcher's entry point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EventTag {
    /// Typed by the user
    #[default]
    Live,
    /// Fed back from a recorded keyboard macro; never re-recorded
    Replayed,
    /// Synthesized for the underlying target; never dispatched
    NoHandle,
}

/// A raw key plus its origin tag
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub raw: RawKey,
    pub tag: EventTag,
}

impl KeyEvent {
    pub const fn new(raw: RawKey, tag: EventTag) -> Self {
        Self { raw, tag }
    }

    pub const fn live(raw: RawKey) -> Self {
        Self::new(raw, EventTag::Live)
    }

    /// Build an event from its canonical token through the normalizer's inverse
    pub fn from_token(token: &str, tag: EventTag) -> Self {
        Self::new(super::normalize::raw_from_token(token), tag)
    }

    /// Copy of this event tagged for macro replay
    pub fn replayed(&self) -> Self {
        Self::new(self.raw, EventTag::Replayed)
    }

    pub fn is_no_handle(&self) -> bool {
        self.tag == EventTag::NoHandle
    }
}

/// Canonical string for one keystroke plus modifiers, e.g. `C-x`, `M-RET`, `<f2>`
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// The token produced for keys that cannot be represented
    pub const fn empty() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for Token {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Token {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Token {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for Token {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Token {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Split a `kbd`-style description such as `"C-x C-s"` into tokens
pub fn parse_key_sequence(keys: &str) -> Vec<Token> {
    keys.split_whitespace().map(Token::from).collect()
}

/// Join tokens back into their `kbd`-style description
pub fn join_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(Token::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}
