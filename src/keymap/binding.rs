//! Keybinding struct representing one leaf of a mode's keymap

use std::rc::Rc;

use super::action::Action;
use super::mode::Mode;
use super::types::{join_tokens, parse_key_sequence, Token};

/// A single keybinding mapping a token sequence to an action
#[derive(Debug, Clone)]
pub struct Keybinding {
    /// The mode whose trie holds this leaf
    pub mode: Mode,
    /// The full key sequence from the mode's root
    pub keys: Vec<Token>,
    /// The bound action
    pub action: Rc<Action>,
}

impl Keybinding {
    pub fn new(mode: Mode, keys: Vec<Token>, action: Rc<Action>) -> Self {
        Self { mode, keys, action }
    }

    /// Get display string for this keybinding, e.g. `C-x C-s`
    pub fn display_string(&self) -> String {
        join_tokens(&self.keys)
    }
}

/// One or more key sequences handed to `bind`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySpec {
    One(Vec<Token>),
    Many(Vec<Vec<Token>>),
}

impl KeySpec {
    /// Several whitespace-separated sequences bound to the same action
    pub fn many<I, S>(sequences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::Many(
            sequences
                .into_iter()
                .map(|s| parse_key_sequence(s.as_ref()))
                .collect(),
        )
    }

    pub fn sequences(&self) -> Vec<&[Token]> {
        match self {
            KeySpec::One(seq) => vec![seq.as_slice()],
            KeySpec::Many(seqs) => seqs.iter().map(Vec::as_slice).collect(),
        }
    }
}

impl From<&str> for KeySpec {
    fn from(keys: &str) -> Self {
        KeySpec::One(parse_key_sequence(keys))
    }
}

impl From<String> for KeySpec {
    fn from(keys: String) -> Self {
        KeySpec::from(keys.as_str())
    }
}

impl From<Vec<Token>> for KeySpec {
    fn from(keys: Vec<Token>) -> Self {
        KeySpec::One(keys)
    }
}

impl From<&[Token]> for KeySpec {
    fn from(keys: &[Token]) -> Self {
        KeySpec::One(keys.to_vec())
    }
}

impl<const N: usize> From<[&str; N]> for KeySpec {
    fn from(sequences: [&str; N]) -> Self {
        KeySpec::many(sequences)
    }
}
