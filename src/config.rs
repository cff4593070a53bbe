//! Key handler configuration
//!
//! Special keys, the prefix-argument switch and the suspension blacklist.
//! These live at the top level of `~/.config/keyseq/init.yaml`, next to the
//! `bindings` list (see [`crate::keymap::InitFile`]).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::keymap::Token;

/// Tokens with a dedicated meaning to the dispatcher
///
/// Every slot is optional; an unset slot never matches. A slot missing from
/// the YAML takes its default, an explicit `null` unsets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialKeys {
    pub quit: Option<Token>,
    pub help: Option<Token>,
    pub escape: Option<Token>,
    pub macro_start: Option<Token>,
    pub macro_end: Option<Token>,
    pub universal_argument: Option<Token>,
    pub negative_argument_1: Option<Token>,
    pub negative_argument_2: Option<Token>,
    pub negative_argument_3: Option<Token>,
    pub suspend: Option<Token>,
}

impl Default for SpecialKeys {
    fn default() -> Self {
        Self {
            quit: Some(Token::from("C-g")),
            help: Some(Token::from("<f1>")),
            escape: Some(Token::from("C-q")),
            macro_start: None,
            macro_end: None,
            universal_argument: Some(Token::from("C-u")),
            negative_argument_1: Some(Token::from("C--")),
            negative_argument_2: Some(Token::from("C-M--")),
            negative_argument_3: Some(Token::from("M--")),
            suspend: Some(Token::from("<f2>")),
        }
    }
}

fn slot_is(slot: &Option<Token>, token: &str) -> bool {
    slot.as_ref().is_some_and(|t| t == token)
}

impl SpecialKeys {
    /// No special keys at all
    pub fn none() -> Self {
        Self {
            quit: None,
            help: None,
            escape: None,
            macro_start: None,
            macro_end: None,
            universal_argument: None,
            negative_argument_1: None,
            negative_argument_2: None,
            negative_argument_3: None,
            suspend: None,
        }
    }

    pub fn is_quit(&self, token: &str) -> bool {
        slot_is(&self.quit, token)
    }

    pub fn is_help(&self, token: &str) -> bool {
        slot_is(&self.help, token)
    }

    pub fn is_escape(&self, token: &str) -> bool {
        slot_is(&self.escape, token)
    }

    pub fn is_macro_start(&self, token: &str) -> bool {
        slot_is(&self.macro_start, token)
    }

    pub fn is_macro_end(&self, token: &str) -> bool {
        slot_is(&self.macro_end, token)
    }

    pub fn is_universal_argument(&self, token: &str) -> bool {
        slot_is(&self.universal_argument, token)
    }

    /// Any of the three negative-argument keys
    pub fn is_negative_argument(&self, token: &str) -> bool {
        slot_is(&self.negative_argument_1, token)
            || slot_is(&self.negative_argument_2, token)
            || slot_is(&self.negative_argument_3, token)
    }

    pub fn is_suspend(&self, token: &str) -> bool {
        slot_is(&self.suspend, token)
    }

    /// The negative-argument keys that are set, in slot order
    pub fn negative_arguments(&self) -> Vec<&Token> {
        [
            &self.negative_argument_1,
            &self.negative_argument_2,
            &self.negative_argument_3,
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// `(role, key, description)` rows for help pages
    pub fn roles(&self) -> Vec<(&'static str, Option<&Token>, &'static str)> {
        vec![
            ("Quit key", self.quit.as_ref(), "Cancel the current key sequence"),
            ("Help key", self.help.as_ref(), "List bindings starting with the current key sequence"),
            ("Escape key", self.escape.as_ref(), "Pass the next key through to the target"),
            ("Start key macro recording", self.macro_start.as_ref(), "Begin recording a keyboard macro"),
            (
                "End key macro recording / Play key macro",
                self.macro_end.as_ref(),
                "Finish recording, or replay the last keyboard macro",
            ),
            ("Suspension switch key", self.suspend.as_ref(), "Suspend or resume key handling"),
        ]
    }
}

fn default_true() -> bool {
    true
}

/// Dispatcher configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyHandlerConfig {
    #[serde(default)]
    pub special_keys: SpecialKeys,
    /// Whether a first stroke may begin a prefix argument
    #[serde(default = "default_true")]
    pub use_prefix_argument: bool,
    /// Patterns (regex or literal) naming contexts in which keys are ignored
    #[serde(default)]
    pub blacklist: Vec<String>,
}

impl Default for KeyHandlerConfig {
    fn default() -> Self {
        Self {
            special_keys: SpecialKeys::default(),
            use_prefix_argument: true,
            blacklist: Vec::new(),
        }
    }
}

impl KeyHandlerConfig {
    /// Load the configuration from an init file, or return defaults
    ///
    /// Falls back to the user's `init.yaml` when `path` is `None`. Bindings in
    /// the file are ignored here.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path
            .map(Path::to_path_buf)
            .or_else(crate::config_paths::init_file)
        else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Init file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded key handler config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse init file at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read init file at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
