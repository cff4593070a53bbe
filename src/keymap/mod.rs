//! Emacs-style keymaps
//!
//! This module provides the data side of key dispatch:
//! - Normalizes raw keystrokes into canonical tokens (`C-x`, `M-RET`, `<f2>`)
//! - Stores one keymap trie per mode (Global, View, Edit, Caret)
//! - Loads and writes YAML init files
//!
//! # Architecture
//!
//! ```text
//! RawKey → token_from_raw() → Token → KeyMapStore trie walk → Action
//! ```
//!
//! # Loading Keymaps
//!
//! ```ignore
//! let init = load_init(None)?;
//! let mut store = KeyMapStore::new();
//! init.apply(&mut store, &registry)?;
//! ```

mod action;
mod binding;
mod config;
mod help;
mod mode;
mod normalize;
mod store;
mod trie;
mod types;

pub use action::{Action, CommandFn, CommandRegistry};
pub use binding::{KeySpec, Keybinding};
pub use config::{
    generate_init_file, load_init, load_init_file, parse_init_yaml, BindingConfig, BindingEntry,
    CopyConfig, InitFile, KeymapError, KeysConfig, DEFAULT_INIT_YAML,
};
pub use help::{BindingTable, HelpPage};
pub use mode::{Mode, ModeContext};
pub use normalize::{digit_value, is_digit_argument_key, is_digit_key, raw_from_token, token_from_raw};
pub use store::KeyMapStore;
pub use trie::{KeyMapNode, KeyTrie, NodeRef};
pub use types::{
    join_tokens, parse_key_sequence, EventTag, KeyEvent, Modifiers, RawKey, SpecialKey, Token,
};
