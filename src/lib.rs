//! keyseq - Emacs-style key sequence dispatch
//!
//! This crate turns a stream of raw keystrokes into commands: per-mode
//! keymap tries, multi-key sequences, numeric prefix arguments and keyboard
//! macros. The host application is reached only through [`dispatch::Host`].

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod dispatch;
pub mod keymap;
pub mod tracing;

// Re-export commonly used types
pub use config::{KeyHandlerConfig, SpecialKeys};
pub use dispatch::{Dispatcher, Host, KeyOutcome};
pub use keymap::{Action, KeyEvent, KeyMapStore, Mode, Token};
