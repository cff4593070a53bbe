//! Command-line argument parsing for the keyseq binary
//!
//! Supports:
//! - Loading a specific init file
//! - Simulating an editable target or caret browsing
//! - Dumping the keymaps as an init file, or listing them as help
//! - Feeding key tokens from the command line or stdin

use clap::Parser;
use std::path::PathBuf;

use crate::keymap::{parse_key_sequence, Token};

/// Drive an Emacs-style key sequence dispatcher from the terminal
#[derive(Parser, Debug)]
#[command(name = "keyseq", version, about = "Emacs-style key sequence dispatcher")]
pub struct CliArgs {
    /// Key tokens to dispatch, e.g. `C-x C-s` (read from stdin when omitted)
    #[arg(value_name = "KEYS")]
    pub keys: Vec<String>,

    /// Init file to load instead of ~/.config/keyseq/init.yaml
    #[arg(short, long, value_name = "PATH")]
    pub init: Option<PathBuf>,

    /// Pretend keys land in a writable text target (edit mode)
    #[arg(short, long)]
    pub editable: bool,

    /// Pretend caret browsing is on (caret mode)
    #[arg(short, long)]
    pub caret: bool,

    /// Print the loaded keymaps as an init file and exit
    #[arg(long)]
    pub dump: bool,

    /// Print every key binding and exit
    #[arg(long)]
    pub list: bool,
}

impl CliArgs {
    /// Tokens given on the command line; each argument may hold several
    pub fn tokens(&self) -> Vec<Token> {
        self.keys
            .iter()
            .flat_map(|arg| parse_key_sequence(arg))
            .collect()
    }

    /// Whether tokens should come from stdin
    pub fn reads_stdin(&self) -> bool {
        self.keys.is_empty() && !self.dump && !self.list
    }
}
