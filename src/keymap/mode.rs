//! Keymap modes and the context used to pick one
//!
//! Every key sequence starts in one of the local modes (view, edit, caret),
//! chosen from the focused target; global bindings act as the fallback.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which keymap trie is consulted first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Global,
    View,
    Edit,
    Caret,
}

impl Mode {
    /// All modes, in declaration (and serialization) order
    pub const ALL: [Mode; 4] = [Mode::Global, Mode::View, Mode::Edit, Mode::Caret];

    pub const fn name(self) -> &'static str {
        match self {
            Mode::Global => "global",
            Mode::View => "view",
            Mode::Edit => "edit",
            Mode::Caret => "caret",
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Mode::Global => 0,
            Mode::View => 1,
            Mode::Edit => 2,
            Mode::Caret => 3,
        }
    }

    /// Heading used in help pages, e.g. "View mode"
    pub const fn title(self) -> &'static str {
        match self {
            Mode::Global => "Global",
            Mode::View => "View mode",
            Mode::Edit => "Edit mode",
            Mode::Caret => "Caret mode",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "global" => Ok(Mode::Global),
            "view" => Ok(Mode::View),
            "edit" => Ok(Mode::Edit),
            "caret" => Ok(Mode::Caret),
            _ => Err(format!("Unknown mode: {}", s)),
        }
    }
}

/// Facts about the focused target, gathered by the host for one keystroke
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeContext {
    /// The key would land in a writable text target
    pub editable: bool,
    /// Caret browsing is switched on
    pub caret_browsing: bool,
}

impl ModeContext {
    /// Pick the local mode: edit beats caret beats view
    pub fn select(self) -> Mode {
        if self.editable {
            Mode::Edit
        } else if self.caret_browsing {
            Mode::Caret
        } else {
            Mode::View
        }
    }
}
