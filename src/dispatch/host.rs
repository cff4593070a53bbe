//! The boundary between the dispatcher and the application it drives

use std::fmt;
use std::time::Duration;

use crate::keymap::{Action, HelpPage, KeyEvent};

/// Notifications sent through [`Host::notify`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    KeyboardQuit,
    PreCommand,
    PostCommand,
}

impl Hook {
    pub const fn name(self) -> &'static str {
        match self {
            Hook::KeyboardQuit => "KeyBoardQuit",
            Hook::PreCommand => "PreCommand",
            Hook::PostCommand => "PostCommand",
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What is about to run, or just ran
#[derive(Debug, Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub action: &'a Action,
    pub event: &'a KeyEvent,
    pub arg: Option<i64>,
}

#[derive(Debug, Clone, Copy)]
pub enum HookPayload<'a> {
    /// The key that triggered a keyboard quit
    Event(&'a KeyEvent),
    /// Before and after command execution
    Command(&'a CommandInvocation<'a>),
}

/// Services the dispatcher needs from its host application
pub trait Host {
    /// Would `event` land in a writable text target?
    fn is_editable_target(&self, event: &KeyEvent) -> bool;

    fn is_caret_browsing_active(&self) -> bool;

    /// Show a status message; `None` keeps it until replaced
    fn echo_status(&mut self, message: &str, timeout: Option<Duration>);

    /// The dispatcher claimed `event`; it must not reach the target
    fn stop_propagation(&mut self, event: &KeyEvent);

    fn notify(&mut self, _hook: Hook, _payload: HookPayload<'_>) {}

    /// Insert literal text into the focused target
    fn insert_text(&mut self, _text: &str) {}

    fn show_help(&mut self, _page: &HelpPage) {}

    /// Hand a replayed event the dispatcher did not claim to the target
    fn deliver(&mut self, _event: &KeyEvent) {}
}
