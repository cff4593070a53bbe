//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use keyseq::config::{KeyHandlerConfig, SpecialKeys};
use keyseq::dispatch::{Dispatcher, Hook, HookPayload, Host};
use keyseq::keymap::{token_from_raw, Action, HelpPage, KeyEvent, KeyMapStore, Mode, Token};

/// Every command invocation: (command name, argument)
pub type CallLog = Rc<RefCell<Vec<(String, Option<i64>)>>>;

/// Host that records everything the dispatcher asks of it
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub editable: bool,
    pub caret: bool,
    pub statuses: Vec<(String, Option<Duration>)>,
    pub stopped: usize,
    /// Hook plus the command name and argument for command hooks
    pub hooks: Vec<(Hook, Option<String>, Option<i64>)>,
    pub inserted: Vec<String>,
    pub help_pages: Vec<HelpPage>,
    /// Replayed keys handed back to the target
    pub delivered: Vec<Token>,
}

impl RecordingHost {
    pub fn editable() -> Self {
        Self {
            editable: true,
            ..Self::default()
        }
    }

    pub fn caret() -> Self {
        Self {
            caret: true,
            ..Self::default()
        }
    }

    /// The most recent non-empty status message
    pub fn last_status(&self) -> Option<&str> {
        self.statuses
            .iter()
            .rev()
            .map(|(message, _)| message.as_str())
            .find(|message| !message.is_empty())
    }

    pub fn saw_status(&self, message: &str) -> bool {
        self.statuses.iter().any(|(m, _)| m == message)
    }

    pub fn hook_names(&self) -> Vec<Hook> {
        self.hooks.iter().map(|(hook, _, _)| *hook).collect()
    }
}

impl Host for RecordingHost {
    fn is_editable_target(&self, _event: &KeyEvent) -> bool {
        self.editable
    }

    fn is_caret_browsing_active(&self) -> bool {
        self.caret
    }

    fn echo_status(&mut self, message: &str, timeout: Option<Duration>) {
        self.statuses.push((message.to_string(), timeout));
    }

    fn stop_propagation(&mut self, _event: &KeyEvent) {
        self.stopped += 1;
    }

    fn notify(&mut self, hook: Hook, payload: HookPayload<'_>) {
        match payload {
            HookPayload::Event(_) => self.hooks.push((hook, None, None)),
            HookPayload::Command(inv) => {
                self.hooks
                    .push((hook, Some(inv.action.name().to_string()), inv.arg))
            }
        }
    }

    fn insert_text(&mut self, text: &str) {
        self.inserted.push(text.to_string());
    }

    fn show_help(&mut self, page: &HelpPage) {
        self.help_pages.push(page.clone());
    }

    fn deliver(&mut self, event: &KeyEvent) {
        self.delivered.push(token_from_raw(&event.raw));
    }
}

/// An action that appends its name and argument to `log`
pub fn logging_action(log: &CallLog, name: &str) -> Action {
    let sink = Rc::clone(log);
    let label = name.to_string();
    Action::new(name, move |_, arg| sink.borrow_mut().push((label.clone(), arg)))
}

/// Keymaps covering every mode plus a few cross-mode prefixes
pub fn test_store(log: &CallLog) -> KeyMapStore {
    let mut store = KeyMapStore::new();
    store.bind(Mode::Global, "C-x C-s", logging_action(log, "save-page"));
    store.bind(Mode::Global, "C-x k", logging_action(log, "close-tab"));
    store.bind(Mode::Global, "n", logging_action(log, "next-line"));
    store.bind(
        Mode::Global,
        "C-x p",
        logging_action(log, "print-page").no_repeat(true),
    );
    store.bind(Mode::View, ["j", "C-n"], logging_action(log, "scroll-down"));
    store.bind(Mode::View, "C-x v", logging_action(log, "view-source"));
    store.bind(Mode::Edit, "C-a", logging_action(log, "beginning-of-line"));
    store.bind(Mode::Caret, "C-SPC", logging_action(log, "set-mark"));
    store
}

/// Default special keys plus macro keys on F3 and F4
pub fn test_config() -> KeyHandlerConfig {
    KeyHandlerConfig {
        special_keys: SpecialKeys {
            macro_start: Some(Token::from("<f3>")),
            macro_end: Some(Token::from("<f4>")),
            ..SpecialKeys::default()
        },
        ..KeyHandlerConfig::default()
    }
}

pub fn dispatcher_with(host: RecordingHost, config: KeyHandlerConfig) -> (Dispatcher<RecordingHost>, CallLog) {
    let log: CallLog = Rc::default();
    let store = test_store(&log);
    (Dispatcher::new(store, config, host), log)
}

pub fn test_dispatcher() -> (Dispatcher<RecordingHost>, CallLog) {
    dispatcher_with(RecordingHost::default(), test_config())
}

/// Feed each whitespace-separated token in turn
pub fn type_keys(dispatcher: &mut Dispatcher<RecordingHost>, keys: &str) {
    for token in keys.split_whitespace() {
        dispatcher.handle_token(token);
    }
}

/// Command names in invocation order
pub fn calls(log: &CallLog) -> Vec<String> {
    log.borrow().iter().map(|(name, _)| name.clone()).collect()
}
