//! Key sequence dispatch
//!
//! The [`Dispatcher`] consumes one key event at a time, walking the keymap
//! trie of the mode picked on the first stroke, reading prefix arguments,
//! recording and replaying keyboard macros, and running the bound action
//! once a sequence resolves.
//!
//! # Processing order
//!
//! ```text
//! escape pending → suspend key → suspended? → macro capture → special keys
//!   → prefix argument → help key → prefix trigger → mode selection
//!   → trie lookup (local, then global) → execute | descend | undefined
//! ```

mod blacklist;
mod executor;
mod host;
mod macros;
mod prefix;

use std::rc::Rc;
use std::time::Duration;

pub use blacklist::Blacklist;
pub use executor::execute;
pub use host::{CommandInvocation, Hook, HookPayload, Host};
pub use macros::MacroRecorder;
pub use prefix::parse_prefix_argument;

use crate::config::KeyHandlerConfig;
use crate::keymap::{
    generate_init_file, is_digit_argument_key, is_digit_key, join_tokens, token_from_raw, Action,
    EventTag, HelpPage, KeyEvent, KeyMapStore, KeyTrie, KeymapError, Mode, ModeContext, NodeRef,
    RawKey, Token,
};

/// How long transient status messages stay visible
pub const STATUS_TIMEOUT: Duration = Duration::from_millis(3000);
/// How long the suspension notice stays visible
pub const SUSPEND_NOTICE_TIMEOUT: Duration = Duration::from_millis(1000);
/// Upper bound on characters inserted by a prefix-argument repeat
const MAX_INSERT_REPEAT: usize = 1 << 16;

/// What the dispatcher did with one key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Claimed by a special key or a dedicated transition
    Handled,
    /// A bound action ran
    Executed,
    /// The key extended a multi-key sequence
    AwaitMore,
    /// The key started or extended a prefix argument
    PrefixArgument,
    /// The sequence so far plus this key is bound to nothing
    Undefined,
    /// Not ours; the key should reach the focused target
    Unhandled,
}

impl KeyOutcome {
    /// Whether propagation to the target was stopped
    pub fn is_handled(self) -> bool {
        self != KeyOutcome::Unhandled
    }
}

/// Result of looking a token up at the trie cursor
enum Lookup {
    Found(KeyTrie),
    /// Neither the cursor nor the global keymap binds the token
    Missing,
    /// The global keymap has no node for the sequence typed so far
    NoGlobalTrail,
}

#[derive(Debug)]
struct DispatchState {
    mode: Mode,
    current: NodeRef,
    sequence: Vec<Token>,
    prefix_keys: Vec<Token>,
    reading_prefix: bool,
    prefix_argument: Option<i64>,
    prefix_display: Option<String>,
    escape_pending: bool,
}

impl DispatchState {
    fn neutral(store: &KeyMapStore) -> Self {
        Self {
            mode: Mode::Global,
            current: Rc::clone(store.root(Mode::Global)),
            sequence: Vec::new(),
            prefix_keys: Vec::new(),
            reading_prefix: false,
            prefix_argument: None,
            prefix_display: None,
            escape_pending: false,
        }
    }
}

/// Comparable copy of the dispatcher's mutable state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    pub mode: Mode,
    /// The trie cursor sits on the active mode's root
    pub at_root: bool,
    pub sequence: Vec<Token>,
    pub prefix_keys: Vec<Token>,
    pub reading_prefix: bool,
    pub prefix_argument: Option<i64>,
    pub prefix_display: Option<String>,
    pub escape_pending: bool,
    pub suspended: bool,
    pub recording: bool,
}

impl StateSnapshot {
    /// Empty sequence, no prefix argument, no escape pending
    pub fn is_neutral(&self) -> bool {
        self.mode == Mode::Global
            && self.at_root
            && self.sequence.is_empty()
            && self.prefix_keys.is_empty()
            && !self.reading_prefix
            && self.prefix_argument.is_none()
            && self.prefix_display.is_none()
            && !self.escape_pending
    }
}

/// The key sequence state machine
pub struct Dispatcher<H: Host> {
    store: KeyMapStore,
    config: KeyHandlerConfig,
    blacklist: Blacklist,
    host: H,
    state: DispatchState,
    recorder: MacroRecorder,
    enabled: bool,
    suspended: bool,
    last_action: Option<Rc<Action>>,
}

impl<H: Host> Dispatcher<H> {
    pub fn new(store: KeyMapStore, config: KeyHandlerConfig, host: H) -> Self {
        let state = DispatchState::neutral(&store);
        let blacklist = Blacklist::new(&config.blacklist);
        Self {
            store,
            config,
            blacklist,
            host,
            state,
            recorder: MacroRecorder::new(),
            enabled: true,
            suspended: false,
            last_action: None,
        }
    }

    // ==================== Handle Key Event ====================

    /// Dispatch a live keystroke
    pub fn handle_key(&mut self, raw: RawKey) -> KeyOutcome {
        self.handle_event(&KeyEvent::live(raw))
    }

    /// Dispatch a live keystroke given by its token, e.g. `"C-x"`
    pub fn handle_token(&mut self, token: &str) -> KeyOutcome {
        self.handle_event(&KeyEvent::from_token(token, EventTag::Live))
    }

    /// Dispatch one key event
    ///
    /// Propagation is stopped through the host exactly when the outcome is
    /// handled.
    pub fn handle_event(&mut self, event: &KeyEvent) -> KeyOutcome {
        if !self.enabled || event.is_no_handle() {
            return KeyOutcome::Unhandled;
        }

        let token = token_from_raw(&event.raw);
        #[cfg(feature = "profile-tracing")]
        let _span = tracing::trace_span!("dispatch_key", token = %token).entered();

        let outcome = self.consume(&token, event);
        tracing::trace!(token = %token, ?outcome, tag = ?event.tag, "key event");

        if outcome.is_handled() {
            self.host.stop_propagation(event);
        }
        outcome
    }

    fn consume(&mut self, token: &Token, event: &KeyEvent) -> KeyOutcome {
        if self.state.escape_pending {
            self.back_to_neutral("Escaped", Some(STATUS_TIMEOUT));
            return KeyOutcome::Unhandled;
        }

        if token.is_empty() {
            return KeyOutcome::Unhandled;
        }

        if self.config.special_keys.is_suspend(token) {
            self.suspended = !self.suspended;
            tracing::debug!(suspended = self.suspended, "Suspension switched");
            self.back_to_neutral("Suspension switched", Some(SUSPEND_NOTICE_TIMEOUT));
            return KeyOutcome::Handled;
        }

        if self.suspended {
            return KeyOutcome::Unhandled;
        }

        if event.tag != EventTag::Replayed {
            self.recorder.capture(event);
        }

        if let Some(outcome) = self.special_key(token, event) {
            return outcome;
        }

        if self.state.reading_prefix {
            if self.continues_prefix(token) {
                self.state.prefix_keys.push(token.clone());
                self.echo_prefix_argument();
                return KeyOutcome::PrefixArgument;
            }
            self.finish_prefix_argument();
        }

        if self.state.sequence.is_empty() {
            if self.config.use_prefix_argument && self.is_prefix_trigger(token) {
                self.state.reading_prefix = true;
                self.state.prefix_keys.push(token.clone());
                self.echo_prefix_argument();
                return KeyOutcome::PrefixArgument;
            }

            let context = ModeContext {
                editable: self.host.is_editable_target(event),
                caret_browsing: self.host.is_caret_browsing_active(),
            };
            self.state.mode = context.select();
            self.state.current = Rc::clone(self.store.root(self.state.mode));
            tracing::trace!(mode = %self.state.mode, "first stroke");
        } else if self.config.special_keys.is_help(token) {
            let page = HelpPage::interactive_help(&self.store, &self.state.sequence);
            self.host.show_help(&page);
            self.back_to_neutral("", None);
            return KeyOutcome::Handled;
        }

        match self.resolve(token) {
            Lookup::Found(KeyTrie::Action(action)) => {
                let arg = self.state.prefix_argument;
                self.back_to_neutral("", None);
                execute(&mut self.host, &action, event, arg);
                self.last_action = Some(action);
                KeyOutcome::Executed
            }
            Lookup::Found(KeyTrie::Node(node)) => {
                self.state.sequence.push(token.clone());
                self.state.current = node;
                let message = format!(
                    "{}{}",
                    self.state.prefix_display.as_deref().unwrap_or(""),
                    join_tokens(&self.state.sequence)
                );
                self.host.echo_status(&message, None);
                KeyOutcome::AwaitMore
            }
            Lookup::Missing => self.undefined(token, event),
            Lookup::NoGlobalTrail => {
                self.last_action = None;
                self.back_to_neutral("", None);
                KeyOutcome::Unhandled
            }
        }
    }

    /// Look `token` up at the cursor, falling back to the global keymap
    fn resolve(&mut self, token: &Token) -> Lookup {
        if let Some(local) = self.state.current.borrow().get(token).cloned() {
            return Lookup::Found(local);
        }

        let Some(global) = self.store.trail(Mode::Global, &self.state.sequence) else {
            return Lookup::NoGlobalTrail;
        };
        let found = global.borrow().get(token).cloned();
        match found {
            Some(trie) => {
                self.state.current = global;
                Lookup::Found(trie)
            }
            None => Lookup::Missing,
        }
    }

    fn undefined(&mut self, token: &Token, event: &KeyEvent) -> KeyOutcome {
        self.last_action = None;

        if !self.state.sequence.is_empty() {
            let message = format!("{} {} is undefined", join_tokens(&self.state.sequence), token);
            tracing::debug!("{}", message);
            self.back_to_neutral(&message, Some(STATUS_TIMEOUT));
            return KeyOutcome::Undefined;
        }

        let repeat = self.state.prefix_argument.filter(|&n| n > 0);
        if let (Some(n), Some(c)) = (repeat, event.raw.char_code) {
            if event.raw.is_printable() && self.host.is_editable_target(event) {
                let count = usize::try_from(n).unwrap_or(usize::MAX).min(MAX_INSERT_REPEAT);
                self.host.insert_text(&c.to_string().repeat(count));
                self.back_to_neutral("", None);
                return KeyOutcome::Handled;
            }
        }

        self.back_to_neutral("", None);
        KeyOutcome::Unhandled
    }

    // ==================== Special keys ====================

    fn special_key(&mut self, token: &Token, event: &KeyEvent) -> Option<KeyOutcome> {
        let special = &self.config.special_keys;

        if special.is_escape(token) {
            self.reset_state();
            self.state.escape_pending = true;
            self.host.echo_status("Escape: ", None);
        } else if special.is_quit(token) {
            self.host.notify(Hook::KeyboardQuit, HookPayload::Event(event));
            self.back_to_neutral("Quit", None);
        } else if special.is_macro_end(token) {
            if self.recorder.is_recording() {
                self.recorder.finish();
                self.host.echo_status("Keyboard macro defined", Some(STATUS_TIMEOUT));
            } else if self.recorder.is_replaying() {
                tracing::debug!("Ignoring macro replay request during replay");
            } else if self.recorder.has_macro() {
                self.host.echo_status("Do macro", Some(STATUS_TIMEOUT));
                self.replay_macro();
            } else {
                self.host.echo_status("No macro defined", Some(STATUS_TIMEOUT));
            }
        } else if special.is_macro_start(token) {
            if self.recorder.is_recording() {
                self.recorder.finish();
                self.host.echo_status("Keyboard macro defined", Some(STATUS_TIMEOUT));
            } else if self.recorder.start() {
                self.host.echo_status("Defining Keyboard macro ...", Some(STATUS_TIMEOUT));
            } else {
                self.host.echo_status("Cannot record a macro while replaying", Some(STATUS_TIMEOUT));
            }
        } else {
            return None;
        }
        Some(KeyOutcome::Handled)
    }

    fn replay_macro(&mut self) {
        let events = self.recorder.replay_events();
        tracing::debug!(events = events.len(), "Replaying keyboard macro");

        self.recorder.set_replaying(true);
        for event in &events {
            if !self.handle_event(event).is_handled() {
                self.host.deliver(event);
            }
        }
        self.recorder.set_replaying(false);
    }

    // ==================== Prefix argument ====================

    fn is_prefix_trigger(&self, token: &str) -> bool {
        let special = &self.config.special_keys;
        special.is_universal_argument(token)
            || special.is_negative_argument(token)
            || is_digit_argument_key(token)
    }

    fn continues_prefix(&self, token: &str) -> bool {
        let special = &self.config.special_keys;
        is_digit_key(token)
            || special.is_universal_argument(token)
            || (token == "-"
                && self
                    .state
                    .prefix_keys
                    .last()
                    .is_some_and(|last| special.is_universal_argument(last)))
    }

    fn echo_prefix_argument(&mut self) {
        let value = parse_prefix_argument(&self.state.prefix_keys, &self.config.special_keys);
        let message = format!(
            "{} [prefix argument :: {}]",
            join_tokens(&self.state.prefix_keys),
            value.map(|v| v.to_string()).unwrap_or_default()
        );
        self.host.echo_status(&message, None);
    }

    fn finish_prefix_argument(&mut self) {
        let value = parse_prefix_argument(&self.state.prefix_keys, &self.config.special_keys);
        tracing::debug!(keys = %join_tokens(&self.state.prefix_keys), ?value, "prefix argument");
        self.state.prefix_argument = value;
        self.state.prefix_display = Some(format!("{} ", join_tokens(&self.state.prefix_keys)));
        self.state.prefix_keys.clear();
        self.state.reading_prefix = false;
    }

    // ==================== Neutral state ====================

    fn reset_state(&mut self) {
        self.state = DispatchState::neutral(&self.store);
    }

    /// Return to the neutral state and show `message`
    pub fn back_to_neutral(&mut self, message: &str, timeout: Option<Duration>) {
        self.reset_state();
        self.host.echo_status(message, timeout);
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            mode: self.state.mode,
            at_root: Rc::ptr_eq(&self.state.current, self.store.root(self.state.mode)),
            sequence: self.state.sequence.clone(),
            prefix_keys: self.state.prefix_keys.clone(),
            reading_prefix: self.state.reading_prefix,
            prefix_argument: self.state.prefix_argument,
            prefix_display: self.state.prefix_display.clone(),
            escape_pending: self.state.escape_pending,
            suspended: self.suspended,
            recording: self.recorder.is_recording(),
        }
    }

    /// Tokens of the sequence typed so far
    pub fn key_sequence(&self) -> &[Token] {
        &self.state.sequence
    }

    pub fn prefix_argument(&self) -> Option<i64> {
        self.state.prefix_argument
    }

    // ==================== Status ====================

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turn key handling on or off; turning it off drops any partial input
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.reset_state();
        }
        self.enabled = enabled;
        tracing::info!(enabled, "key handler status");
    }

    pub fn toggle_enabled(&mut self) {
        self.set_enabled(!self.enabled);
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Suspend key handling when `context` (e.g. a page URL) is blacklisted
    ///
    /// `None` always resumes, as does any context when the blacklist is empty.
    pub fn suspend_when_matched(&mut self, context: Option<&str>) {
        self.suspended = context.is_some_and(|c| self.blacklist.matches(c));
        tracing::debug!(?context, suspended = self.suspended, "blacklist check");
    }

    // ==================== Macros ====================

    pub fn is_recording(&self) -> bool {
        self.recorder.is_recording()
    }

    pub fn macro_events(&self) -> &[KeyEvent] {
        self.recorder.events()
    }

    // ==================== Accessors ====================

    pub fn store(&self) -> &KeyMapStore {
        &self.store
    }

    /// Mutable access to the keymaps; any partial input is dropped first
    pub fn store_mut(&mut self) -> &mut KeyMapStore {
        self.reset_state();
        &mut self.store
    }

    pub fn config(&self) -> &KeyHandlerConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: KeyHandlerConfig) {
        self.blacklist = Blacklist::new(&config.blacklist);
        self.config = config;
        self.reset_state();
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn last_action(&self) -> Option<&Rc<Action>> {
        self.last_action.as_ref()
    }

    /// A synthetic event for `token` that this dispatcher will ignore
    pub fn generate_key(&self, token: &str) -> KeyEvent {
        KeyEvent::from_token(token, EventTag::NoHandle)
    }

    pub fn list_key_bindings(&self) -> HelpPage {
        HelpPage::list_key_bindings(&self.store, &self.config)
    }

    /// Serialize the current settings and keymaps as an init file
    pub fn init_file(&self) -> Result<String, KeymapError> {
        generate_init_file(&self.config, &self.store)
    }
}
