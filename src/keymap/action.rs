//! Bound actions and the registry used to resolve command names
//!
//! An [`Action`] is what a keymap leaf holds: a named command closure plus
//! its description and repeat policy. Closures receive the originating key
//! event and the prefix argument explicitly; there is no implicit receiver.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::types::KeyEvent;

/// Signature of a bound command
pub type CommandFn = dyn Fn(&KeyEvent, Option<i64>);

/// A command bound to a key sequence
#[derive(Clone)]
pub struct Action {
    name: String,
    description: String,
    no_repeat: bool,
    func: Rc<CommandFn>,
}

impl Action {
    /// Create an action from a closure
    pub fn new(name: impl Into<String>, func: impl Fn(&KeyEvent, Option<i64>) + 'static) -> Self {
        Self::from_shared(name, Rc::new(func))
    }

    /// Create an action sharing an existing command closure
    pub fn from_shared(name: impl Into<String>, func: Rc<CommandFn>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            no_repeat: false,
            func,
        }
    }

    /// Set the human-readable description (builder pattern)
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Mark this action as exempt from prefix-argument repetition
    pub fn no_repeat(mut self, no_repeat: bool) -> Self {
        self.no_repeat = no_repeat;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Description for display, falling back to the command name
    pub fn label(&self) -> &str {
        if self.description.is_empty() {
            &self.name
        } else {
            &self.description
        }
    }

    pub fn is_no_repeat(&self) -> bool {
        self.no_repeat
    }

    /// Run the command once
    pub fn invoke(&self, event: &KeyEvent, arg: Option<i64>) {
        (self.func)(event, arg)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("no_repeat", &self.no_repeat)
            .finish_non_exhaustive()
    }
}

/// Named commands an init file can bind keys to
#[derive(Default, Clone)]
pub struct CommandRegistry {
    commands: HashMap<String, Rc<CommandFn>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command under `name`, replacing any previous one
    pub fn register(
        &mut self,
        name: impl Into<String>,
        func: impl Fn(&KeyEvent, Option<i64>) + 'static,
    ) -> &mut Self {
        self.commands.insert(name.into(), Rc::new(func));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Build an action for a registered command
    pub fn action(&self, name: &str) -> Option<Action> {
        self.commands
            .get(name)
            .map(|func| Action::from_shared(name, Rc::clone(func)))
    }

    /// Registered command names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.names())
            .finish()
    }
}
