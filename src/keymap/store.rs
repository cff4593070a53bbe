//! The per-mode keymap store
//!
//! Four independently rooted tries, one per [`Mode`]. Bindings are made
//! through `&mut self`, so a trie walk in progress (which only borrows the
//! store) can never observe a half-applied mutation.

use std::rc::Rc;

use super::action::Action;
use super::binding::{KeySpec, Keybinding};
use super::mode::Mode;
use super::trie::{self, KeyMapNode, KeyTrie, NodeRef};
use super::types::{join_tokens, Token};

/// Owner of the Global, View, Edit and Caret keymaps
#[derive(Debug)]
pub struct KeyMapStore {
    roots: [NodeRef; 4],
}

impl Default for KeyMapStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyMapStore {
    /// Declare four empty keymaps
    pub fn new() -> Self {
        Self {
            roots: [
                KeyMapNode::new_ref(),
                KeyMapNode::new_ref(),
                KeyMapNode::new_ref(),
                KeyMapNode::new_ref(),
            ],
        }
    }

    /// Root node of a mode's trie
    pub fn root(&self, mode: Mode) -> &NodeRef {
        &self.roots[mode.index()]
    }

    /// Bind one or more key sequences in `mode` to `action`
    pub fn bind(&mut self, mode: Mode, keys: impl Into<KeySpec>, action: Action) {
        let action = Rc::new(action);
        for seq in keys.into().sequences() {
            self.bind_shared(mode, seq, Rc::clone(&action));
        }
    }

    /// Bind a single token sequence
    pub fn bind_sequence(&mut self, mode: Mode, keys: &[Token], action: Action) {
        self.bind_shared(mode, keys, Rc::new(action));
    }

    fn bind_shared(&mut self, mode: Mode, keys: &[Token], action: Rc<Action>) {
        let Some((last, prefix)) = keys.split_last() else {
            tracing::warn!(mode = %mode, command = action.name(), "Ignoring binding with an empty key sequence");
            return;
        };

        let mut node = Rc::clone(self.root(mode));
        for (i, key) in prefix.iter().enumerate() {
            let existing = node.borrow().get(key).cloned();
            let next = match existing {
                Some(KeyTrie::Node(child)) => child,
                Some(KeyTrie::Action(previous)) => {
                    tracing::warn!(
                        mode = %mode,
                        "{} bound to [{}] overridden with the prefix key",
                        previous.label(),
                        join_tokens(&keys[..=i])
                    );
                    Self::new_child(&node, key)
                }
                None => Self::new_child(&node, key),
            };
            node = next;
        }

        tracing::trace!(mode = %mode, keys = %join_tokens(keys), command = action.name(), "bind");
        node.borrow_mut().insert(last.clone(), KeyTrie::Action(action));
    }

    fn new_child(parent: &NodeRef, key: &Token) -> NodeRef {
        let child = KeyMapNode::new_ref();
        parent
            .borrow_mut()
            .insert(key.clone(), KeyTrie::Node(Rc::clone(&child)));
        child
    }

    /// Resolve a sequence from a mode's root
    pub fn lookup(&self, mode: Mode, keys: &[Token]) -> Option<KeyTrie> {
        trie::lookup(self.root(mode), keys)
    }

    /// Resolve a sequence to the action bound at its end, if any
    pub fn action(&self, mode: Mode, keys: &[Token]) -> Option<Rc<Action>> {
        match self.lookup(mode, keys)? {
            KeyTrie::Action(action) => Some(action),
            KeyTrie::Node(_) => None,
        }
    }

    /// Walk a mode's trie through prefix nodes only
    pub fn trail(&self, mode: Mode, keys: &[Token]) -> Option<NodeRef> {
        trie::trail(self.root(mode), keys)
    }

    /// Merge the top-level entries of `from` into `to`
    ///
    /// Nested prefix nodes are aliased, not cloned: binding below a copied
    /// prefix later is visible from both modes.
    pub fn copy_mode(&mut self, from: Mode, to: Mode) {
        if from == to {
            return;
        }
        let entries: Vec<(Token, KeyTrie)> = self
            .root(from)
            .borrow()
            .iter()
            .map(|(key, trie)| (key.clone(), trie.clone()))
            .collect();

        tracing::debug!(from = %from, to = %to, entries = entries.len(), "copy keymap");
        let mut dest = self.root(to).borrow_mut();
        for (key, trie) in entries {
            dest.insert(key, trie);
        }
    }

    /// Every leaf of a mode, depth-first in insertion order
    pub fn leaves(&self, mode: Mode) -> Vec<Keybinding> {
        let mut out = Vec::new();
        trie::for_each_leaf(self.root(mode), &mut Vec::new(), &mut |keys, action| {
            out.push(Keybinding::new(mode, keys.to_vec(), Rc::clone(action)));
        });
        out
    }

    /// Number of leaves across all modes
    pub fn binding_count(&self) -> usize {
        Mode::ALL.iter().map(|&mode| self.leaves(mode).len()).sum()
    }

    /// Drop every binding in every mode, keeping the roots
    pub fn clear(&mut self) {
        for root in &self.roots {
            *root.borrow_mut() = KeyMapNode::new();
        }
    }
}
