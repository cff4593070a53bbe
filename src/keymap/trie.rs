//! Key trie data structure for keymap dispatch.
//!
//! A [`KeyTrie`] slot is exactly one of a bound [`Action`] (leaf) or a
//! nested [`KeyMapNode`] (prefix). Nodes are shared through [`NodeRef`] so
//! that copying a mode can alias sub-tries instead of cloning them; a
//! binding made through an aliased prefix is visible from every mode that
//! holds it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::action::Action;
use super::types::Token;

/// Shared handle to a trie node
pub type NodeRef = Rc<RefCell<KeyMapNode>>;

/// One slot of a keymap
#[derive(Debug, Clone)]
pub enum KeyTrie {
    /// A leaf: execute this action.
    Action(Rc<Action>),
    /// A prefix: more keys needed.
    Node(NodeRef),
}

impl KeyTrie {
    pub fn as_action(&self) -> Option<&Rc<Action>> {
        match self {
            Self::Action(action) => Some(action),
            Self::Node(_) => None,
        }
    }

    pub fn as_node(&self) -> Option<&NodeRef> {
        match self {
            Self::Node(node) => Some(node),
            Self::Action(_) => None,
        }
    }
}

/// An internal trie node mapping tokens to child slots
#[derive(Debug, Default)]
pub struct KeyMapNode {
    map: HashMap<Token, KeyTrie>,
    /// Insertion order, for help pages and init-file generation
    order: Vec<Token>,
}

impl KeyMapNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an empty shared node
    pub fn new_ref() -> NodeRef {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Insert or replace a slot, keeping the original position on replace
    pub fn insert(&mut self, key: Token, trie: KeyTrie) {
        if !self.map.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.map.insert(key, trie);
    }

    pub fn get(&self, key: &str) -> Option<&KeyTrie> {
        self.map.get(key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&Token, &KeyTrie)> {
        self.order
            .iter()
            .filter_map(move |key| self.map.get(key).map(|trie| (key, trie)))
    }
}

/// Walk `keys` from `root` through prefix nodes only
///
/// Returns `None` as soon as a key is missing or names an action.
pub fn trail(root: &NodeRef, keys: &[Token]) -> Option<NodeRef> {
    let mut node = Rc::clone(root);
    for key in keys {
        let next = node.borrow().get(key).and_then(KeyTrie::as_node).cloned()?;
        node = next;
    }
    Some(node)
}

/// Resolve a full key sequence from `root`
///
/// An empty sequence resolves to the root itself. Walking through or past
/// an action fails.
pub fn lookup(root: &NodeRef, keys: &[Token]) -> Option<KeyTrie> {
    let Some((last, prefix)) = keys.split_last() else {
        return Some(KeyTrie::Node(Rc::clone(root)));
    };
    let node = trail(root, prefix)?;
    let found = node.borrow().get(last).cloned();
    found
}

/// Visit every leaf below `root` depth-first, in insertion order
pub fn for_each_leaf(root: &NodeRef, prefix: &mut Vec<Token>, f: &mut dyn FnMut(&[Token], &Rc<Action>)) {
    let entries: Vec<(Token, KeyTrie)> = root
        .borrow()
        .iter()
        .map(|(key, trie)| (key.clone(), trie.clone()))
        .collect();

    for (key, trie) in entries {
        prefix.push(key);
        match &trie {
            KeyTrie::Action(action) => f(prefix, action),
            KeyTrie::Node(node) => for_each_leaf(node, prefix, f),
        }
        prefix.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::types::parse_key_sequence;

    fn action(name: &str) -> KeyTrie {
        KeyTrie::Action(Rc::new(Action::new(name, |_, _| {})))
    }

    fn sample() -> NodeRef {
        let root = KeyMapNode::new_ref();
        let cx = KeyMapNode::new_ref();
        cx.borrow_mut().insert(Token::from("C-s"), action("save"));
        cx.borrow_mut().insert(Token::from("k"), action("kill"));
        root.borrow_mut().insert(Token::from("C-x"), KeyTrie::Node(cx));
        root.borrow_mut().insert(Token::from("j"), action("down"));
        root
    }

    #[test]
    fn test_insert_keeps_order_on_replace() {
        let mut node = KeyMapNode::new();
        node.insert(Token::from("b"), action("one"));
        node.insert(Token::from("a"), action("two"));
        node.insert(Token::from("b"), action("three"));

        let keys: Vec<&str> = node.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["b", "a"]);
        let replaced = node.get("b").and_then(KeyTrie::as_action).expect("leaf");
        assert_eq!(replaced.name(), "three");
    }

    #[test]
    fn test_lookup_leaf_and_prefix() {
        let root = sample();
        let found = lookup(&root, &parse_key_sequence("C-x C-s")).expect("bound");
        assert_eq!(found.as_action().map(|a| a.name()), Some("save"));

        let prefix = lookup(&root, &parse_key_sequence("C-x")).expect("prefix");
        assert!(prefix.as_node().is_some());

        assert!(lookup(&root, &[]).and_then(|t| t.as_node().cloned()).is_some());
    }

    #[test]
    fn test_lookup_fails_past_action() {
        let root = sample();
        assert!(lookup(&root, &parse_key_sequence("j k")).is_none());
        assert!(lookup(&root, &parse_key_sequence("C-x C-s C-s")).is_none());
        assert!(lookup(&root, &parse_key_sequence("q")).is_none());
    }

    #[test]
    fn test_trail_stops_at_actions() {
        let root = sample();
        assert!(trail(&root, &parse_key_sequence("C-x")).is_some());
        assert!(trail(&root, &parse_key_sequence("j")).is_none());
        assert!(Rc::ptr_eq(&trail(&root, &[]).expect("root"), &root));
    }

    #[test]
    fn test_for_each_leaf_depth_first() {
        let root = sample();
        let mut seen = Vec::new();
        for_each_leaf(&root, &mut Vec::new(), &mut |keys, action| {
            seen.push(format!("{} {}", crate::keymap::join_tokens(keys), action.name()));
        });
        assert_eq!(seen, vec!["C-x C-s save", "C-x k kill", "j down"]);
    }
}
