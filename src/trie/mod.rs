//! Byte-keyed prefix tree.
//!
//! Keys are arbitrary byte sequences; shared prefixes share tree paths. A
//! key may carry a payload of type `P` (the default `P = ()` trie stores
//! bare keys). Every query that returns several keys returns them in
//! ascending lexicographic byte order.
//!
//! ```
//! use pattrie::Trie;
//!
//! let trie: Trie = ["apple", "apply", "ape"].into_iter().collect();
//! assert!(trie.contains("ape"));
//!
//! let keys: Vec<Vec<u8>> = trie
//!     .enumerate_with_prefix("app")
//!     .into_iter()
//!     .map(|m| m.into_key())
//!     .collect();
//! assert_eq!(keys, vec![b"apple".to_vec(), b"apply".to_vec()]);
//! ```

pub mod node;
pub(crate) mod walk;

pub use node::{Node, Terminal};

use crate::pattern::executor::{count_pattern, execute_pattern, MatchOptions};
use crate::pattern::parser::{parse_pattern, CompiledPattern, PatternError};
use walk::Collector;

/// A key produced by a query, with its payload when the key carries one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Match<'t, P> {
    /// A key stored without a payload.
    Key(Vec<u8>),
    /// A key stored with a payload.
    Entry(Vec<u8>, &'t P),
}

impl<'t, P> Match<'t, P> {
    /// The matched key.
    #[must_use]
    pub fn key(&self) -> &[u8] {
        match self {
            Self::Key(key) | Self::Entry(key, _) => key,
        }
    }

    /// The payload stored with the key, if any.
    #[must_use]
    pub const fn payload(&self) -> Option<&'t P> {
        match self {
            Self::Key(_) => None,
            Self::Entry(_, value) => Some(*value),
        }
    }

    /// Consumes the match, returning the key.
    #[must_use]
    pub fn into_key(self) -> Vec<u8> {
        match self {
            Self::Key(key) | Self::Entry(key, _) => key,
        }
    }
}

/// Result of [`Trie::longest_common_prefix`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonPrefix<'t, P> {
    /// The query prefix, extended while the path had a single continuation
    /// and no key ended on it.
    pub prefix: Vec<u8>,
    /// Every key starting with `prefix`, ascending.
    pub matches: Vec<Match<'t, P>>,
}

/// A prefix tree over byte sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trie<P = ()> {
    root: Node<P>,
    len: usize,
}

impl<P> Trie<P> {
    /// Creates an empty trie.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            root: Node::new(),
            len: 0,
        }
    }

    /// The root node.
    #[must_use]
    pub const fn root(&self) -> &Node<P> {
        &self.root
    }

    /// Number of keys stored.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no key is stored.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts `key` without a payload.
    ///
    /// Returns `true` if the key was not present. An existing key, with or
    /// without a payload, is left untouched.
    pub fn insert(&mut self, key: impl AsRef<[u8]>) -> bool {
        let node = self.node_for_insert(key.as_ref());
        if node.terminal.is_some() {
            return false;
        }
        node.terminal = Some(Terminal::Key);
        self.len += 1;
        true
    }

    /// Inserts `key` with `value`, returning the payload it replaced.
    pub fn insert_value(&mut self, key: impl AsRef<[u8]>, value: P) -> Option<P> {
        let node = self.node_for_insert(key.as_ref());
        match node.terminal.replace(Terminal::Value(value)) {
            Some(Terminal::Value(previous)) => Some(previous),
            Some(Terminal::Key) => None,
            None => {
                self.len += 1;
                None
            }
        }
    }

    fn node_for_insert(&mut self, key: &[u8]) -> &mut Node<P> {
        key.iter().fold(&mut self.root, |node, &b| {
            node.children.entry(b).or_default()
        })
    }

    /// Returns true if `key` was inserted.
    #[must_use]
    pub fn contains(&self, key: impl AsRef<[u8]>) -> bool {
        self.root
            .descend(key.as_ref())
            .is_some_and(Node::is_terminal)
    }

    /// The payload stored with `key`, if the key is present with one.
    #[must_use]
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&P> {
        self.root
            .descend(key.as_ref())
            .and_then(Node::terminal)
            .and_then(Terminal::payload)
    }

    /// Removes `key`. Returns `true` if it was present.
    ///
    /// Nodes left with no children and no terminal marker are pruned.
    pub fn remove(&mut self, key: impl AsRef<[u8]>) -> bool {
        let key = key.as_ref();
        let Some(cut) = prune_point(&self.root, key) else {
            return false;
        };
        let Some(node) = key[..cut]
            .iter()
            .try_fold(&mut self.root, |node, b| node.children.get_mut(b))
        else {
            return false;
        };
        if cut == key.len() {
            node.terminal = None;
        } else {
            node.children.remove(&key[cut]);
        }
        self.len -= 1;
        true
    }

    /// Every stored key, ascending.
    #[must_use]
    pub fn keys(&self) -> Vec<Match<'_, P>> {
        self.enumerate_with_prefix(b"")
    }

    /// Every stored key starting with `prefix`, ascending.
    #[must_use]
    pub fn enumerate_with_prefix(&self, prefix: impl AsRef<[u8]>) -> Vec<Match<'_, P>> {
        let prefix = prefix.as_ref();
        let mut out = Collector::new(None);
        if let Some(node) = self.root.descend(prefix) {
            walk::collect_all(node, &mut prefix.to_vec(), &mut out);
        }
        out.finish()
    }

    /// Extends `prefix` to the longest prefix shared by every key that
    /// starts with it.
    ///
    /// Extension stops at the first node that either ends a key or branches.
    /// Returns `None` when no stored key starts with `prefix`.
    #[must_use]
    pub fn longest_common_prefix(&self, prefix: impl AsRef<[u8]>) -> Option<CommonPrefix<'_, P>> {
        let prefix = prefix.as_ref();
        let start = self.root.descend(prefix)?;
        let mut key = prefix.to_vec();
        let node = walk::extend_unique(start, &mut key);

        let mut out = Collector::new(None);
        walk::collect_all(node, &mut key.clone(), &mut out);
        let matches = out.finish();
        if matches.is_empty() {
            return None;
        }
        Some(CommonPrefix {
            prefix: key,
            matches,
        })
    }

    /// Every key matching `pattern`, ascending.
    ///
    /// See the crate documentation for the pattern syntax.
    pub fn find(&self, pattern: &str) -> Result<Vec<Match<'_, P>>, PatternError> {
        self.find_with(pattern, &MatchOptions::default())
    }

    /// Like [`Trie::find`], with search options.
    pub fn find_with(
        &self,
        pattern: &str,
        options: &MatchOptions,
    ) -> Result<Vec<Match<'_, P>>, PatternError> {
        let compiled = compile(pattern)?;
        let matches = execute_pattern(&compiled, &self.root, options);
        tracing::trace!(
            pattern,
            elements = compiled.len(),
            matches = matches.len(),
            "pattern search finished"
        );
        Ok(matches)
    }

    /// Returns true if at least one key matches `pattern`.
    pub fn is_match(&self, pattern: &str) -> Result<bool, PatternError> {
        let first = self.find_with(pattern, &MatchOptions::first())?;
        Ok(!first.is_empty())
    }

    /// Number of keys matching `pattern`. Keys are counted, not collected.
    pub fn count_matches(&self, pattern: &str) -> Result<usize, PatternError> {
        let compiled = compile(pattern)?;
        let count = count_pattern(&compiled, &self.root, &MatchOptions::default());
        tracing::trace!(pattern, elements = compiled.len(), count, "pattern count finished");
        Ok(count)
    }
}

fn compile(pattern: &str) -> Result<CompiledPattern, PatternError> {
    parse_pattern(pattern).inspect_err(|err| {
        tracing::debug!(pattern, column = err.column(), error = %err, "pattern rejected");
    })
}

/// Depth of the node that loses something when `key` is removed, or `None`
/// if `key` is not stored.
///
/// If the key's own node has children only its terminal marker goes
/// (`key.len()`). Otherwise the branch below the deepest ancestor that ends
/// a key or branches is dropped.
fn prune_point<P>(root: &Node<P>, key: &[u8]) -> Option<usize> {
    let mut cut = 0;
    let mut node = root;
    for (depth, &b) in key.iter().enumerate() {
        if node.is_terminal() || node.child_count() > 1 {
            cut = depth;
        }
        node = node.child(b)?;
    }
    if !node.is_terminal() {
        return None;
    }
    if node.child_count() > 0 {
        return Some(key.len());
    }
    Some(cut)
}

impl<P> Default for Trie<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: AsRef<[u8]>> FromIterator<K> for Trie {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut trie = Self::new();
        trie.extend(iter);
        trie
    }
}

impl<K: AsRef<[u8]>> Extend<K> for Trie {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}
