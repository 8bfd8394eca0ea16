//! Trie nodes and terminal markers.
//!
//! A node is one position in the key space: an ordered map from byte value
//! to child node plus an optional terminal marker saying a key ends here.
//! The terminal marker is its own field rather than a sentinel entry in the
//! child map, so every entry of `children` is a real byte edge.
//!
//! The read side of this module (`children`, `terminal`, `has_child`,
//! `child`) is the whole surface the pattern matcher depends on.

use std::collections::BTreeMap;

/// Marker for a key ending at a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminal<P> {
    /// A key ends here and carries no payload.
    Key,
    /// A key ends here and carries a payload.
    Value(P),
}

impl<P> Terminal<P> {
    /// Returns the payload, if any.
    #[must_use]
    pub const fn payload(&self) -> Option<&P> {
        match self {
            Self::Key => None,
            Self::Value(value) => Some(value),
        }
    }
}

/// One position in the key space.
///
/// Invariant: every node except the root has at least one child or a
/// terminal marker. Insertion only creates nodes on the path to a new
/// terminal, and removal prunes nodes that end up empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<P> {
    pub(crate) children: BTreeMap<u8, Node<P>>,
    pub(crate) terminal: Option<Terminal<P>>,
}

impl<P> Node<P> {
    pub(crate) const fn new() -> Self {
        Self {
            children: BTreeMap::new(),
            terminal: None,
        }
    }

    /// Children in ascending byte order.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = (u8, &Self)> + ExactSizeIterator {
        self.children.iter().map(|(&b, child)| (b, child))
    }

    /// The terminal marker, if a key ends at this node.
    #[must_use]
    pub const fn terminal(&self) -> Option<&Terminal<P>> {
        self.terminal.as_ref()
    }

    /// Returns true if a key ends at this node.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.terminal.is_some()
    }

    /// Returns true if this node continues with `byte`.
    #[must_use]
    #[inline]
    pub fn has_child(&self, byte: u8) -> bool {
        self.children.contains_key(&byte)
    }

    /// The child reached by `byte`, if any.
    #[must_use]
    #[inline]
    pub fn child(&self, byte: u8) -> Option<&Self> {
        self.children.get(&byte)
    }

    /// Number of distinct continuations.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Walks `path` from this node.
    #[must_use]
    pub fn descend(&self, path: &[u8]) -> Option<&Self> {
        path.iter().try_fold(self, |node, &b| node.child(b))
    }

    /// Returns true if no key ends here and there are no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.terminal.is_none()
    }
}

impl<P> Default for Node<P> {
    fn default() -> Self {
        Self::new()
    }
}

// Tears the subtree down through an explicit stack so a long key does not
// cost one stack frame per byte.
impl<P> Drop for Node<P> {
    fn drop(&mut self) {
        let mut pending: Vec<Self> = std::mem::take(&mut self.children).into_values().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(std::mem::take(&mut node.children).into_values());
        }
    }
}
