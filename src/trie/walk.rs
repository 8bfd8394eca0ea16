//! Depth-first enumeration shared by prefix queries and the pattern matcher.
//!
//! Every walk visits a node's terminal marker before its children and the
//! children in ascending byte order, which yields keys in ascending
//! lexicographic order without a sort.

use super::node::{Node, Terminal};
use super::Match;

/// Accumulates matches, optionally stopping after a fixed number.
///
/// A counting collector only tallies matches and never materializes keys.
pub(crate) struct Collector<'t, P> {
    matches: Vec<Match<'t, P>>,
    found: usize,
    keep: bool,
    limit: Option<usize>,
}

impl<'t, P> Collector<'t, P> {
    pub(crate) const fn new(limit: Option<usize>) -> Self {
        Self {
            matches: Vec::new(),
            found: 0,
            keep: true,
            limit,
        }
    }

    pub(crate) const fn counting(limit: Option<usize>) -> Self {
        Self {
            matches: Vec::new(),
            found: 0,
            keep: false,
            limit,
        }
    }

    /// Returns true once the limit has been reached. Walks check this before
    /// descending so a bounded search stops early.
    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.limit.is_some_and(|limit| self.found >= limit)
    }

    pub(crate) fn emit(&mut self, key: &[u8], terminal: &'t Terminal<P>) {
        if self.is_full() {
            return;
        }
        self.found += 1;
        if !self.keep {
            return;
        }
        let key = key.to_vec();
        self.matches.push(match terminal {
            Terminal::Key => Match::Key(key),
            Terminal::Value(value) => Match::Entry(key, value),
        });
    }

    pub(crate) const fn count(&self) -> usize {
        self.found
    }

    pub(crate) fn finish(self) -> Vec<Match<'t, P>> {
        self.matches
    }
}

/// Pending visit: the node, the byte leading to it, and the key length
/// before that byte.
type Frame<'t, P> = (&'t Node<P>, Option<u8>, usize);

/// Emits every key in the subtree rooted at `node`. `key` holds the path
/// to `node` on entry and is restored before returning.
///
/// Children are pushed in descending order so they pop ascending.
pub(crate) fn collect_all<'t, P>(node: &'t Node<P>, key: &mut Vec<u8>, out: &mut Collector<'t, P>) {
    let base = key.len();
    let mut stack: Vec<Frame<'t, P>> = vec![(node, None, base)];
    while let Some((node, byte, len)) = stack.pop() {
        if out.is_full() {
            break;
        }
        key.truncate(len);
        key.extend(byte);
        if let Some(terminal) = node.terminal() {
            out.emit(key, terminal);
        }
        let len = key.len();
        stack.extend(node.children().rev().map(|(b, child)| (child, Some(b), len)));
    }
    key.truncate(base);
}

/// Emits every key in the subtree of `node` that is exactly `depth` bytes
/// below it.
pub(crate) fn collect_at_depth<'t, P>(
    node: &'t Node<P>,
    depth: usize,
    key: &mut Vec<u8>,
    out: &mut Collector<'t, P>,
) {
    let base = key.len();
    let target = base + depth;
    let mut stack: Vec<Frame<'t, P>> = vec![(node, None, base)];
    while let Some((node, byte, len)) = stack.pop() {
        if out.is_full() {
            break;
        }
        key.truncate(len);
        key.extend(byte);
        if key.len() == target {
            if let Some(terminal) = node.terminal() {
                out.emit(key, terminal);
            }
            continue;
        }
        let len = key.len();
        stack.extend(node.children().rev().map(|(b, child)| (child, Some(b), len)));
    }
    key.truncate(base);
}

/// Extends `key` (the path to `node`) while the node is not terminal and
/// has exactly one continuation. Returns the node where extension stopped.
pub(crate) fn extend_unique<'t, P>(mut node: &'t Node<P>, key: &mut Vec<u8>) -> &'t Node<P> {
    while !node.is_terminal() && node.child_count() == 1 {
        let Some((byte, child)) = node.children().next() else {
            break;
        };
        key.push(byte);
        node = child;
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie::Trie;

    fn keys(matches: Vec<Match<'_, ()>>) -> Vec<Vec<u8>> {
        matches.into_iter().map(Match::into_key).collect()
    }

    #[test]
    fn test_collect_all_orders_prefix_first() {
        let trie: Trie = ["ab", "a", "b", "abc", "aa"].into_iter().collect();
        let mut out = Collector::new(None);
        collect_all(trie.root(), &mut Vec::new(), &mut out);
        let expected: Vec<Vec<u8>> = ["a", "aa", "ab", "abc", "b"]
            .iter()
            .map(|k| k.as_bytes().to_vec())
            .collect();
        assert_eq!(keys(out.finish()), expected);
    }

    #[test]
    fn test_collect_respects_limit() {
        let trie: Trie = ["a", "b", "c", "d"].into_iter().collect();
        let mut out = Collector::new(Some(2));
        collect_all(trie.root(), &mut Vec::new(), &mut out);
        assert_eq!(keys(out.finish()), vec![b"a".to_vec(), b"b".to_vec()]);
    }

    #[test]
    fn test_collect_restores_key_buffer() {
        let trie: Trie = ["xy", "xz"].into_iter().collect();
        let mut key = b"pre".to_vec();
        let mut out = Collector::new(None);
        collect_all(trie.root(), &mut key, &mut out);
        assert_eq!(key, b"pre".to_vec());
    }

    #[test]
    fn test_collect_at_depth() {
        let trie: Trie = ["a", "ab", "ac", "abc", "b"].into_iter().collect();
        let mut out = Collector::new(None);
        collect_at_depth(trie.root(), 2, &mut Vec::new(), &mut out);
        assert_eq!(keys(out.finish()), vec![b"ab".to_vec(), b"ac".to_vec()]);
    }

    #[test]
    fn test_counting_collector_keeps_no_keys() {
        let trie: Trie = ["a", "ab", "b"].into_iter().collect();
        let mut out = Collector::counting(None);
        collect_all(trie.root(), &mut Vec::new(), &mut out);
        assert_eq!(out.count(), 3);
        assert!(out.finish().is_empty());

        let mut out = Collector::counting(Some(2));
        collect_all(trie.root(), &mut Vec::new(), &mut out);
        assert_eq!(out.count(), 2);
    }

    #[test]
    fn test_collect_at_depth_restores_key_buffer() {
        let trie: Trie = ["ab", "cd"].into_iter().collect();
        let mut key = b"pre".to_vec();
        let mut out = Collector::new(None);
        collect_at_depth(trie.root(), 2, &mut key, &mut out);
        assert_eq!(key, b"pre".to_vec());
        assert_eq!(keys(out.finish()), vec![b"preab".to_vec(), b"precd".to_vec()]);
    }

    #[test]
    fn test_collect_long_key() {
        let long = vec![b'k'; 100_000];
        let trie: Trie = [long.clone(), b"k".to_vec()].into_iter().collect();

        let mut out = Collector::new(None);
        collect_all(trie.root(), &mut Vec::new(), &mut out);
        assert_eq!(keys(out.finish()), vec![b"k".to_vec(), long.clone()]);

        let mut out = Collector::new(None);
        collect_at_depth(trie.root(), long.len(), &mut Vec::new(), &mut out);
        assert_eq!(keys(out.finish()), vec![long]);
    }

    #[test]
    fn test_extend_unique_stops_at_branch() {
        let trie: Trie = ["abcx", "abcy"].into_iter().collect();
        let mut key = Vec::new();
        let node = extend_unique(trie.root(), &mut key);
        assert_eq!(key, b"abc".to_vec());
        assert_eq!(node.child_count(), 2);
    }

    #[test]
    fn test_extend_unique_stops_at_terminal() {
        let trie: Trie = ["ab", "abcd"].into_iter().collect();
        let mut key = Vec::new();
        let node = extend_unique(trie.root(), &mut key);
        assert_eq!(key, b"ab".to_vec());
        assert!(node.is_terminal());
    }
}
