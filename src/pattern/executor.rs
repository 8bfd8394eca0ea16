//! Backtracking pattern executor over a trie.
//!
//! Walks the trie depth-first, pairing tree level `i` with pattern element
//! `i`. Only existing children are visited, so the cost follows the number
//! of trie paths consistent with the pattern so far rather than the size of
//! the alphabet.

use std::collections::HashMap;

use crate::pattern::parser::{CompiledPattern, PatternElement};
use crate::trie::walk::{collect_at_depth, Collector};
use crate::trie::{Match, Node};

/// Options for a pattern search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct MatchOptions {
    /// Stop after this many matches. `None` returns every match.
    pub max_matches: Option<usize>,
}

impl MatchOptions {
    /// Options that stop at the first match.
    #[must_use]
    pub const fn first() -> Self {
        Self {
            max_matches: Some(1),
        }
    }

    /// Returns these options with the match limit set to `limit`.
    #[must_use]
    pub const fn with_max_matches(mut self, limit: usize) -> Self {
        self.max_matches = Some(limit);
        self
    }
}

/// Executes a compiled pattern against the trie rooted at `root`.
///
/// Returns the matching keys in ascending order, each with its payload when
/// it carries one. A pattern that matches nothing yields an empty `Vec`.
///
/// # Algorithm
///
/// First attempts to classify the pattern into a fast-path shape:
///
/// - **Literals only** (`abc`): a single path lookup.
/// - **Wildcards only** (`***`): every key at that depth, no per-element
///   dispatch.
/// - **Everything else**: full backtracking search with capture bindings.
///
/// The fast paths produce identical results to the backtracking search.
pub fn execute_pattern<'t, P>(
    pattern: &CompiledPattern,
    root: &'t Node<P>,
    options: &MatchOptions,
) -> Vec<Match<'t, P>> {
    let mut out = Collector::new(options.max_matches);
    dispatch(pattern, root, &mut out);
    out.finish()
}

/// Counts the keys a compiled pattern matches without collecting them.
///
/// Agrees with `execute_pattern(..).len()` for the same options.
pub fn count_pattern<P>(pattern: &CompiledPattern, root: &Node<P>, options: &MatchOptions) -> usize {
    let mut out = Collector::counting(options.max_matches);
    dispatch(pattern, root, &mut out);
    out.count()
}

fn dispatch<'t, P>(pattern: &CompiledPattern, root: &'t Node<P>, out: &mut Collector<'t, P>) {
    match classify_pattern(pattern) {
        PatternShape::Exact(key) => {
            if let Some(terminal) = root.descend(&key).and_then(Node::terminal) {
                out.emit(&key, terminal);
            }
        }
        PatternShape::FixedLength(depth) => {
            collect_at_depth(root, depth, &mut Vec::with_capacity(depth), out);
        }
        PatternShape::Complex => backtrack(pattern, root, out),
    }
}

/// Pattern shape classification for fast-path dispatch.
#[derive(Debug, PartialEq, Eq)]
enum PatternShape {
    /// All elements are `Literal`; the key is fully determined.
    Exact(Vec<u8>),
    /// All elements are `Wildcard`.
    FixedLength(usize),
    /// Requires the backtracking search.
    Complex,
}

fn classify_pattern(pattern: &CompiledPattern) -> PatternShape {
    let elements = &pattern.elements;
    if elements.iter().all(|e| *e == PatternElement::Wildcard) {
        return PatternShape::FixedLength(elements.len());
    }

    let mut key = Vec::with_capacity(elements.len());
    for element in elements {
        match element {
            PatternElement::Literal(b) => key.push(*b),
            _ => return PatternShape::Complex,
        }
    }
    PatternShape::Exact(key)
}

fn backtrack<'t, P>(pattern: &CompiledPattern, root: &'t Node<P>, out: &mut Collector<'t, P>) {
    let mut search = Search {
        elements: &pattern.elements,
        key: Vec::with_capacity(pattern.len()),
        bindings: HashMap::new(),
        out,
    };
    search.walk(root, 0);
}

/// State of one backtracking search.
///
/// `key` and `bindings` describe the current path only: every push or bind
/// made before descending into a child is undone when the child returns, so
/// a sibling never sees bindings made under another sibling.
struct Search<'p, 't, 'o, P> {
    elements: &'p [PatternElement],
    key: Vec<u8>,
    bindings: HashMap<&'p str, u8>,
    out: &'o mut Collector<'t, P>,
}

impl<'p, 't, P> Search<'p, 't, '_, P> {
    fn walk(&mut self, node: &'t Node<P>, depth: usize) {
        if self.out.is_full() {
            return;
        }
        let elements = self.elements;
        let Some(element) = elements.get(depth) else {
            if let Some(terminal) = node.terminal() {
                self.out.emit(&self.key, terminal);
            }
            return;
        };

        match element {
            PatternElement::Literal(b) => self.follow(node, *b, depth),
            PatternElement::Wildcard => self.fan_out(node, depth, |_| true),
            PatternElement::Inclusion(set) => self.fan_out(node, depth, |b| set.contains(b)),
            PatternElement::Exclusion(set) => self.fan_out(node, depth, |b| !set.contains(b)),
            PatternElement::Capture(name) => self.capture(node, depth, name, |_| true),
            PatternElement::CaptureInclusion(name, set) => {
                self.capture(node, depth, name, |b| set.contains(b));
            }
            PatternElement::CaptureExclusion(name, set) => {
                self.capture(node, depth, name, |b| !set.contains(b));
            }
        }
    }

    /// Continues with the single child reached by `byte`, if present.
    fn follow(&mut self, node: &'t Node<P>, byte: u8, depth: usize) {
        if let Some(child) = node.child(byte) {
            self.descend(byte, child, depth);
        }
    }

    /// Continues with every child whose byte passes `accept`.
    fn fan_out(&mut self, node: &'t Node<P>, depth: usize, accept: impl Fn(u8) -> bool) {
        for (byte, child) in node.children() {
            if !accept(byte) {
                continue;
            }
            self.descend(byte, child, depth);
            if self.out.is_full() {
                return;
            }
        }
    }

    /// A bound name acts as a literal; the filter only applies on binding.
    fn capture(
        &mut self,
        node: &'t Node<P>,
        depth: usize,
        name: &'p str,
        accept: impl Fn(u8) -> bool,
    ) {
        if let Some(&bound) = self.bindings.get(name) {
            self.follow(node, bound, depth);
            return;
        }
        for (byte, child) in node.children() {
            if !accept(byte) {
                continue;
            }
            self.bindings.insert(name, byte);
            self.descend(byte, child, depth);
            self.bindings.remove(name);
            if self.out.is_full() {
                return;
            }
        }
    }

    fn descend(&mut self, byte: u8, child: &'t Node<P>, depth: usize) {
        self.key.push(byte);
        self.walk(child, depth + 1);
        self.key.pop();
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::pattern::parser::parse_pattern;
    use crate::trie::Trie;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn small_keys() -> impl Strategy<Value = Vec<Vec<u8>>> {
        proptest::collection::vec(proptest::collection::vec(b'a'..=b'c', 0..6), 0..40)
    }

    fn keys_of(matches: Vec<Match<'_, ()>>) -> Vec<Vec<u8>> {
        matches.into_iter().map(Match::into_key).collect()
    }

    proptest! {
        #[test]
        fn star_run_matches_keys_of_that_length(keys in small_keys(), len in 0..7usize) {
            let trie: Trie = keys.iter().collect();
            let pattern = parse_pattern(&"*".repeat(len)).unwrap();
            let got = keys_of(execute_pattern(&pattern, trie.root(), &MatchOptions::default()));
            let expected: Vec<Vec<u8>> = keys
                .iter()
                .filter(|k| k.len() == len)
                .cloned()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            prop_assert_eq!(got, expected);
        }

        #[test]
        fn reused_capture_positions_agree(
            keys in small_keys(),
            i in 0..4usize,
            gap in 1..3usize,
        ) {
            let trie: Trie = keys.iter().collect();
            let j = i + gap;
            let text: String = (0..=j)
                .map(|pos| if pos == i || pos == j { "{n}" } else { "*" })
                .collect();
            let pattern = parse_pattern(&text).unwrap();
            let got = keys_of(execute_pattern(&pattern, trie.root(), &MatchOptions::default()));
            for key in &got {
                prop_assert_eq!(key[i], key[j]);
            }
            let expected = keys
                .iter()
                .filter(|k| k.len() == j + 1 && k[i] == k[j])
                .collect::<BTreeSet<_>>()
                .len();
            prop_assert_eq!(got.len(), expected);
        }

        #[test]
        fn limited_search_is_prefix_of_full(keys in small_keys(), limit in 0..8usize) {
            let trie: Trie = keys.iter().collect();
            let pattern = parse_pattern("{x}[ab]*").unwrap();
            let full = execute_pattern(&pattern, trie.root(), &MatchOptions::default());
            let options = MatchOptions::default().with_max_matches(limit);
            let limited = execute_pattern(&pattern, trie.root(), &options);
            prop_assert_eq!(limited.len(), full.len().min(limit));
            prop_assert_eq!(&full[..limited.len()], &limited[..]);
        }
    }
}
