//! # `pattrie`: Byte Trie with Pattern Search
//!
//! A prefix tree over arbitrary byte sequences that answers membership,
//! prefix and longest-common-prefix queries, and searches itself with a
//! small pattern language supporting wildcards, byte classes and named
//! captures with backreferences.
//!
//! ## Operations
//!
//! | Operation | Result |
//! |-----------|--------|
//! | [`Trie::insert`] / [`Trie::insert_value`] | Adds a key, optionally with a payload |
//! | [`Trie::contains`] / [`Trie::get`] | Exact membership / payload lookup |
//! | [`Trie::enumerate_with_prefix`] | Every key starting with a prefix |
//! | [`Trie::longest_common_prefix`] | Prefix extended to the next branch or key end |
//! | [`parse_and_match`] / [`Trie::find`] | Every key matching a pattern |
//!
//! All multi-key results are in ascending byte order.
//!
//! ## Pattern Syntax
//!
//! | Symbol | Meaning |
//! |--------|---------|
//! | `*` | any single byte |
//! | `[abc]` | any byte among a, b, c |
//! | `[^abc]` | any byte not among a, b, c |
//! | `{name}` | capture; first use binds any byte, later uses must equal it |
//! | `{name[abc]}` / `{name[^abc]}` | capture filtered on first use |
//! | `\x` for x in `* ^ [ ] { }` | literal x |
//!
//! ## Example
//!
//! ```
//! use pattrie::{parse_and_match, Trie};
//!
//! let trie: Trie = ["boob", "noon", "book"].into_iter().collect();
//! let found: Vec<Vec<u8>> = parse_and_match(&trie, "{1}{2}{2}{1}")
//!     .unwrap()
//!     .into_iter()
//!     .map(|m| m.into_key())
//!     .collect();
//! assert_eq!(found, vec![b"boob".to_vec(), b"noon".to_vec()]);
//!
//! let err = parse_and_match(&trie, "{}**").unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "Unnamed capture starting at column 1, capture cannot be empty"
//! );
//! ```

pub mod common;
pub mod pattern;
pub mod trie;

pub use common::byteset::ByteSet;
pub use pattern::executor::{count_pattern, execute_pattern, MatchOptions};
pub use pattern::parser::{parse_pattern, CompiledPattern, PatternElement, PatternError};
pub use trie::{CommonPrefix, Match, Node, Terminal, Trie};

/// Parses `pattern` and returns every key of `trie` that matches it.
///
/// Either the whole pattern parses and the trie is searched, or nothing is
/// searched and the parse error is returned. The error's `Display` output
/// is the user-facing diagnostic.
pub fn parse_and_match<'t, P>(
    trie: &'t Trie<P>,
    pattern: &str,
) -> Result<Vec<Match<'t, P>>, PatternError> {
    trie.find(pattern)
}
