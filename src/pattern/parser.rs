// SPDX-License-Identifier: MIT

//! Scanner and parser for trie pattern strings.
//!
//! Parses patterns like `a{x[^aeiou]}*{x}` into a flat sequence of
//! [`PatternElement`]s, one per byte of a matching key. Every error carries
//! the 1-based column of the construct that caused it. Columns count
//! logical symbols, so an escape such as `\*` occupies a single column.

use std::fmt;

use crate::common::byteset::ByteSet;

/// A single element of a compiled pattern. Each element consumes exactly
/// one byte of a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternElement {
    /// Match exactly this byte. Produced by plain bytes and by escapes.
    Literal(u8),
    /// Match any byte. Corresponds to `*`.
    Wildcard,
    /// Match any byte in the set. Corresponds to `[abc]`.
    Inclusion(ByteSet),
    /// Match any byte not in the set. Corresponds to `[^abc]`.
    Exclusion(ByteSet),
    /// Bind any byte to the name on first use; later uses must repeat the
    /// bound byte. Corresponds to `{name}`.
    Capture(String),
    /// Like `Capture`, but the first use only binds bytes in the set.
    /// Corresponds to `{name[abc]}`.
    CaptureInclusion(String, ByteSet),
    /// Like `Capture`, but the first use only binds bytes outside the set.
    /// Corresponds to `{name[^abc]}`.
    CaptureExclusion(String, ByteSet),
}

impl PatternElement {
    /// The capture name, for the three capture variants.
    #[must_use]
    pub fn capture_name(&self) -> Option<&str> {
        match self {
            Self::Capture(name)
            | Self::CaptureInclusion(name, _)
            | Self::CaptureExclusion(name, _) => Some(name),
            Self::Literal(_) | Self::Wildcard | Self::Inclusion(_) | Self::Exclusion(_) => None,
        }
    }
}

/// The kind of a delimited group, as named in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// `[...]`
    Inclusion,
    /// `[^...]`
    Exclusion,
    /// `{...}`
    Capture,
}

impl GroupKind {
    /// The symbol that closes a group of this kind.
    #[must_use]
    pub const fn closer(self) -> char {
        match self {
            Self::Inclusion | Self::Exclusion => ']',
            Self::Capture => '}',
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Inclusion => "inclusion",
            Self::Exclusion => "exclusion",
            Self::Capture => "capture",
        })
    }
}

/// Error returned when pattern parsing fails.
///
/// The `Display` output is the diagnostic shown to users; its wording is
/// fixed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum PatternError {
    /// A `[` or `{` was never closed.
    #[error("Dangling group ({kind}) starting at column {column}, expecting {}", .kind.closer())]
    DanglingGroup {
        /// Kind of the unclosed group.
        kind: GroupKind,
        /// Column of the opening symbol.
        column: usize,
    },
    /// A capture has no name before its filter or closer.
    #[error("Unnamed capture starting at column {column}, capture cannot be empty")]
    UnnamedCapture {
        /// Column of the `{`.
        column: usize,
    },
    /// Something follows a capture's bracket filter before the `}`.
    #[error("Group ({kind}) must in the tail position of capture starting at column {column}")]
    MisplacedGroupFilter {
        /// Kind of the misplaced filter (inclusion or exclusion).
        kind: GroupKind,
        /// Column of the capture's `{`.
        column: usize,
    },
    /// A reserved symbol appeared where a byte was expected.
    #[error("Unescaped symbol {symbol} at column {column}")]
    UnescapedSymbol {
        /// The offending symbol.
        symbol: char,
        /// Column of the symbol.
        column: usize,
    },
}

impl PatternError {
    /// The 1-based column the error points at.
    #[must_use]
    pub const fn column(&self) -> usize {
        match self {
            Self::DanglingGroup { column, .. }
            | Self::UnnamedCapture { column }
            | Self::MisplacedGroupFilter { column, .. }
            | Self::UnescapedSymbol { column, .. } => *column,
        }
    }
}

/// A compiled pattern ready for execution.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct CompiledPattern {
    /// Ordered elements; element `i` matches byte `i` of a key.
    pub elements: Vec<PatternElement>,
}

impl CompiledPattern {
    /// Number of elements, which is also the length of every matching key.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true for the empty pattern, which only matches the empty key.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Distinct capture names in order of first occurrence.
    #[must_use]
    pub fn capture_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in self.elements.iter().filter_map(PatternElement::capture_name) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}

/// Parses a pattern string into a [`CompiledPattern`].
///
/// Parsing is all-or-nothing: on the first error nothing is returned but
/// the error.
///
/// # Errors
///
/// Returns [`PatternError`] if the pattern string is malformed.
///
/// # Examples
///
/// ```
/// use pattrie::pattern::parser::{parse_pattern, PatternElement};
///
/// let pattern = parse_pattern(r"a*\*").unwrap();
/// assert_eq!(
///     pattern.elements,
///     vec![
///         PatternElement::Literal(b'a'),
///         PatternElement::Wildcard,
///         PatternElement::Literal(b'*'),
///     ]
/// );
///
/// let err = parse_pattern("ab[cd").unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "Dangling group (inclusion) starting at column 3, expecting ]"
/// );
/// ```
pub fn parse_pattern(input: &str) -> Result<CompiledPattern, PatternError> {
    let mut parser = Parser::new(input);
    let elements = parser.parse()?;
    Ok(CompiledPattern { elements })
}

/// Symbols that have meaning unless escaped.
const RESERVED: &[u8] = b"*^[]{}";

const ESCAPE: u8 = b'\\';

/// One logical input symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Symbol {
    /// An unescaped reserved symbol.
    Reserved(u8),
    /// A byte to be taken literally (plain or escaped).
    Byte(u8),
}

/// A group that has been opened and not yet closed.
#[derive(Debug, Clone, Copy)]
struct OpenGroup {
    kind: GroupKind,
    column: usize,
}

impl OpenGroup {
    const fn dangling(self) -> PatternError {
        PatternError::DanglingGroup {
            kind: self.kind,
            column: self.column,
        }
    }
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    /// Column of the next symbol.
    column: usize,
}

impl<'a> Parser<'a> {
    const fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
            column: 1,
        }
    }

    fn parse(&mut self) -> Result<Vec<PatternElement>, PatternError> {
        let mut elements = Vec::with_capacity(self.input.len());
        while let Some((symbol, column)) = self.next_symbol() {
            let element = match symbol {
                Symbol::Byte(b) => PatternElement::Literal(b),
                Symbol::Reserved(b'*') => PatternElement::Wildcard,
                Symbol::Reserved(b'[') => match self.parse_bracket(column)? {
                    (GroupKind::Exclusion, set) => PatternElement::Exclusion(set),
                    (_, set) => PatternElement::Inclusion(set),
                },
                Symbol::Reserved(b'{') => self.parse_capture(column)?,
                Symbol::Reserved(other) => return Err(unescaped(other, column)),
            };
            elements.push(element);
        }
        Ok(elements)
    }

    /// Parses the rest of a bracket group whose `[` sat at `column`.
    fn parse_bracket(&mut self, column: usize) -> Result<(GroupKind, ByteSet), PatternError> {
        let mut group = OpenGroup {
            kind: GroupKind::Inclusion,
            column,
        };
        if self.peek() == Some(b'^') {
            self.advance(1);
            self.column += 1;
            group.kind = GroupKind::Exclusion;
        }

        let mut set = ByteSet::new();
        loop {
            match self.next_symbol() {
                None => return Err(group.dangling()),
                Some((Symbol::Reserved(b']'), _)) => return Ok((group.kind, set)),
                Some((Symbol::Reserved(other), at)) => return Err(unescaped(other, at)),
                Some((Symbol::Byte(b), _)) => {
                    set.insert(b);
                }
            }
        }
    }

    /// Parses the rest of a capture whose `{` sat at `column`.
    fn parse_capture(&mut self, column: usize) -> Result<PatternElement, PatternError> {
        let group = OpenGroup {
            kind: GroupKind::Capture,
            column,
        };
        let mut name = Vec::new();
        loop {
            match self.next_symbol() {
                None => return Err(group.dangling()),
                Some((Symbol::Reserved(b'}'), _)) => {
                    let name = capture_name(&name, column)?;
                    return Ok(PatternElement::Capture(name));
                }
                Some((Symbol::Reserved(b'['), at)) => {
                    let name = capture_name(&name, column)?;
                    let (kind, set) = self.parse_bracket(at)?;
                    // The filter must be the last thing before `}`
                    return match self.next_symbol() {
                        None => Err(group.dangling()),
                        Some((Symbol::Reserved(b'}'), _)) => Ok(match kind {
                            GroupKind::Exclusion => PatternElement::CaptureExclusion(name, set),
                            _ => PatternElement::CaptureInclusion(name, set),
                        }),
                        Some(_) => Err(PatternError::MisplacedGroupFilter { kind, column }),
                    };
                }
                Some((Symbol::Reserved(other), at)) => return Err(unescaped(other, at)),
                Some((Symbol::Byte(b), _)) => name.push(b),
            }
        }
    }

    /// Reads the next logical symbol and the column it starts at.
    fn next_symbol(&mut self) -> Option<(Symbol, usize)> {
        let column = self.column;
        let symbol = match (self.peek()?, self.peek_at(1)) {
            (ESCAPE, Some(next)) if RESERVED.contains(&next) => {
                self.advance(2);
                Symbol::Byte(next)
            }
            (b, _) if RESERVED.contains(&b) => {
                self.advance(1);
                Symbol::Reserved(b)
            }
            (b, _) => {
                self.advance(1);
                Symbol::Byte(b)
            }
        };
        self.column += 1;
        Some((symbol, column))
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn advance(&mut self, bytes: usize) {
        self.pos += bytes;
    }
}

fn capture_name(raw: &[u8], column: usize) -> Result<String, PatternError> {
    if raw.is_empty() {
        return Err(PatternError::UnnamedCapture { column });
    }
    Ok(String::from_utf8_lossy(raw).into_owned())
}

const fn unescaped(symbol: u8, column: usize) -> PatternError {
    PatternError::UnescapedSymbol {
        symbol: symbol as char,
        column,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn escape(bytes: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(bytes.len() * 2);
        for &b in bytes {
            if RESERVED.contains(&b) {
                out.push(ESCAPE);
            }
            out.push(b);
        }
        out
    }

    proptest! {
        #[test]
        fn arbitrary_input_never_panics(input in "[ -~]{0,24}") {
            match parse_pattern(&input) {
                Ok(p) => prop_assert!(p.len() <= input.len()),
                Err(err) => prop_assert!(err.column() >= 1 && err.column() <= input.len()),
            }
        }

        #[test]
        fn escaped_text_parses_to_literals(text in "[a-z*^\\[\\]{}]{0,16}") {
            let escaped = String::from_utf8(escape(text.as_bytes())).unwrap();
            let p = parse_pattern(&escaped).unwrap();
            let expected: Vec<PatternElement> =
                text.bytes().map(PatternElement::Literal).collect();
            prop_assert_eq!(p.elements, expected);
        }

        #[test]
        fn star_run_has_matching_length(n in 0..32usize) {
            let p = parse_pattern(&"*".repeat(n)).unwrap();
            prop_assert_eq!(p.len(), n);
            prop_assert!(p.elements.iter().all(|e| *e == PatternElement::Wildcard));
        }
    }
}
