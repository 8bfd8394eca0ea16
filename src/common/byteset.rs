//! Byte set used by bracket groups and capture filters.
//!
//! # Bitmask Representation
//!
//! A set over the 256 possible byte values is stored as four `u64` words
//! rather than a `HashSet<u8>` or `Vec<bool>`. Membership is a shift and a
//! bitwise AND, the value is `Copy`, and two sets compare with a plain
//! array comparison. The layout is 32 bytes with no heap allocation.

use std::fmt;

/// A set of byte values (0-255).
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ByteSet {
    words: [u64; 4],
}

impl ByteSet {
    /// The empty set.
    pub const EMPTY: Self = Self { words: [0; 4] };

    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Creates a set holding every byte of `bytes`. Duplicates are ignored.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut set = Self::new();
        for &b in bytes {
            set.insert(b);
        }
        set
    }

    /// Adds `byte` to the set. Returns `true` if it was not already present.
    pub fn insert(&mut self, byte: u8) -> bool {
        let (word, bit) = Self::slot(byte);
        let fresh = self.words[word] & bit == 0;
        self.words[word] |= bit;
        fresh
    }

    /// Returns true if `byte` is in the set.
    #[must_use]
    #[inline]
    pub const fn contains(&self, byte: u8) -> bool {
        let (word, bit) = Self::slot(byte);
        self.words[word] & bit != 0
    }

    /// Number of bytes in the set.
    #[must_use]
    pub const fn len(&self) -> usize {
        let mut total = 0;
        let mut i = 0;
        while i < self.words.len() {
            total += self.words[i].count_ones() as usize;
            i += 1;
        }
        total
    }

    /// Returns true if the set holds no bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        (self.words[0] | self.words[1] | self.words[2] | self.words[3]) == 0
    }

    /// Iterates over the members in ascending byte order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=u8::MAX).filter(move |&b| self.contains(b))
    }

    #[inline]
    const fn slot(byte: u8) -> (usize, u64) {
        ((byte >> 6) as usize, 1 << (byte & 63))
    }
}

impl FromIterator<u8> for ByteSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut set = Self::new();
        for b in iter {
            set.insert(b);
        }
        set
    }
}

impl fmt::Debug for ByteSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.iter().map(|b| char::from(b).escape_default().to_string()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let set = ByteSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert!(!set.contains(0));
        assert!(!set.contains(255));
    }

    #[test]
    fn test_insert_reports_fresh() {
        let mut set = ByteSet::new();
        assert!(set.insert(b'a'));
        assert!(!set.insert(b'a'));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_word_boundaries() {
        // 63/64, 127/128 and 191/192 sit on either side of a word split
        let set = ByteSet::from_bytes(&[0, 63, 64, 127, 128, 191, 192, 255]);
        assert_eq!(set.len(), 8);
        for b in [0u8, 63, 64, 127, 128, 191, 192, 255] {
            assert!(set.contains(b), "missing {b}");
        }
        assert!(!set.contains(62));
        assert!(!set.contains(65));
        assert!(!set.contains(254));
    }

    #[test]
    fn test_iter_ascending() {
        let set = ByteSet::from_bytes(b"zebra");
        let bytes: Vec<u8> = set.iter().collect();
        assert_eq!(bytes, b"aberz".to_vec());
    }

    #[test]
    fn test_from_iter_matches_from_bytes() {
        let a: ByteSet = b"hello".iter().copied().collect();
        assert_eq!(a, ByteSet::from_bytes(b"helo"));
    }

    #[test]
    fn test_debug_escapes() {
        let set = ByteSet::from_bytes(b"a\n");
        assert_eq!(format!("{set:?}"), r#"{"\\n", "a"}"#);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn membership_matches_input(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let set = ByteSet::from_bytes(&bytes);
            for b in 0..=u8::MAX {
                prop_assert_eq!(set.contains(b), bytes.contains(&b));
            }
        }

        #[test]
        fn len_counts_distinct(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let mut distinct = bytes.clone();
            distinct.sort_unstable();
            distinct.dedup();
            let set = ByteSet::from_bytes(&bytes);
            prop_assert_eq!(set.len(), distinct.len());
            prop_assert_eq!(set.iter().collect::<Vec<_>>(), distinct);
        }
    }
}
