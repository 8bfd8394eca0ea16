// SPDX-License-Identifier: MIT

//! Value types shared by the trie and the pattern engine.

pub mod byteset;
