// SPDX-License-Identifier: MIT

//! Pattern parsing and matching over a [`Trie`](crate::Trie).
//!
//! Implements a small regex-like language in which every element consumes
//! exactly one byte of a key. Matching walks the trie directly instead of
//! testing keys one by one.
//!
//! # Pattern Syntax
//!
//! ```text
//! *             — Match any single byte
//! [abc]         — Match any byte among a, b, c
//! [^abc]        — Match any byte not among a, b, c
//! {name}        — Capture: first use matches any byte and binds it,
//!                 later uses must repeat the bound byte
//! {name[abc]}   — Capture whose first use only binds a, b or c
//! {name[^abc]}  — Capture whose first use only binds bytes other than a, b, c
//! \x            — Literal x, for x in * ^ [ ] { }
//! ```
//!
//! Any other byte matches itself.

pub mod executor;
pub mod parser;
