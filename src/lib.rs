//! Suffix tree construction and substring search. Usage is very simple:
//!
//! ```rust
//! use suffix_tree::SuffixTree;
//!
//! let tree = SuffixTree::new("cacao").unwrap();
//! assert!(tree.is_match("ca"));
//! let mut positions: Vec<usize> = tree.matches("ca").collect();
//! positions.sort();
//! assert_eq!(positions, vec![0, 2]);
//! ```
//!
//! The tree is built online with Ukkonen's algorithm in O(n) time and
//! space, over the text's bytes plus a terminating `$` sentinel. Queries
//! walk down from the root and enumerate occurrences lazily, so matching
//! costs O(pattern + occurrences).
//!
//! There is a command line utility included in this repository called
//! `stree` that will write a suffix tree in GraphViz's `dot` format. From
//! there, it's very easy to visualize it:
//!
//! ```ignore
//! stree "banana" | dot -Tpng > banana.png
//! ```
//!
//! A naive quadratic builder (`SuffixTree::new_naive`) is kept as a test
//! oracle and produces a structurally identical tree.

use thiserror::Error as ThisError;

mod naive;
mod navigate;
mod tree;
mod ukkonen;

pub use crate::navigate::Matches;
pub use crate::tree::{Children, NodeId, Preorder, SuffixTree, SENTINEL};

/// Errors from suffix tree construction.
///
/// Queries never error: an absent pattern is an ordinary outcome reported
/// as `false` or an empty iterator.
#[derive(Debug, ThisError)]
pub enum Error {
    /// The input text cannot be indexed: it is empty or already contains
    /// the reserved sentinel byte. Recoverable by fixing the input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The text is too large for the `u32`-indexed node arena. Fatal for
    /// this input; no partial tree is returned.
    #[error("node arena exhausted: text too large to index")]
    ArenaExhausted,

    /// A construction invariant failed. This is a bug in the builder, not
    /// bad input, and construction aborts rather than continue with a
    /// corrupted tree.
    #[error("construction invariant violated: {0}")]
    InvariantViolation(&'static str),
}

impl Error {
    pub(crate) fn invariant(what: &'static str) -> Error {
        Error::InvariantViolation(what)
    }

    pub(crate) fn invalid<S: Into<String>>(what: S) -> Error {
        Error::InvalidInput(what.into())
    }
}
