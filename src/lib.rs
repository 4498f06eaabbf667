//! # prefix-tries
//!
//! Three prefix-search engines behind one contract, plus a harness that
//! measures their space/time tradeoffs.
//!
//! - [`StandardTrie`](trie::StandardTrie): pointer trie, one node per byte.
//! - [`CompressedTrie`](trie::CompressedTrie): radix trie, single-child
//!   chains collapse into labelled edges.
//! - [`DoubleArrayTrie`](trie::DoubleArrayTrie): BASE/CHECK arrays with O(1)
//!   transitions.
//!
//! All of them implement [`PrefixTrie`](trie::PrefixTrie) over byte strings.
//!
//! ## Example
//!
//! ```
//! use prefix_tries::prelude::*;
//!
//! let words = ["apple", "application", "apply", "banana", "band"];
//!
//! let standard = StandardTrie::from_words(words);
//! let compressed = CompressedTrie::from_words(words);
//! let double_array = DoubleArrayTrie::from_words(words);
//!
//! assert!(standard.search("apple") && compressed.search("apple") && double_array.search("apple"));
//! assert!(!double_array.search("app"));
//! assert!(double_array.starts_with("app"));
//! assert!(compressed.node_count() < standard.node_count());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod benchmark;
pub mod error;
pub mod trie;
pub mod workload;

/// CLI interface for the benchmark driver
#[cfg(feature = "cli")]
pub mod cli;

/// Common imports for convenient usage
pub mod prelude {
    pub use crate::error::{Result, TrieError};
    pub use crate::trie::compressed::CompressedNode;
    pub use crate::trie::standard::StandardNode;
    pub use crate::trie::{
        CompressedTrie, DoubleArrayTrie, DoubleArrayTrieConfig, PrefixTrie, StandardTrie,
        TrieBackend, TrieContainer, TrieFactory,
    };
}
