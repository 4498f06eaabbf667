//! Trie factory for creating any of the engines behind one type.
//!
//! The engines are generic over their word type, so they cannot be boxed as
//! `dyn PrefixTrie`. [`TrieContainer`] is the closed-set alternative: one
//! variant per engine, each forwarding to the concrete implementation.
//!
//! # Example
//!
//! ```
//! use prefix_tries::prelude::*;
//!
//! for backend in TrieFactory::available_backends() {
//!     let trie = TrieFactory::create(backend, ["test", "testing", "tested"]);
//!     assert_eq!(trie.backend(), backend);
//!     assert_eq!(trie.len(), 3);
//!     assert!(trie.search("testing"));
//!     assert!(trie.starts_with("tes"));
//! }
//! ```

use std::fmt;
use std::str::FromStr;

use super::compressed::CompressedTrie;
use super::double_array::DoubleArrayTrie;
use super::standard::StandardTrie;
use super::PrefixTrie;
use crate::error::TrieError;

/// Trie engine types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum TrieBackend {
    /// Pointer trie, one node per byte
    Standard,
    /// Radix trie with multi-byte edge labels
    Compressed,
    /// BASE/CHECK arrays, no node objects
    #[cfg_attr(feature = "cli", value(alias = "dat"))]
    DoubleArray,
}

impl fmt::Display for TrieBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrieBackend::Standard => write!(f, "Standard Trie"),
            TrieBackend::Compressed => write!(f, "Compressed Trie"),
            TrieBackend::DoubleArray => write!(f, "Double-Array Trie"),
        }
    }
}

impl FromStr for TrieBackend {
    type Err = TrieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" | "standard trie" | "std" => Ok(Self::Standard),
            "compressed" | "compressed trie" | "radix" => Ok(Self::Compressed),
            "double-array" | "double-array trie" | "doublearray" | "dat" => {
                Ok(Self::DoubleArray)
            }
            _ => Err(TrieError::UnknownBackend { name: s.to_owned() }),
        }
    }
}

/// Unified container that can hold any engine
#[derive(Debug)]
pub enum TrieContainer {
    /// Pointer trie
    Standard(StandardTrie),
    /// Radix trie
    Compressed(CompressedTrie),
    /// Double-array trie
    DoubleArray(DoubleArrayTrie),
}

macro_rules! dispatch {
    ($self:ident, $trie:ident => $body:expr) => {
        match $self {
            TrieContainer::Standard($trie) => $body,
            TrieContainer::Compressed($trie) => $body,
            TrieContainer::DoubleArray($trie) => $body,
        }
    };
}

impl TrieContainer {
    /// Get the backend type of this container
    pub fn backend(&self) -> TrieBackend {
        match self {
            TrieContainer::Standard(_) => TrieBackend::Standard,
            TrieContainer::Compressed(_) => TrieBackend::Compressed,
            TrieContainer::DoubleArray(_) => TrieBackend::DoubleArray,
        }
    }

    /// Insert a word; `true` if newly added.
    pub fn insert<W: AsRef<[u8]>>(&mut self, word: W) -> bool {
        dispatch!(self, t => t.insert(word))
    }

    /// Check if a word is stored.
    pub fn search<W: AsRef<[u8]>>(&self, word: W) -> bool {
        dispatch!(self, t => t.search(word))
    }

    /// Check if some stored path spells `prefix`.
    pub fn starts_with<P: AsRef<[u8]>>(&self, prefix: P) -> bool {
        dispatch!(self, t => t.starts_with(prefix))
    }

    /// Unmark a word; `true` if it was present.
    pub fn remove<W: AsRef<[u8]>>(&mut self, word: W) -> bool {
        dispatch!(self, t => t.remove(word))
    }

    /// Estimated bytes of structural overhead.
    pub fn memory_usage(&self) -> usize {
        dispatch!(self, t => t.memory_usage())
    }

    /// Allocated nodes or states.
    pub fn node_count(&self) -> usize {
        dispatch!(self, t => t.node_count())
    }

    /// Number of stored words.
    pub fn len(&self) -> usize {
        dispatch!(self, t => t.len())
    }

    /// Check if the trie holds no words.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reset to the initial empty configuration.
    pub fn clear(&mut self) {
        dispatch!(self, t => t.clear())
    }

    /// All stored words, order unspecified.
    pub fn words(&self) -> Vec<Vec<u8>> {
        dispatch!(self, t => t.words())
    }

    /// Insert every word; returns how many were newly added.
    pub fn extend_words<I, W>(&mut self, words: I) -> usize
    where
        I: IntoIterator<Item = W>,
        W: AsRef<[u8]>,
    {
        dispatch!(self, t => t.extend_words(words))
    }
}

/// Factory for creating tries with different engines
pub struct TrieFactory;

impl TrieFactory {
    /// Create a trie with the specified engine, filled with `words`.
    pub fn create<I, W>(backend: TrieBackend, words: I) -> TrieContainer
    where
        I: IntoIterator<Item = W>,
        W: AsRef<[u8]>,
    {
        let mut trie = Self::empty(backend);
        trie.extend_words(words);
        trie
    }

    /// Create an empty trie with the specified engine.
    pub fn empty(backend: TrieBackend) -> TrieContainer {
        match backend {
            TrieBackend::Standard => TrieContainer::Standard(StandardTrie::new()),
            TrieBackend::Compressed => TrieContainer::Compressed(CompressedTrie::new()),
            TrieBackend::DoubleArray => TrieContainer::DoubleArray(DoubleArrayTrie::new()),
        }
    }

    /// Get a list of all available engines
    pub fn available_backends() -> Vec<TrieBackend> {
        vec![
            TrieBackend::Standard,
            TrieBackend::Compressed,
            TrieBackend::DoubleArray,
        ]
    }

    /// Get a description of an engine's characteristics
    pub fn backend_description(backend: TrieBackend) -> &'static str {
        match backend {
            TrieBackend::Standard => {
                "One heap node per byte. Simplest, highest memory per word."
            }
            TrieBackend::Compressed => {
                "Single-child chains collapse into labelled edges. Fewer nodes on sparse keys."
            }
            TrieBackend::DoubleArray => {
                "Flat BASE/CHECK arrays with O(1) transitions. Slower to build, compact to query."
            }
        }
    }
}
