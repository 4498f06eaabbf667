//! Prefix-search engines sharing one contract.
//!
//! Three interchangeable implementations of [`PrefixTrie`] expose a
//! space/time tradeoff:
//!
//! - [`StandardTrie`](standard::StandardTrie): one node per byte, children in
//!   a hash map.
//! - [`CompressedTrie`](compressed::CompressedTrie): radix trie whose edges
//!   carry byte runs; single-child chains collapse into one edge.
//! - [`DoubleArrayTrie`](double_array::DoubleArrayTrie): no nodes at all;
//!   states are indices into parallel BASE/CHECK arrays.
//!
//! The engines never share storage and none of them is internally
//! synchronized. Give each thread its own instance or serialize access.

pub mod bytes;
pub mod compressed;
pub mod double_array;
pub mod factory;
pub mod standard;

/// Operation contract every trie engine implements.
///
/// Words are arbitrary byte sequences. The empty word is never stored:
/// inserting or removing it is a no-op and searching for it returns `false`,
/// while the empty prefix is trivially present.
pub trait PrefixTrie: Default {
    /// Insert a word.
    ///
    /// Returns `true` if the word was newly added, `false` if it was already
    /// present or empty.
    fn insert<W: AsRef<[u8]>>(&mut self, word: W) -> bool;

    /// Check if a word was inserted and not removed since.
    fn search<W: AsRef<[u8]>>(&self, word: W) -> bool;

    /// Check if some stored path spells `prefix`.
    fn starts_with<P: AsRef<[u8]>>(&self, prefix: P) -> bool;

    /// Unmark a word.
    ///
    /// Removal is shallow: nodes or states reached only through the removed
    /// word stay allocated. Returns `false` without mutating anything if the
    /// word is absent.
    fn remove<W: AsRef<[u8]>>(&mut self, word: W) -> bool;

    /// Estimated bytes of structural overhead.
    fn memory_usage(&self) -> usize;

    /// Number of allocated nodes (or states), root included.
    fn node_count(&self) -> usize;

    /// Number of words currently stored.
    fn len(&self) -> usize;

    /// Check if no words are stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reset to the initial empty configuration.
    fn clear(&mut self);

    /// All stored words. Order is unspecified.
    fn words(&self) -> Vec<Vec<u8>>;

    /// Insert every word from an iterator.
    ///
    /// Returns the number of words that were newly added.
    fn extend_words<I, W>(&mut self, words: I) -> usize
    where
        I: IntoIterator<Item = W>,
        W: AsRef<[u8]>,
    {
        words
            .into_iter()
            .filter(|word| self.insert(word))
            .count()
    }

    /// Build a new instance from an iterator of words.
    fn from_words<I, W>(words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: AsRef<[u8]>,
    {
        let mut trie = Self::default();
        trie.extend_words(words);
        trie
    }
}

pub use compressed::CompressedTrie;
pub use double_array::{DoubleArrayTrie, DoubleArrayTrieConfig};
pub use factory::{TrieBackend, TrieContainer, TrieFactory};
pub use standard::StandardTrie;
