//! Error types for trie construction, validation and backend selection.

use thiserror::Error;

/// Errors that can occur while growing or validating a trie, or selecting one.
///
/// Ordinary operations on well-formed input never fail: empty words are
/// no-ops and removing an absent word simply reports `false`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrieError {
    /// The backing arrays could not be grown to the requested number of slots.
    ///
    /// Raised by [`DoubleArrayTrie::try_insert`](crate::trie::double_array::DoubleArrayTrie::try_insert)
    /// when the allocator refuses the reservation or the slot index would no
    /// longer fit the `i32` encoding of the BASE/CHECK arrays.
    #[error("cannot grow trie storage to {requested} slots")]
    CapacityExhausted {
        /// Number of slots that was requested.
        requested: usize,
    },

    /// A structural invariant does not hold.
    ///
    /// Only reported by explicit validation; indicates a construction bug.
    #[error("invariant violated at slot {slot}: {reason}")]
    InvariantViolation {
        /// Slot where the violation was detected.
        slot: usize,
        /// Which invariant failed.
        reason: &'static str,
    },

    /// A backend name did not match any engine.
    #[error("unknown trie backend '{name}' (expected standard, compressed or double-array)")]
    UnknownBackend {
        /// The name that failed to parse.
        name: String,
    },
}

/// A specialized `Result` type for trie operations.
pub type Result<T> = std::result::Result<T, TrieError>;
