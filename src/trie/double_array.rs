//! Double-Array Trie (DAT) built lazily, one word at a time.
//!
//! A Double-Array Trie stores a deterministic automaton over byte edges in two
//! parallel arrays, BASE and CHECK, plus a USED bitmap. There are no node
//! objects: a state is just an index.
//!
//! ## Transition Function
//!
//! ```text
//! next_state = offset(BASE[state]) + byte
//! if CHECK[next_state] == state:
//!     transition is valid
//! ```
//!
//! A negative BASE marks a terminal state; its true offset is `-BASE - 1`.
//! State 0 is the root and is pre-allocated with `BASE[0] = 1`.
//!
//! ## Construction
//!
//! When a state needs a new outgoing byte, the bytes of all its existing
//! children plus the new one are placed with a first-fit scan for an offset
//! where every required slot is free or already owned by that state. If the
//! offset changes, every existing child is moved in one step and the checks
//! of its own children are repointed before the new transition is written.
//! Storage is grown before any slot is touched, so a failed allocation leaves
//! the trie exactly as it was.
//!
//! ## Performance Characteristics
//!
//! - **Memory**: 9 bytes per slot (BASE: 4, CHECK: 4, USED: 1)
//! - **Transitions**: O(1), a single array lookup
//! - **Construction**: first-fit placement is O(slots) per new branch
//! - **Removal**: shallow, the state stays allocated

use std::mem;

use smallvec::SmallVec;

use super::PrefixTrie;
use crate::error::{Result, TrieError};

/// Marker for an unused BASE or CHECK entry.
pub const EMPTY: i32 = -1;

/// The root state.
pub const ROOT: usize = 0;

/// Child bytes of a single state. Most states have only a handful.
type ChildBytes = SmallVec<[u8; 8]>;

/// Configuration for a [`DoubleArrayTrie`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoubleArrayTrieConfig {
    /// Slots allocated up front and after every [`clear`](PrefixTrie::clear).
    pub initial_size: usize,
    /// Extra slots added past the highest required index when growing.
    pub growth_increment: usize,
    /// BASE given to a freshly claimed state until it gets children.
    /// Negative values are treated as 0.
    pub default_base: i32,
}

impl Default for DoubleArrayTrieConfig {
    fn default() -> Self {
        Self {
            initial_size: 10_000,
            growth_increment: 1_000,
            default_base: 1,
        }
    }
}

impl DoubleArrayTrieConfig {
    /// Set the number of pre-allocated slots (at least 1, for the root).
    pub fn with_initial_size(mut self, initial_size: usize) -> Self {
        self.initial_size = initial_size.max(1);
        self
    }

    /// Set the growth increment.
    pub fn with_growth_increment(mut self, growth_increment: usize) -> Self {
        self.growth_increment = growth_increment;
        self
    }
}

/// A child being moved to a new offset.
struct Relocation {
    byte: u8,
    from: usize,
    base: i32,
    grandchildren: ChildBytes,
}

/// A Double-Array Trie over byte strings.
///
/// # Example
///
/// ```
/// use prefix_tries::prelude::*;
///
/// let mut dat = DoubleArrayTrie::new();
/// dat.insert("a");
/// dat.insert("ab");
/// dat.insert("ac");
///
/// let a = dat.transition(0, b'a').unwrap();
/// let b = dat.transition(a, b'b').unwrap();
/// let c = dat.transition(a, b'c').unwrap();
/// assert_ne!(b, c);
/// assert_eq!(dat.parent(b), Some(a));
/// assert_eq!(dat.parent(c), Some(a));
/// assert!(dat.search("a") && dat.search("ab") && dat.search("ac"));
/// ```
#[derive(Clone, Debug)]
pub struct DoubleArrayTrie {
    /// BASE array: child offset, negated-minus-one for terminal states
    base: Vec<i32>,

    /// CHECK array: parent state owning the slot
    check: Vec<i32>,

    /// Slots currently owned by a state
    used: Vec<bool>,

    /// Terminal states currently set
    word_count: usize,

    /// Highest slot index ever written
    max_state: usize,

    config: DoubleArrayTrieConfig,
}

#[inline]
fn decode(base: i32) -> usize {
    if base < 0 {
        (-(base + 1)) as usize
    } else {
        base as usize
    }
}

impl DoubleArrayTrie {
    /// Create an empty trie with the default configuration.
    pub fn new() -> Self {
        Self::with_config(DoubleArrayTrieConfig::default())
    }

    /// Create an empty trie with the given configuration.
    pub fn with_config(mut config: DoubleArrayTrieConfig) -> Self {
        config.default_base = config.default_base.max(0);
        let size = config.initial_size.max(1);
        let mut trie = DoubleArrayTrie {
            base: vec![EMPTY; size],
            check: vec![EMPTY; size],
            used: vec![false; size],
            word_count: 0,
            max_state: ROOT,
            config,
        };
        trie.base[ROOT] = 1;
        trie.used[ROOT] = true;
        trie
    }

    /// The configuration this trie was created with.
    pub fn config(&self) -> &DoubleArrayTrieConfig {
        &self.config
    }

    /// Number of allocated slots.
    pub fn array_size(&self) -> usize {
        self.base.len()
    }

    /// Highest slot index ever written.
    pub fn max_state(&self) -> usize {
        self.max_state
    }

    /// Fraction of allocated slots that are in use.
    pub fn space_efficiency(&self) -> f64 {
        if self.used.is_empty() {
            return 0.0;
        }
        let used = self.used.iter().filter(|&&u| u).count();
        used as f64 / self.used.len() as f64
    }

    /// Child offset of `state`, with any terminal encoding removed.
    #[inline]
    pub fn offset(&self, state: usize) -> usize {
        decode(self.base[state])
    }

    /// True if `state` ends a stored word.
    #[inline]
    pub fn is_terminal(&self, state: usize) -> bool {
        self.base.get(state).is_some_and(|&b| b < 0)
    }

    /// The state owning `slot`, or `None` for the root and free slots.
    pub fn parent(&self, slot: usize) -> Option<usize> {
        match self.check.get(slot) {
            Some(&owner) if owner >= 0 && self.used[slot] => Some(owner as usize),
            _ => None,
        }
    }

    /// Follow the edge labelled `byte` out of `state`.
    #[inline]
    pub fn transition(&self, state: usize, byte: u8) -> Option<usize> {
        if state >= self.base.len() || !self.used[state] {
            return None;
        }
        let target = self.offset(state) + byte as usize;
        (target < self.check.len() && self.check[target] == state as i32).then_some(target)
    }

    /// Outgoing `(byte, state)` edges of `state` in byte order.
    pub fn children(&self, state: usize) -> SmallVec<[(u8, usize); 8]> {
        if state >= self.base.len() || !self.used[state] {
            return SmallVec::new();
        }
        let offset = self.offset(state);
        (0..=u8::MAX)
            .filter_map(|byte| {
                let target = offset + byte as usize;
                (target < self.check.len() && self.check[target] == state as i32)
                    .then_some((byte, target))
            })
            .collect()
    }

    fn child_bytes(&self, state: usize) -> ChildBytes {
        self.children(state).into_iter().map(|(byte, _)| byte).collect()
    }

    /// Final state of the walk along `bytes`.
    fn walk(&self, bytes: &[u8]) -> Option<usize> {
        bytes
            .iter()
            .try_fold(ROOT, |state, &byte| self.transition(state, byte))
    }

    /// Insert a word, surfacing storage exhaustion instead of aborting.
    ///
    /// Returns `Ok(true)` if the word was newly added. On error the trie is
    /// unchanged apart from transitions completed for earlier bytes, which
    /// stay valid.
    pub fn try_insert<W: AsRef<[u8]>>(&mut self, word: W) -> Result<bool> {
        let bytes = word.as_ref();
        if bytes.is_empty() {
            return Ok(false);
        }

        let mut state = ROOT;
        for &byte in bytes {
            state = match self.transition(state, byte) {
                Some(next) => next,
                None => self.add_transition(state, byte)?,
            };
        }

        let base = self.base[state];
        if base < 0 {
            return Ok(false);
        }
        self.base[state] = -base - 1;
        self.word_count += 1;
        Ok(true)
    }

    /// Create the edge `byte` out of `state`, relocating siblings if needed.
    fn add_transition(&mut self, state: usize, byte: u8) -> Result<usize> {
        let mut bytes = self.child_bytes(state);
        let existing = bytes.len();
        bytes.push(byte);

        let old_offset = self.offset(state);
        let new_offset = self.find_base(state, &bytes);
        let target = new_offset + byte as usize;
        let encoded = i32::try_from(new_offset)
            .map_err(|_| TrieError::CapacityExhausted { requested: new_offset })?;

        // Grow first: nothing below this point can fail.
        let highest = new_offset + bytes.iter().copied().max().unwrap_or(byte) as usize;
        self.ensure_capacity(highest + 1)?;

        if new_offset != old_offset && existing > 0 {
            self.relocate(state, old_offset, new_offset, &bytes[..existing]);
        }
        self.set_offset(state, encoded);

        debug_assert!(!self.used[target], "claiming an owned slot");
        self.check[target] = state as i32;
        self.used[target] = true;
        self.base[target] = self.config.default_base;
        self.max_state = self.max_state.max(target);

        Ok(target)
    }

    /// First offset, scanning up from 1, at which every byte in `bytes` lands
    /// on a slot that is beyond the arrays, free, or already owned by `state`.
    fn find_base(&self, state: usize, bytes: &[u8]) -> usize {
        let size = self.base.len();
        let owner = state as i32;
        let base = (1..size)
            .find(|&base| {
                bytes.iter().all(|&byte| {
                    let slot = base + byte as usize;
                    slot >= size || !self.used[slot] || self.check[slot] == owner
                })
            })
            .unwrap_or(size);
        tracing::trace!(state, base, children = bytes.len(), "placed children");
        base
    }

    /// Move every child of `state` from `old_offset` to `new_offset`.
    ///
    /// All children are captured before any slot is written, since source
    /// and destination slots of different children may coincide. Capacity
    /// for every destination must already be reserved.
    fn relocate(&mut self, state: usize, old_offset: usize, new_offset: usize, bytes: &[u8]) {
        tracing::debug!(state, old_offset, new_offset, moved = bytes.len(), "relocating children");

        let moves: SmallVec<[Relocation; 8]> = bytes
            .iter()
            .map(|&byte| {
                let from = old_offset + byte as usize;
                Relocation {
                    byte,
                    from,
                    base: self.base[from],
                    grandchildren: self.child_bytes(from),
                }
            })
            .collect();

        for relocation in &moves {
            self.base[relocation.from] = EMPTY;
            self.check[relocation.from] = EMPTY;
            self.used[relocation.from] = false;
        }

        for relocation in &moves {
            let to = new_offset + relocation.byte as usize;
            self.base[to] = relocation.base;
            self.check[to] = state as i32;
            self.used[to] = true;
            self.max_state = self.max_state.max(to);

            let child_offset = decode(relocation.base);
            for &grandchild in &relocation.grandchildren {
                self.check[child_offset + grandchild as usize] = to as i32;
            }
        }
    }

    /// Rewrite the offset of `state`, keeping its terminal mark.
    fn set_offset(&mut self, state: usize, offset: i32) {
        self.base[state] = if self.base[state] < 0 {
            -offset - 1
        } else {
            offset
        };
    }

    /// Grow all three arrays so that index `required - 1` exists.
    ///
    /// Either every array grows or none does.
    fn ensure_capacity(&mut self, required: usize) -> Result<()> {
        let len = self.base.len();
        if required <= len {
            return Ok(());
        }

        let new_len = required
            .checked_add(self.config.growth_increment)
            .filter(|&n| n <= i32::MAX as usize)
            .ok_or(TrieError::CapacityExhausted { requested: required })?;
        let extra = new_len - len;
        let exhausted = |_| TrieError::CapacityExhausted { requested: new_len };

        self.base.try_reserve_exact(extra).map_err(exhausted)?;
        self.check.try_reserve_exact(extra).map_err(exhausted)?;
        self.used.try_reserve_exact(extra).map_err(exhausted)?;

        self.base.resize(new_len, EMPTY);
        self.check.resize(new_len, EMPTY);
        self.used.resize(new_len, false);
        tracing::debug!(from = len, to = new_len, "grew double-array storage");
        Ok(())
    }

    /// Trim storage to `max_state + 1` slots.
    ///
    /// Intended for when no more insertions are expected; later insertions
    /// still work and grow the arrays again.
    pub fn compact(&mut self) {
        let new_len = self.max_state + 1;
        if new_len >= self.base.len() {
            return;
        }
        tracing::debug!(from = self.base.len(), to = new_len, "compacting double-array storage");
        self.base.truncate(new_len);
        self.check.truncate(new_len);
        self.used.truncate(new_len);
        self.base.shrink_to_fit();
        self.check.shrink_to_fit();
        self.used.shrink_to_fit();
    }

    /// Verify the BASE/CHECK/USED invariants.
    ///
    /// Every used slot other than the root must be owned by a used parent
    /// that reaches it through one of its 256 possible edges, and a slot is
    /// used exactly when its CHECK names an owner. Failures indicate a
    /// construction bug.
    pub fn validate(&self) -> Result<()> {
        let len = self.base.len();
        if self.check.len() != len || self.used.len() != len {
            return Err(TrieError::InvariantViolation {
                slot: len,
                reason: "array lengths differ",
            });
        }
        if !self.used.get(ROOT).copied().unwrap_or(false) {
            return Err(TrieError::InvariantViolation {
                slot: ROOT,
                reason: "root is not allocated",
            });
        }

        for slot in 1..len {
            let owner = self.check[slot];
            if self.used[slot] != (owner != EMPTY) {
                return Err(TrieError::InvariantViolation {
                    slot,
                    reason: "used flag disagrees with check",
                });
            }
            if !self.used[slot] {
                continue;
            }
            let parent = owner as usize;
            if owner < 0 || parent >= len || !self.used[parent] {
                return Err(TrieError::InvariantViolation {
                    slot,
                    reason: "owner is not an allocated state",
                });
            }
            let offset = self.offset(parent);
            if slot < offset || slot - offset > u8::MAX as usize {
                return Err(TrieError::InvariantViolation {
                    slot,
                    reason: "slot is not reachable from its owner",
                });
            }
            if slot > self.max_state {
                return Err(TrieError::InvariantViolation {
                    slot,
                    reason: "used slot beyond max_state",
                });
            }
        }
        Ok(())
    }
}

impl Default for DoubleArrayTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefixTrie for DoubleArrayTrie {
    /// # Panics
    ///
    /// Panics if the arrays cannot grow, as the standard collections do on
    /// allocation failure. Use [`DoubleArrayTrie::try_insert`] to handle that
    /// condition instead.
    fn insert<W: AsRef<[u8]>>(&mut self, word: W) -> bool {
        match self.try_insert(word) {
            Ok(inserted) => inserted,
            Err(err) => panic!("double-array trie insert failed: {err}"),
        }
    }

    fn search<W: AsRef<[u8]>>(&self, word: W) -> bool {
        let bytes = word.as_ref();
        !bytes.is_empty() && self.walk(bytes).is_some_and(|state| self.is_terminal(state))
    }

    fn starts_with<P: AsRef<[u8]>>(&self, prefix: P) -> bool {
        self.walk(prefix.as_ref()).is_some()
    }

    fn remove<W: AsRef<[u8]>>(&mut self, word: W) -> bool {
        let bytes = word.as_ref();
        if bytes.is_empty() {
            return false;
        }
        match self.walk(bytes) {
            Some(state) if self.base[state] < 0 => {
                self.base[state] = -self.base[state] - 1;
                self.word_count -= 1;
                true
            }
            _ => false,
        }
    }

    fn memory_usage(&self) -> usize {
        self.base.len() * mem::size_of::<i32>()
            + self.check.len() * mem::size_of::<i32>()
            + self.used.len() * mem::size_of::<bool>()
    }

    fn node_count(&self) -> usize {
        self.max_state + 1
    }

    fn len(&self) -> usize {
        self.word_count
    }

    fn clear(&mut self) {
        tracing::debug!(slots = self.base.len(), words = self.word_count, "clearing double-array trie");
        *self = Self::with_config(self.config);
    }

    fn words(&self) -> Vec<Vec<u8>> {
        let mut words = Vec::with_capacity(self.word_count);
        let mut path = Vec::new();
        // (state, path length at its parent, edge byte)
        let mut stack: Vec<(usize, usize, u8)> = self
            .children(ROOT)
            .into_iter()
            .map(|(byte, state)| (state, 0, byte))
            .collect();

        while let Some((state, depth, byte)) = stack.pop() {
            path.truncate(depth);
            path.push(byte);
            if self.is_terminal(state) {
                words.push(path.clone());
            }
            let depth = path.len();
            stack.extend(
                self.children(state)
                    .into_iter()
                    .map(|(byte, child)| (child, depth, byte)),
            );
        }

        words
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn small() -> DoubleArrayTrie {
        DoubleArrayTrie::with_config(
            DoubleArrayTrieConfig::default()
                .with_initial_size(16)
                .with_growth_increment(8),
        )
    }

    #[test]
    fn test_empty_dat() {
        let dat = DoubleArrayTrie::new();
        assert!(dat.is_empty());
        assert_eq!(dat.node_count(), 1);
        assert_eq!(dat.array_size(), 10_000);
        assert!(dat.starts_with(""));
        assert!(!dat.search(""));
        assert!(dat.words().is_empty());
        assert_eq!(dat.offset(ROOT), 1);
        dat.validate().unwrap();
    }

    #[test]
    fn test_sibling_slots() {
        let mut dat = DoubleArrayTrie::new();
        dat.insert("a");
        dat.insert("ab");
        dat.insert("ac");

        let a = dat.transition(ROOT, b'a').expect("edge 'a'");
        let offset = dat.offset(a);
        let b = dat.transition(a, b'b').expect("edge 'b'");
        let c = dat.transition(a, b'c').expect("edge 'c'");

        assert_eq!(b, offset + b'b' as usize);
        assert_eq!(c, offset + b'c' as usize);
        assert_ne!(b, c);
        assert_eq!(dat.parent(b), Some(a));
        assert_eq!(dat.parent(c), Some(a));
        assert!(dat.is_terminal(a));
        assert!(dat.search("a"));
        dat.validate().unwrap();
    }

    #[test]
    fn test_terminal_keeps_offset_when_extended() {
        let mut dat = DoubleArrayTrie::new();
        dat.insert("a");
        let a = dat.transition(ROOT, b'a').unwrap();
        let before = dat.offset(a);
        dat.insert("ab");
        assert_eq!(dat.offset(a), before);
        assert!(dat.search("a"));
        assert!(dat.search("ab"));
    }

    #[test]
    fn test_conflict_moves_new_base() {
        // "b" claims slot 1 + 'b'; then 'a' needs a child at 1 + 'b' too.
        let mut dat = DoubleArrayTrie::new();
        dat.insert("b");
        dat.insert("ab");

        let a = dat.transition(ROOT, b'a').unwrap();
        assert_eq!(dat.offset(a), 2);
        assert!(dat.search("b"));
        assert!(dat.search("ab"));
        assert!(!dat.search("a"));
        dat.validate().unwrap();
    }

    #[test]
    fn test_relocation_preserves_subtrees() {
        // 'a' at slot 98 owns slot 99 ("ab") and "abc" sits at 100, which
        // blocks root offsets 1..=3, so root's children move to offset 4 and
        // "ab" must follow its parent.
        let mut dat = DoubleArrayTrie::new();
        dat.insert("a");
        dat.insert("ab");
        dat.insert("abc");
        let old_a = dat.transition(ROOT, b'a').unwrap();

        dat.insert("b");
        let new_a = dat.transition(ROOT, b'a').unwrap();
        assert_ne!(old_a, new_a);
        assert_eq!(dat.offset(ROOT), 4);
        assert_eq!(new_a, 4 + b'a' as usize);

        for word in ["a", "ab", "abc", "b"] {
            assert!(dat.search(word), "lost {word}");
        }
        let ab = dat.transition(new_a, b'b').unwrap();
        assert_eq!(dat.parent(ab), Some(new_a));
        assert!(!dat.used[old_a] || dat.parent(old_a) != Some(ROOT));
        dat.validate().unwrap();
    }

    #[test]
    fn test_relocation_with_overlapping_slots() {
        let mut dat = small();
        let words = ["ab", "b", "ba", "a", "abc", "bab", "c", "ca", "cab", "abd"];
        for word in words {
            dat.insert(word);
            dat.validate().unwrap();
        }
        for word in words {
            assert!(dat.search(word), "lost {word}");
        }
        assert_eq!(dat.len(), words.len());
    }

    #[test]
    fn test_growth_preserves_content() {
        let mut dat = small();
        let words: Vec<String> = (0..200).map(|i| format!("w{i}x{}", i * 7)).collect();
        for word in &words {
            assert!(dat.insert(word));
        }
        assert!(dat.array_size() > 16);
        for word in &words {
            assert!(dat.search(word), "lost {word}");
        }
        dat.validate().unwrap();
    }

    #[test]
    fn test_duplicate_insert() {
        let mut dat = DoubleArrayTrie::new();
        assert!(dat.insert("hello"));
        let size = dat.node_count();
        assert!(!dat.insert("hello"));
        assert_eq!(dat.len(), 1);
        assert_eq!(dat.node_count(), size);
    }

    #[test]
    fn test_remove_is_shallow() {
        let mut dat = DoubleArrayTrie::from_words(["apple", "application", "apply"]);
        let nodes = dat.node_count();
        assert!(dat.remove("apple"));
        assert!(!dat.search("apple"));
        assert!(dat.starts_with("appl"));
        assert!(dat.starts_with("apple"));
        assert!(dat.search("apply"));
        assert_eq!(dat.len(), 2);
        assert_eq!(dat.node_count(), nodes);
        assert!(!dat.remove("apple"));
        assert!(!dat.remove("app"));

        assert!(dat.insert("apple"));
        assert!(dat.search("apple"));
    }

    #[test]
    fn test_compact_trims_tail() {
        let mut dat = DoubleArrayTrie::from_words(["test", "testing", "tested"]);
        let before = dat.memory_usage();
        dat.compact();
        assert_eq!(dat.array_size(), dat.max_state() + 1);
        assert!(dat.memory_usage() < before);
        assert!(dat.space_efficiency() > 0.0);
        for word in ["test", "testing", "tested"] {
            assert!(dat.search(word));
        }
        dat.validate().unwrap();

        assert!(dat.insert("tester"));
        assert!(dat.search("tester"));
        assert!(dat.search("testing"));
        dat.validate().unwrap();
    }

    #[test]
    fn test_space_efficiency() {
        let mut dat = DoubleArrayTrie::new();
        let empty = dat.space_efficiency();
        assert!((empty - 1.0 / 10_000.0).abs() < f64::EPSILON);
        dat.insert("band");
        dat.insert("banana");
        assert!(dat.space_efficiency() > empty);
    }

    #[test]
    fn test_clear_restores_initial_configuration() {
        let mut dat = small();
        dat.extend_words(["x", "xy", "xyz", "q"]);
        dat.clear();
        assert_eq!(dat.array_size(), 16);
        assert_eq!(dat.node_count(), 1);
        assert!(dat.words().is_empty());
        assert!(!dat.search("x"));
        assert_eq!(dat.config().growth_increment, 8);
    }

    #[test]
    fn test_words_round_trip() {
        let input = ["band", "banana", "bandana", "can", "cane", "candy"];
        let dat = DoubleArrayTrie::from_words(input);
        let words: HashSet<Vec<u8>> = dat.words().into_iter().collect();
        let expected: HashSet<Vec<u8>> = input.iter().map(|w| w.as_bytes().to_vec()).collect();
        assert_eq!(words, expected);
    }

    #[test]
    fn test_full_byte_range() {
        let mut dat = small();
        let words: Vec<Vec<u8>> = (0..=u8::MAX).map(|b| vec![b, u8::MAX - b]).collect();
        for word in &words {
            dat.insert(word);
        }
        for word in &words {
            assert!(dat.search(word));
        }
        assert_eq!(dat.children(ROOT).len(), 256);
        dat.validate().unwrap();
    }

    #[test]
    fn test_memory_usage_formula() {
        let dat = small();
        assert_eq!(dat.memory_usage(), 16 * 9);
    }

    #[test]
    fn test_validate_detects_corruption() {
        let mut dat = DoubleArrayTrie::from_words(["ab"]);
        let a = dat.transition(ROOT, b'a').unwrap();
        dat.used[a] = false;
        assert!(matches!(
            dat.validate(),
            Err(TrieError::InvariantViolation { .. })
        ));
    }
}
