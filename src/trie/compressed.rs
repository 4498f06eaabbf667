//! Path-compressed (radix) trie.
//!
//! Every node stores the run of bytes consumed on the edge from its parent.
//! Chains of single-child nodes never exist: a word's unshared tail is
//! stored as one edge, and edges are split only where two words diverge.
//!
//! ## Structure
//!
//! ```text
//! insert "cat"           insert "car"
//!
//!   (root)                 (root)
//!     |                      |
//!   "cat"*                 "ca"
//!                          /   \
//!                       "t"*   "r"*
//! ```
//!
//! Siblings always differ at their first byte, which is also the key under
//! which the parent stores them. Removal is shallow and never re-merges a
//! split edge.

use std::collections::hash_map::Entry;
use std::mem;

use rustc_hash::FxHashMap;

use super::bytes::{common_prefix_len, starts_with_label};
use super::PrefixTrie;

/// Rough per-word byte cost used as the baseline of
/// [`CompressedTrie::compression_ratio`].
const BASELINE_BYTES_PER_WORD: f64 = 50.0;

/// A node of a [`CompressedTrie`].
#[derive(Debug, Default)]
pub struct CompressedNode {
    label: Vec<u8>,
    children: FxHashMap<u8, Box<CompressedNode>>,
    is_word: bool,
}

impl CompressedNode {
    fn leaf(label: &[u8]) -> Self {
        CompressedNode {
            label: label.to_vec(),
            children: FxHashMap::default(),
            is_word: true,
        }
    }

    /// Bytes consumed on the edge from the parent. Empty only for the root.
    #[inline]
    pub fn label(&self) -> &[u8] {
        &self.label
    }

    /// True if a stored word ends at this node.
    #[inline]
    pub fn is_word(&self) -> bool {
        self.is_word
    }

    /// The child whose label starts with `byte`, if any.
    #[inline]
    pub fn child(&self, byte: u8) -> Option<&CompressedNode> {
        self.children.get(&byte).map(Box::as_ref)
    }

    /// Iterate over children in hash-map order.
    pub fn children(&self) -> impl Iterator<Item = &CompressedNode> + '_ {
        self.children.values().map(Box::as_ref)
    }

    /// Number of outgoing edges.
    #[inline]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Split this node's label at `at`.
    ///
    /// The node keeps `label[..at]` and becomes a non-terminal node with a
    /// single child. That child takes the suffix together with the original
    /// terminal flag and every original child.
    fn split(&mut self, at: usize) {
        debug_assert!(at > 0 && at < self.label.len());
        let suffix = self.label.split_off(at);
        self.label.shrink_to_fit();

        let key = suffix[0];
        let tail = CompressedNode {
            label: suffix,
            children: mem::take(&mut self.children),
            is_word: mem::replace(&mut self.is_word, false),
        };
        self.children.insert(key, Box::new(tail));
    }

    fn footprint(&self) -> usize {
        mem::size_of::<CompressedNode>()
            + self.label.capacity()
            + self.children.len()
                * (mem::size_of::<u8>() + mem::size_of::<Box<CompressedNode>>())
    }
}

/// A radix trie over byte strings.
///
/// # Example
///
/// ```
/// use prefix_tries::prelude::*;
///
/// let mut trie = CompressedTrie::new();
/// trie.insert("cat");
/// trie.insert("car");
///
/// let ca = trie.root().child(b'c').unwrap();
/// assert_eq!(ca.label(), b"ca");
/// assert_eq!(ca.child_count(), 2);
/// assert!(trie.starts_with("ca"));
/// assert!(!trie.search("ca"));
/// ```
#[derive(Debug)]
pub struct CompressedTrie {
    root: CompressedNode,
    word_count: usize,
    node_count: usize,
}

impl CompressedTrie {
    /// Create an empty trie holding only the root node.
    pub fn new() -> Self {
        CompressedTrie {
            root: CompressedNode::default(),
            word_count: 0,
            node_count: 1,
        }
    }

    /// The root node, for read-only inspection.
    pub fn root(&self) -> &CompressedNode {
        &self.root
    }

    /// Memory footprint relative to a flat baseline of 50 bytes per word.
    ///
    /// This is a rough indicator only; returns 0.0 for an empty trie.
    pub fn compression_ratio(&self) -> f64 {
        if self.word_count == 0 {
            return 0.0;
        }
        self.memory_usage() as f64 / (self.word_count as f64 * BASELINE_BYTES_PER_WORD)
    }

    /// Walk whole edge labels along `bytes` and return the node reached.
    fn find_mut(&mut self, bytes: &[u8]) -> Option<&mut CompressedNode> {
        let mut node = &mut self.root;
        let mut rest = bytes;
        while let Some(&first) = rest.first() {
            let child = node.children.get_mut(&first)?.as_mut();
            if !starts_with_label(rest, &child.label) {
                return None;
            }
            rest = &rest[child.label.len()..];
            node = child;
        }
        Some(node)
    }
}

impl Drop for CompressedTrie {
    fn drop(&mut self) {
        let mut stack: Vec<Box<CompressedNode>> =
            self.root.children.drain().map(|(_, child)| child).collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.children.drain().map(|(_, child)| child));
        }
    }
}

impl Default for CompressedTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefixTrie for CompressedTrie {
    fn insert<W: AsRef<[u8]>>(&mut self, word: W) -> bool {
        let bytes = word.as_ref();
        if bytes.is_empty() {
            return false;
        }

        let mut node = &mut self.root;
        let mut rest = bytes;

        loop {
            let child = match node.children.entry(rest[0]) {
                Entry::Vacant(slot) => {
                    slot.insert(Box::new(CompressedNode::leaf(rest)));
                    self.node_count += 1;
                    self.word_count += 1;
                    return true;
                }
                Entry::Occupied(slot) => slot.into_mut().as_mut(),
            };

            // Keys are first label bytes, so at least one byte matches.
            let matched = common_prefix_len(rest, &child.label);
            if matched < child.label.len() {
                tracing::trace!(at = matched, label_len = child.label.len(), "splitting edge");
                child.split(matched);
                self.node_count += 1;
            }

            if matched == rest.len() {
                if child.is_word {
                    return false;
                }
                child.is_word = true;
                self.word_count += 1;
                return true;
            }

            rest = &rest[matched..];
            node = child;
        }
    }

    fn search<W: AsRef<[u8]>>(&self, word: W) -> bool {
        let mut node = &self.root;
        let mut rest = word.as_ref();

        while let Some(&first) = rest.first() {
            let Some(child) = node.child(first) else {
                return false;
            };
            if !starts_with_label(rest, &child.label) {
                return false;
            }
            rest = &rest[child.label.len()..];
            node = child;
        }

        node.is_word
    }

    fn starts_with<P: AsRef<[u8]>>(&self, prefix: P) -> bool {
        let mut node = &self.root;
        let mut rest = prefix.as_ref();

        while let Some(&first) = rest.first() {
            let Some(child) = node.child(first) else {
                return false;
            };
            let overlap = rest.len().min(child.label.len());
            if rest[..overlap] != child.label[..overlap] {
                return false;
            }
            if rest.len() <= child.label.len() {
                return true;
            }
            rest = &rest[child.label.len()..];
            node = child;
        }

        true
    }

    fn remove<W: AsRef<[u8]>>(&mut self, word: W) -> bool {
        let bytes = word.as_ref();
        if bytes.is_empty() {
            return false;
        }
        match self.find_mut(bytes) {
            Some(node) if node.is_word => {
                node.is_word = false;
                self.word_count -= 1;
                true
            }
            _ => false,
        }
    }

    fn memory_usage(&self) -> usize {
        let mut total = 0;
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            total += node.footprint();
            stack.extend(node.children());
        }
        total
    }

    fn node_count(&self) -> usize {
        self.node_count
    }

    fn len(&self) -> usize {
        self.word_count
    }

    fn clear(&mut self) {
        *self = Self::new();
    }

    fn words(&self) -> Vec<Vec<u8>> {
        let mut words = Vec::with_capacity(self.word_count);
        let mut path = Vec::new();
        // (node, path length at its parent)
        let mut stack: Vec<(&CompressedNode, usize)> =
            self.root.children().map(|child| (child, 0)).collect();

        while let Some((node, depth)) = stack.pop() {
            path.truncate(depth);
            path.extend_from_slice(&node.label);
            if node.is_word {
                words.push(path.clone());
            }
            let depth = path.len();
            stack.extend(node.children().map(|child| (child, depth)));
        }

        words
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Every child is keyed by its first label byte, no label is empty, and
    /// without removals every inner node either ends a word or branches.
    fn assert_well_formed(trie: &CompressedTrie) {
        let mut stack = vec![&trie.root];
        while let Some(node) = stack.pop() {
            for (&key, child) in &node.children {
                assert!(!child.label.is_empty(), "empty edge label");
                assert_eq!(key, child.label[0], "child keyed by wrong byte");
                assert!(
                    child.is_word || child.children.len() >= 2,
                    "non-branching inner node {:?}",
                    child.label
                );
                stack.push(child);
            }
        }
    }

    #[test]
    fn test_split_on_divergence() {
        let mut trie = CompressedTrie::new();
        trie.insert("cat");
        trie.insert("car");

        assert_eq!(trie.root().child_count(), 1);
        let ca = trie.root().child(b'c').expect("edge 'c'");
        assert_eq!(ca.label(), b"ca");
        assert!(!ca.is_word());
        assert_eq!(ca.child_count(), 2);

        let t = ca.child(b't').expect("edge 't'");
        let r = ca.child(b'r').expect("edge 'r'");
        assert_eq!(t.label(), b"t");
        assert_eq!(r.label(), b"r");
        assert!(t.is_word() && r.is_word());
        assert_eq!(trie.node_count(), 4);
        assert_well_formed(&trie);
    }

    #[test]
    fn test_split_inherits_children_and_terminal() {
        let mut trie = CompressedTrie::new();
        trie.insert("testing");
        trie.insert("testings");
        trie.insert("tester");

        let test = trie.root().child(b't').expect("edge 't'");
        assert_eq!(test.label(), b"test");
        let ing = test.child(b'i').expect("edge 'i'");
        assert_eq!(ing.label(), b"ing");
        assert!(ing.is_word());
        assert_eq!(ing.child(b's').map(CompressedNode::label), Some(&b"s"[..]));

        assert!(trie.search("testing"));
        assert!(trie.search("testings"));
        assert!(trie.search("tester"));
        assert!(!trie.search("test"));
        assert_well_formed(&trie);
    }

    #[test]
    fn test_split_point_is_word_end() {
        let mut trie = CompressedTrie::new();
        trie.insert("banana");
        assert!(trie.insert("ban"));

        let ban = trie.root().child(b'b').expect("edge 'b'");
        assert_eq!(ban.label(), b"ban");
        assert!(ban.is_word());
        assert_eq!(ban.child(b'a').map(CompressedNode::label), Some(&b"ana"[..]));
        assert_eq!(trie.len(), 2);
        assert_eq!(trie.node_count(), 3);
    }

    #[test]
    fn test_prefix_of_existing_edge_marks_node() {
        let mut trie = CompressedTrie::from_words(["band", "banana"]);
        let nodes = trie.node_count();
        assert!(trie.insert("ban"));
        assert_eq!(trie.node_count(), nodes);
        assert!(!trie.insert("ban"));
        assert_eq!(trie.len(), 3);
    }

    #[test]
    fn test_search_requires_whole_label() {
        let trie = CompressedTrie::from_words(["application"]);
        assert!(!trie.search("app"));
        assert!(!trie.search("applications"));
        assert!(!trie.search("applicatiom"));
        assert!(trie.search("application"));
    }

    #[test]
    fn test_starts_with_inside_label() {
        let trie = CompressedTrie::from_words(["apple", "application", "apply"]);
        assert!(trie.starts_with(""));
        assert!(trie.starts_with("a"));
        assert!(trie.starts_with("appl"));
        assert!(trie.starts_with("applic"));
        assert!(trie.starts_with("application"));
        assert!(!trie.starts_with("applicationx"));
        assert!(!trie.starts_with("apz"));
    }

    #[test]
    fn test_shallow_remove_keeps_split() {
        let mut trie = CompressedTrie::from_words(["cat", "car"]);
        let nodes = trie.node_count();
        assert!(trie.remove("cat"));
        assert!(!trie.search("cat"));
        assert!(trie.search("car"));
        assert!(trie.starts_with("cat"));
        assert_eq!(trie.node_count(), nodes);
        assert!(!trie.remove("ca"));
        assert!(!trie.remove("cat"));
    }

    #[test]
    fn test_words_round_trip() {
        let input = ["apple", "application", "apply", "banana", "band", "ban"];
        let trie = CompressedTrie::from_words(input);
        let words: HashSet<Vec<u8>> = trie.words().into_iter().collect();
        let expected: HashSet<Vec<u8>> = input.iter().map(|w| w.as_bytes().to_vec()).collect();
        assert_eq!(words, expected);
    }

    #[test]
    fn test_memory_counts_labels() {
        let mut trie = CompressedTrie::new();
        let empty = trie.memory_usage();
        trie.insert("a");
        let short = trie.memory_usage();
        trie.clear();
        trie.insert("a".repeat(64));
        let long = trie.memory_usage();
        assert!(short > empty);
        assert!(long >= short + 63);
    }

    #[test]
    fn test_fewer_nodes_than_standard() {
        use crate::trie::StandardTrie;
        let words = ["internationalization", "internationally", "internet"];
        let compressed = CompressedTrie::from_words(words);
        let standard = StandardTrie::from_words(words);
        assert!(compressed.node_count() < standard.node_count());
        assert!(compressed.memory_usage() < standard.memory_usage());
    }

    #[test]
    fn test_compression_ratio() {
        let mut trie = CompressedTrie::new();
        assert_eq!(trie.compression_ratio(), 0.0);
        trie.insert("hello");
        assert!(trie.compression_ratio() > 0.0);
    }

    #[test]
    fn test_clear() {
        let mut trie = CompressedTrie::from_words(["cat", "car", "dog"]);
        trie.clear();
        assert_eq!(trie.node_count(), 1);
        assert_eq!(trie.len(), 0);
        assert!(trie.words().is_empty());
        assert!(!trie.search("cat"));
        assert!(trie.insert("cat"));
    }
}
