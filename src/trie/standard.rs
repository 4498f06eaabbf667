//! Pointer trie with one node per consumed byte.
//!
//! Each node exclusively owns its children through a hash map keyed by the
//! edge byte. Nodes are created on first use and never freed by removal,
//! which only clears the terminal flag.
//!
//! ## Performance Characteristics
//!
//! - **Insert/Search**: O(m) hash lookups for a word of length m
//! - **Memory**: highest of the three engines; one heap node per byte
//! - **Removal**: O(m), leaves dangling nodes behind

use std::mem;

use rustc_hash::FxHashMap;

use super::PrefixTrie;

/// A node of a [`StandardTrie`].
#[derive(Debug, Default)]
pub struct StandardNode {
    children: FxHashMap<u8, Box<StandardNode>>,
    is_word: bool,
}

impl StandardNode {
    /// True if a stored word ends at this node.
    #[inline]
    pub fn is_word(&self) -> bool {
        self.is_word
    }

    /// The child reached through `byte`, if any.
    #[inline]
    pub fn child(&self, byte: u8) -> Option<&StandardNode> {
        self.children.get(&byte).map(Box::as_ref)
    }

    /// Iterate over `(byte, child)` edges in hash-map order.
    pub fn children(&self) -> impl Iterator<Item = (u8, &StandardNode)> + '_ {
        self.children.iter().map(|(&byte, child)| (byte, child.as_ref()))
    }

    /// Number of outgoing edges.
    #[inline]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Per-node cost: the node itself plus one map entry per child.
    fn footprint(&self) -> usize {
        mem::size_of::<StandardNode>()
            + self.children.len() * (mem::size_of::<u8>() + mem::size_of::<Box<StandardNode>>())
    }
}

/// A pointer-based trie over byte edges.
///
/// # Example
///
/// ```
/// use prefix_tries::prelude::*;
///
/// let mut trie = StandardTrie::new();
/// trie.insert("apple");
/// trie.insert("apply");
///
/// assert!(trie.search("apple"));
/// assert!(!trie.search("app"));
/// assert!(trie.starts_with("app"));
/// ```
#[derive(Debug)]
pub struct StandardTrie {
    root: StandardNode,
    word_count: usize,
    node_count: usize,
}

impl StandardTrie {
    /// Create an empty trie holding only the root node.
    pub fn new() -> Self {
        StandardTrie {
            root: StandardNode::default(),
            word_count: 0,
            node_count: 1,
        }
    }

    /// The root node, for read-only inspection.
    pub fn root(&self) -> &StandardNode {
        &self.root
    }

    /// Walk the path spelled by `bytes`.
    fn find(&self, bytes: &[u8]) -> Option<&StandardNode> {
        bytes
            .iter()
            .try_fold(&self.root, |node, byte| node.child(*byte))
    }

    fn find_mut(&mut self, bytes: &[u8]) -> Option<&mut StandardNode> {
        let mut node = &mut self.root;
        for byte in bytes {
            node = node.children.get_mut(byte)?.as_mut();
        }
        Some(node)
    }
}

// Long chains would otherwise be dropped recursively.
impl Drop for StandardTrie {
    fn drop(&mut self) {
        let mut stack: Vec<Box<StandardNode>> =
            self.root.children.drain().map(|(_, child)| child).collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.children.drain().map(|(_, child)| child));
        }
    }
}

impl Default for StandardTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefixTrie for StandardTrie {
    fn insert<W: AsRef<[u8]>>(&mut self, word: W) -> bool {
        let bytes = word.as_ref();
        if bytes.is_empty() {
            return false;
        }

        let mut created = 0;
        let mut node = &mut self.root;
        for &byte in bytes {
            node = node
                .children
                .entry(byte)
                .or_insert_with(|| {
                    created += 1;
                    Box::default()
                })
                .as_mut();
        }
        self.node_count += created;

        if node.is_word {
            false
        } else {
            node.is_word = true;
            self.word_count += 1;
            true
        }
    }

    fn search<W: AsRef<[u8]>>(&self, word: W) -> bool {
        let bytes = word.as_ref();
        !bytes.is_empty() && self.find(bytes).is_some_and(StandardNode::is_word)
    }

    fn starts_with<P: AsRef<[u8]>>(&self, prefix: P) -> bool {
        self.find(prefix.as_ref()).is_some()
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
            stack.extend(node.children.values().map(Box::as_ref));
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
        // (node, path length at its parent, edge byte)
        let mut stack: Vec<(&StandardNode, usize, u8)> = self
            .root
            .children()
            .map(|(byte, child)| (child, 0, byte))
            .collect();

        while let Some((node, depth, byte)) = stack.pop() {
            path.truncate(depth);
            path.push(byte);
            if node.is_word {
                words.push(path.clone());
            }
            let depth = path.len();
            stack.extend(node.children().map(|(byte, child)| (child, depth, byte)));
        }

        words
    }
}
