//! Byte comparison primitives shared by the trie engines.
//!
//! All engines operate on raw bytes. A `&str` word is therefore stored as its
//! UTF-8 encoding and multi-byte characters occupy several edges.

/// Length of the longest common prefix of `a` and `b`.
#[inline]
pub fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// True if `query` begins with the whole of `label`.
#[inline]
pub fn starts_with_label(query: &[u8], label: &[u8]) -> bool {
    query.len() >= label.len() && &query[..label.len()] == label
}

/// Render a stored word for reporting.
///
/// Invalid UTF-8 sequences become U+FFFD.
#[inline]
pub fn to_lossy_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
