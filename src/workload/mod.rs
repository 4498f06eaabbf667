//! Benchmark inputs: dictionary files and seeded random words.
//!
//! A [`WordList`] is an ordered, possibly duplicated list of words, exactly
//! as the engines will receive them. [`WordGenerator`] produces synthetic
//! lowercase words and the query sets timed against them.
//!
//! ```
//! use prefix_tries::workload::WordGenerator;
//!
//! let mut gen = WordGenerator::new(42);
//! let words = gen.random_words(100, 5, 15);
//! assert_eq!(words.len(), 100);
//! assert!(words.words().iter().all(|w| (5..=15).contains(&w.len())));
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Alphabet used for generated words.
const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// Length range of generated miss keys, before the suffix.
const MISS_MIN_LEN: usize = 5;
const MISS_MAX_LEN: usize = 15;

/// An ordered list of words to insert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    /// Load a dictionary file with one word per line.
    ///
    /// Whitespace is removed from every line and the remainder is
    /// ASCII-lowercased. Blank lines are skipped; duplicates are kept.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be opened or read
    pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);

        let mut words = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let mut word: String = line.chars().filter(|c| !c.is_whitespace()).collect();
            if !word.is_empty() {
                word.make_ascii_lowercase();
                words.push(word);
            }
        }

        tracing::debug!(path = %path.display(), words = words.len(), "loaded word list");
        Ok(Self { words })
    }

    /// Wrap an existing list of words unchanged.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// The words in load order.
    #[inline]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Number of words, duplicates included.
    #[inline]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if the list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Seeded generator for synthetic words and query keys.
pub struct WordGenerator {
    rng: StdRng,
}

impl WordGenerator {
    /// Create new generator with seed.
    ///
    /// The same seed always yields the same sequence of outputs.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn random_word(&mut self, min_len: usize, max_len: usize) -> String {
        let len = self.rng.gen_range(min_len..=max_len);
        (0..len)
            .map(|_| ALPHABET[self.rng.gen_range(0..ALPHABET.len())] as char)
            .collect()
    }

    /// Generate `count` random lowercase words.
    ///
    /// Lengths are uniform in `min_len..=max_len`; the bounds are swapped if
    /// given in the wrong order. Duplicates are possible.
    pub fn random_words(&mut self, count: usize, min_len: usize, max_len: usize) -> WordList {
        let (min_len, max_len) = if min_len <= max_len {
            (min_len, max_len)
        } else {
            (max_len, min_len)
        };
        let words = (0..count)
            .map(|_| self.random_word(min_len, max_len))
            .collect();
        WordList { words }
    }

    /// Draw `count` words from `words` with replacement.
    ///
    /// Returns an empty list if `words` is empty.
    pub fn sample_hits(&mut self, words: &WordList, count: usize) -> Vec<String> {
        if words.is_empty() {
            return Vec::new();
        }
        (0..count)
            .filter_map(|_| words.words.choose(&mut self.rng).cloned())
            .collect()
    }

    /// Generate `count` keys that no alphabetic dataset can contain.
    ///
    /// Each key is a random word followed by `_MISS_{i}`.
    pub fn miss_keys(&mut self, count: usize) -> Vec<String> {
        (0..count)
            .map(|i| {
                let mut key = self.random_word(MISS_MIN_LEN, MISS_MAX_LEN);
                key.push_str("_MISS_");
                key.push_str(&i.to_string());
                key
            })
            .collect()
    }
}
