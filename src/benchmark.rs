//! Timing and memory harness comparing the trie engines.
//!
//! A [`Benchmark`] owns one dataset and a fixed set of hit/miss query keys,
//! so every engine is timed against identical input. Each run builds a fresh
//! engine, inserts the whole dataset, then searches the hit keys and the
//! miss keys.
//!
//! ```
//! use prefix_tries::benchmark::Benchmark;
//! use prefix_tries::workload::WordGenerator;
//!
//! let words = WordGenerator::new(42).random_words(200, 5, 15);
//! let bench = Benchmark::new(words, 42);
//! for result in bench.run_all() {
//!     assert_eq!(result.dataset_size, 200);
//!     assert!(result.memory_usage > 0);
//! }
//! ```

use std::hint::black_box;
use std::io::{self, Write};
use std::time::{Duration, Instant};

use crate::trie::{
    CompressedTrie, DoubleArrayTrie, PrefixTrie, StandardTrie, TrieBackend, TrieFactory,
};
use crate::workload::{WordGenerator, WordList};

/// Upper bound on each query set.
const MAX_QUERY_KEYS: usize = 1000;

/// CSV header written by [`write_csv`].
pub const CSV_HEADER: &str =
    "TrieType,DatasetSize,MemoryKB,InsertTimeMS,SearchTimeMS,BytesPerWord,AvgInsertUS,AvgSearchUS";

/// Measurements from one engine over one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkResult {
    /// Engine that was measured
    pub backend: TrieBackend,
    /// Words inserted, duplicates included
    pub dataset_size: usize,
    /// Hit keys searched
    pub search_count: usize,
    /// Time to insert the whole dataset
    pub insertion_time: Duration,
    /// Time to search every hit key
    pub search_time: Duration,
    /// Time to search every miss key
    pub search_miss_time: Duration,
    /// Structural memory estimate after insertion
    pub memory_usage: usize,
    /// Nodes or states after insertion
    pub node_count: usize,
}

fn micros(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1_000_000.0
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1_000.0
}

impl BenchmarkResult {
    /// Mean insertion time per dataset word, in microseconds.
    pub fn avg_insert_micros(&self) -> f64 {
        if self.dataset_size == 0 {
            return 0.0;
        }
        micros(self.insertion_time) / self.dataset_size as f64
    }

    /// Mean time per hit search, in microseconds.
    pub fn avg_search_micros(&self) -> f64 {
        if self.search_count == 0 {
            return 0.0;
        }
        micros(self.search_time) / self.search_count as f64
    }

    /// Structural bytes per dataset word.
    pub fn memory_per_word(&self) -> f64 {
        if self.dataset_size == 0 {
            return 0.0;
        }
        self.memory_usage as f64 / self.dataset_size as f64
    }

    /// Memory estimate in KiB.
    pub fn memory_kb(&self) -> f64 {
        self.memory_usage as f64 / 1024.0
    }

    /// Insertion time in milliseconds.
    pub fn insert_millis(&self) -> f64 {
        millis(self.insertion_time)
    }

    /// Hit search time in milliseconds.
    pub fn search_millis(&self) -> f64 {
        millis(self.search_time)
    }

    /// Miss search time in milliseconds.
    pub fn search_miss_millis(&self) -> f64 {
        millis(self.search_miss_time)
    }
}

/// A dataset with its prepared query keys.
pub struct Benchmark {
    words: WordList,
    hit_keys: Vec<String>,
    miss_keys: Vec<String>,
}

impl Benchmark {
    /// Prepare up to 1000 hit keys and `min(len / 10, 1000)` miss keys.
    pub fn new(words: WordList, seed: u64) -> Self {
        let mut generator = WordGenerator::new(seed);
        let hit_keys = generator.sample_hits(&words, words.len().min(MAX_QUERY_KEYS));
        let miss_keys = generator.miss_keys((words.len() / 10).min(MAX_QUERY_KEYS));
        Self {
            words,
            hit_keys,
            miss_keys,
        }
    }

    /// The dataset being measured.
    pub fn words(&self) -> &WordList {
        &self.words
    }

    /// Keys drawn from the dataset.
    pub fn hit_keys(&self) -> &[String] {
        &self.hit_keys
    }

    /// Keys guaranteed absent from alphabetic datasets.
    pub fn miss_keys(&self) -> &[String] {
        &self.miss_keys
    }

    /// Measure one engine on a fresh instance.
    pub fn run(&self, backend: TrieBackend) -> BenchmarkResult {
        let result = match backend {
            TrieBackend::Standard => self.measure::<StandardTrie>(backend),
            TrieBackend::Compressed => self.measure::<CompressedTrie>(backend),
            TrieBackend::DoubleArray => self.measure::<DoubleArrayTrie>(backend),
        };
        tracing::debug!(
            %backend,
            words = result.dataset_size,
            insert_ms = result.insert_millis(),
            memory = result.memory_usage,
            "benchmark run finished"
        );
        result
    }

    /// Measure every engine in [`TrieFactory::available_backends`] order.
    pub fn run_all(&self) -> Vec<BenchmarkResult> {
        TrieFactory::available_backends()
            .into_iter()
            .map(|backend| self.run(backend))
            .collect()
    }

    fn measure<T: PrefixTrie>(&self, backend: TrieBackend) -> BenchmarkResult {
        let mut trie = T::default();

        let start = Instant::now();
        for word in self.words.words() {
            black_box(trie.insert(word));
        }
        let insertion_time = start.elapsed();

        let search_time = time_searches(&trie, &self.hit_keys);
        let search_miss_time = time_searches(&trie, &self.miss_keys);

        BenchmarkResult {
            backend,
            dataset_size: self.words.len(),
            search_count: self.hit_keys.len(),
            insertion_time,
            search_time,
            search_miss_time,
            memory_usage: trie.memory_usage(),
            node_count: trie.node_count(),
        }
    }
}

fn time_searches<T: PrefixTrie>(trie: &T, keys: &[String]) -> Duration {
    let start = Instant::now();
    for key in keys {
        black_box(trie.search(key));
    }
    start.elapsed()
}

/// Write results as CSV, header first, two decimals per measurement.
pub fn write_csv<W: Write>(results: &[BenchmarkResult], mut writer: W) -> io::Result<()> {
    writeln!(writer, "{CSV_HEADER}")?;
    for result in results {
        writeln!(
            writer,
            "{},{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
            result.backend,
            result.dataset_size,
            result.memory_kb(),
            result.insert_millis(),
            result.search_millis(),
            result.memory_per_word(),
            result.avg_insert_micros(),
            result.avg_search_micros(),
        )?;
    }
    writer.flush()
}

/// Resident set size of the current process, in bytes.
///
/// Read from `/proc/self/statm` assuming 4 KiB pages. `None` on other
/// platforms or if the file cannot be parsed.
pub fn process_resident_bytes() -> Option<usize> {
    #[cfg(target_os = "linux")]
    {
        const PAGE_SIZE: usize = 4096;
        let statm = std::fs::read_to_string("/proc/self/statm").ok()?;
        let resident: usize = statm.split_whitespace().nth(1)?.parse().ok()?;
        Some(resident * PAGE_SIZE)
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}
