//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

use crate::trie::TrieBackend;

/// Benchmark driver arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "trie-bench")]
#[command(about = "Compare standard, compressed and double-array tries")]
#[command(version)]
pub struct Cli {
    /// Random dataset sizes to benchmark
    #[arg(short, long, value_delimiter = ',', default_value = "1000,10000,50000")]
    pub sizes: Vec<usize>,

    /// Minimum generated word length
    #[arg(long, default_value = "5")]
    pub min_len: usize,

    /// Maximum generated word length
    #[arg(long, default_value = "15")]
    pub max_len: usize,

    /// Seed for word generation and query sampling
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Dictionary file (one word per line) benchmarked after the random sets
    ///
    /// Defaults to `dictionary.txt` in the working directory when it exists.
    #[arg(short, long)]
    pub dictionary: Option<PathBuf>,

    /// Only benchmark these engines (repeatable; default all)
    #[arg(short, long = "backend", value_enum)]
    pub backends: Vec<TrieBackend>,

    /// Output CSV file
    #[arg(long, default_value = "benchmark_results.csv")]
    pub csv: PathBuf,

    /// Run the five-word smoke test only
    #[arg(short, long)]
    pub quick: bool,
}

impl Cli {
    /// Engines selected on the command line, or all of them.
    pub fn selected_backends(&self) -> Vec<TrieBackend> {
        if self.backends.is_empty() {
            crate::trie::TrieFactory::available_backends()
        } else {
            let mut backends = self.backends.clone();
            backends.sort();
            backends.dedup();
            backends
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["trie-bench"]);
        assert_eq!(cli.sizes, vec![1000, 10000, 50000]);
        assert_eq!(cli.min_len, 5);
        assert_eq!(cli.max_len, 15);
        assert_eq!(cli.seed, 42);
        assert_eq!(cli.csv, PathBuf::from("benchmark_results.csv"));
        assert!(cli.dictionary.is_none());
        assert!(!cli.quick);
        assert_eq!(cli.selected_backends().len(), 3);
    }

    #[test]
    fn test_backend_filter() {
        let cli = Cli::parse_from([
            "trie-bench",
            "--backend",
            "double-array",
            "-b",
            "standard",
            "--backend",
            "dat",
        ]);
        assert_eq!(
            cli.selected_backends(),
            vec![TrieBackend::Standard, TrieBackend::DoubleArray]
        );
    }

    #[test]
    fn test_sizes_list() {
        let cli = Cli::parse_from(["trie-bench", "--sizes", "10,20", "--quick"]);
        assert_eq!(cli.sizes, vec![10, 20]);
        assert!(cli.quick);
    }

    #[test]
    fn test_rejects_unknown_backend() {
        assert!(Cli::try_parse_from(["trie-bench", "--backend", "btree"]).is_err());
    }
}
