//! CLI command implementations

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use colored::Colorize;

use crate::benchmark::{self, Benchmark, BenchmarkResult};
use crate::trie::{PrefixTrie, StandardTrie, TrieBackend};
use crate::workload::{WordGenerator, WordList};

use super::args::Cli;

/// Dictionary picked up from the working directory when none is given.
const DEFAULT_DICTIONARY: &str = "dictionary.txt";

/// Words used by the smoke test.
const QUICK_WORDS: [&str; 5] = ["apple", "application", "apply", "banana", "band"];

/// Execute the benchmark driver
pub fn run(cli: Cli) -> Result<()> {
    if cli.min_len == 0 {
        bail!("--min-len must be at least 1");
    }

    println!("{}", "Trie Benchmark".bold().underline());
    println!();
    quick_test();
    if cli.quick {
        return Ok(());
    }

    let backends = cli.selected_backends();
    let mut results = Vec::new();

    for (index, &size) in cli.sizes.iter().enumerate() {
        // Offset the seed so datasets of different sizes are independent.
        let seed = cli.seed.wrapping_add(index as u64);
        let words = WordGenerator::new(seed).random_words(size, cli.min_len, cli.max_len);
        let name = format!("{} Random Words", short_count(size));
        results.extend(run_comparison(&name, words, seed, &backends));
    }

    if let Some(path) = dictionary_path(cli.dictionary) {
        let words = WordList::load(&path)
            .with_context(|| format!("Failed to load dictionary: {}", path.display()))?;
        println!(
            "\n{} Loaded {} words from {}",
            "→".cyan(),
            words.len().to_string().green(),
            path.display().to_string().yellow()
        );
        if words.is_empty() {
            println!("{} Dictionary is empty, skipping", "!".yellow());
        } else {
            results.extend(run_comparison("Dictionary", words, cli.seed, &backends));
        }
    }

    save_csv(&results, &cli.csv)?;
    println!(
        "\n{} Results saved to {}",
        "✓".green(),
        cli.csv.display().to_string().cyan()
    );
    Ok(())
}

/// An explicit path, or the default file if it exists.
fn dictionary_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(|| {
        let fallback = PathBuf::from(DEFAULT_DICTIONARY);
        fallback.is_file().then_some(fallback)
    })
}

fn short_count(size: usize) -> String {
    if size >= 1000 && size % 1000 == 0 {
        format!("{}K", size / 1000)
    } else {
        size.to_string()
    }
}

fn found(hit: bool) -> colored::ColoredString {
    if hit {
        "found".green()
    } else {
        "not found".red()
    }
}

/// Five-word sanity check on the standard trie.
fn quick_test() {
    println!("{}", "Quick test".bold());
    let trie = StandardTrie::from_words(QUICK_WORDS);
    println!("  Inserted:     {} words", trie.len());
    println!("  Search apple: {}", found(trie.search("apple")));
    println!("  Search app:   {}", found(trie.search("app")));
    println!(
        "  Prefix app:   {}",
        if trie.starts_with("app") {
            "yes".green()
        } else {
            "no".red()
        }
    );
    println!("  Memory:       {} bytes", trie.memory_usage());
}

fn run_comparison(
    name: &str,
    words: WordList,
    seed: u64,
    backends: &[TrieBackend],
) -> Vec<BenchmarkResult> {
    println!();
    println!("{} {}", "Testing with:".bold(), name.cyan());
    println!("  Dataset size: {} words", words.len());

    let bench = Benchmark::new(words, seed);
    let results: Vec<_> = backends.iter().map(|&backend| bench.run(backend)).collect();

    println!();
    println!(
        "{}",
        format!(
            "{:<20}{:>14}{:>14}{:>14}{:>14}{:>14}",
            "Implementation", "Memory (KB)", "Insert (ms)", "Search (ms)", "Miss (ms)", "Bytes/Word"
        )
        .bold()
    );
    for result in &results {
        println!(
            "{:<20}{:>14.2}{:>14.2}{:>14.2}{:>14.2}{:>14.2}",
            result.backend.to_string(),
            result.memory_kb(),
            result.insert_millis(),
            result.search_millis(),
            result.search_miss_millis(),
            result.memory_per_word(),
        );
    }
    if let Some(resident) = benchmark::process_resident_bytes() {
        println!("  Process RSS: {:.2} MB", resident as f64 / (1024.0 * 1024.0));
    }

    results
}

fn save_csv(results: &[BenchmarkResult], path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    benchmark::write_csv(results, BufWriter::new(file))
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::ffi::OsString;

    #[test]
    fn test_short_count() {
        assert_eq!(short_count(1000), "1K");
        assert_eq!(short_count(50_000), "50K");
        assert_eq!(short_count(1500), "1500");
        assert_eq!(short_count(0), "0");
    }

    #[test]
    fn test_run_writes_csv() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("out.csv");
        let dict = dir.path().join("words.txt");
        std::fs::write(&dict, "Alpha\nbeta\n\ngamma\n").unwrap();

        let args: Vec<OsString> = vec![
            "trie-bench".into(),
            "--sizes".into(),
            "50,100".into(),
            "--dictionary".into(),
            dict.into_os_string(),
            "--csv".into(),
            csv.clone().into_os_string(),
        ];
        let cli = Cli::parse_from(args);
        run(cli).unwrap();

        let text = std::fs::read_to_string(&csv).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], benchmark::CSV_HEADER);
        // three engines for each of two random sets and the dictionary
        assert_eq!(lines.len(), 1 + 3 * 3);
        assert!(lines[1].starts_with("Standard Trie,50,"));
        assert!(lines[9].starts_with("Double-Array Trie,3,"));
    }

    #[test]
    fn test_run_missing_dictionary_fails() {
        let dir = tempfile::tempdir().unwrap();
        let args: Vec<OsString> = vec![
            "trie-bench".into(),
            "--sizes".into(),
            "10".into(),
            "--dictionary".into(),
            dir.path().join("absent.txt").into_os_string(),
            "--csv".into(),
            dir.path().join("out.csv").into_os_string(),
        ];
        let cli = Cli::parse_from(args);
        let err = run(cli).unwrap_err();
        assert!(err.to_string().contains("Failed to load dictionary"));
    }
}
