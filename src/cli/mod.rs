//! CLI interface for the trie benchmark driver
//!
//! Argument parsing lives in [`args`], execution in [`commands`].

pub mod args;
pub mod commands;

pub use args::Cli;
