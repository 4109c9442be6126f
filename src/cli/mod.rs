//! CLI module for icebreakr - command-line interface and subcommands.

pub mod commands;

pub use commands::Cli;
