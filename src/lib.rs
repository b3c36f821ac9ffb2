//! `ticketlog` (tl) - local task tracker backed by an append-only JSONL log.
//!
//! This crate provides the `tl` binary on top of `ticketlog-lib`.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap, one module per command
//! - [`config`] - `.ticketlog.toml` discovery and parsing
//! - [`format`] - Output formatting (text, JSON)
//! - [`logging`] - `tracing` subscriber setup
//!
//! Storage, IDs, the dependency graph, queries, and import live in
//! `ticketlog_lib`.

#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod format;
pub mod logging;

pub use cli::run;
