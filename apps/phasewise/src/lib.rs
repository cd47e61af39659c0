//! # phasewise
//!
//! The Phasewise binary's library half: HTTP API, CLI and configuration,
//! all driving `phasewise-core`. Split out so integration tests can build
//! the router and run commands without a process.

pub mod api;
pub mod cli;
pub mod config;
pub mod workspace;
