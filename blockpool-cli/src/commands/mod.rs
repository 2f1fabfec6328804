//! CLI subcommands.

pub mod common;
pub mod compress;
pub mod config;
