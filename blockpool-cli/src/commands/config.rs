//! Configuration management CLI commands.
//!
//! Provides `config path`, `config show`, and `config init` for inspecting and
//! creating the configuration file.

use std::path::Path;

use blockpool::config::ConfigFile;
use clap::Subcommand;

use super::common::{load_config, resolve_config_path};
use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Show the effective configuration (file values over defaults)
    Show,

    /// Write a default configuration file if none exists
    Init,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands, config_path: Option<&Path>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => {
            println!("{}", resolve_config_path(config_path).display());
            Ok(())
        }
        ConfigCommands::Show => run_show(config_path),
        ConfigCommands::Init => run_init(config_path),
    }
}

fn run_show(config_path: Option<&Path>) -> Result<(), CliError> {
    let path = resolve_config_path(config_path);
    let config = load_config(config_path)?;

    if !path.exists() {
        println!("# {} does not exist, showing defaults", path.display());
    }
    println!("[pool]");
    println!(
        "threads = {} (effective: {})",
        config.pool.threads,
        config.pool.effective_threads()
    );
    println!();
    println!("[compression]");
    println!("format = {}", config.compression.format.as_str());
    println!("quality = {}", config.compression.quality);
    println!("alpha = {}", config.compression.alpha);

    Ok(())
}

fn run_init(config_path: Option<&Path>) -> Result<(), CliError> {
    let path = resolve_config_path(config_path);
    if ConfigFile::ensure_exists_at(&path)? {
        println!("Created {}", path.display());
    } else {
        println!("{} already exists, left unchanged", path.display());
    }
    Ok(())
}
