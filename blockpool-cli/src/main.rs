//! blockpool CLI - block-parallel texture compression from the command line.

mod commands;
mod error;

use std::path::PathBuf;

use blockpool::config::config_directory;
use blockpool::logging::{default_log_dir, default_log_file, init_logging};
use clap::{Parser, Subcommand};

use commands::compress::CompressArgs;
use commands::config::ConfigCommands;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "blockpool")]
#[command(version, about = "Compress images to BC5/BC6H/BC7 on a fork-join worker pool")]
struct Cli {
    /// Config file (default: ~/.blockpool/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compress an image or vertical cubemap strip to a raw block stream
    Compress(CompressArgs),

    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Compress(args) => {
            let log_dir = config_directory().join(default_log_dir());
            let _guard = init_logging(&log_dir.to_string_lossy(), default_log_file())
                .map_err(|e| CliError::LoggingInit(e.to_string()))?;
            commands::compress::run(args, config_path)
        }
        Commands::Config { command } => commands::config::run(command, config_path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_compress() {
        let cli = Cli::try_parse_from([
            "blockpool", "compress", "-i", "sky.png", "-o", "sky.bc6h", "--format", "bc6h",
            "--faces", "6", "--quality", "0.8",
        ])
        .unwrap();

        match cli.command {
            Commands::Compress(args) => {
                assert_eq!(args.faces, 6);
                assert_eq!(args.quality, Some(0.8));
                assert_eq!(args.format, Some(commands::common::FormatArg::Bc6h));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unsupported_face_count() {
        let result =
            Cli::try_parse_from(["blockpool", "compress", "-i", "a.png", "-o", "b", "--faces", "2"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_config_with_global_path() {
        let cli = Cli::try_parse_from(["blockpool", "config", "show", "--config", "/tmp/x.ini"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/x.ini")));
        assert!(matches!(
            cli.command,
            Commands::Config {
                command: ConfigCommands::Show
            }
        ));
    }
}
