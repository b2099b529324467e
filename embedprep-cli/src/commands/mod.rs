//! CLI command implementations

use crate::config::CliConfig;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod bridge;
pub mod chunk;
pub mod count;
pub mod generate_config;
pub mod list;
pub mod transcripts;

/// Token counting, chunking and transcript export for embedding pipelines
#[derive(Debug, Parser)]
#[command(name = "embedprep", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Suppress progress and log output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Answer JSON token requests read from stdin
    Bridge(bridge::BridgeArgs),

    /// Count the tokens in a text
    Count(count::CountArgs),

    /// Split a text into overlapping token-bounded chunks
    Chunk(chunk::ChunkArgs),

    /// Join transcripts with their products and export them as JSON
    Transcripts(transcripts::TranscriptsArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },

    /// Write a configuration file with every default filled in
    GenerateConfig(generate_config::GenerateConfigArgs),
}

/// List subcommands
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ListCommands {
    /// List tokenization schemes
    Schemes,

    /// List output formats of the chunk command
    Formats,
}

/// Supported output formats
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text, each chunk under a marker line
    Text,
    /// JSON array of chunks with token offsets
    Json,
    /// Markdown formatted output
    Markdown,
}

impl Cli {
    /// Run the selected command
    pub fn execute(&self) -> Result<()> {
        self.init_logging();

        let config = CliConfig::load(self.config.as_deref())?;
        log::debug!("Arguments: {:?}", self);

        match &self.command {
            Commands::Bridge(args) => args.execute(&config),
            Commands::Count(args) => args.execute(&config),
            Commands::Chunk(args) => args.execute(&config),
            Commands::Transcripts(args) => args.execute(&config, self.quiet),
            Commands::List { subcommand } => {
                list::execute(*subcommand);
                Ok(())
            }
            Commands::GenerateConfig(args) => args.execute(),
        }
    }

    /// Initialize logging based on verbosity level
    fn init_logging(&self) {
        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        if !self.quiet {
            let _ = env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(log_level),
            )
            .try_init();
        }
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
    fn test_parse_bridge_lines() {
        let cli = Cli::try_parse_from(["embedprep", "bridge", "--lines"]).unwrap();
        match cli.command {
            Commands::Bridge(args) => assert!(args.lines),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["embedprep", "count", "-vv", "--quiet"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.quiet);
    }

    #[test]
    fn test_list_commands_variants() {
        let cli = Cli::try_parse_from(["embedprep", "list", "schemes"]).unwrap();
        let debug_str = format!("{:?}", cli.command);
        assert!(debug_str.contains("List"));
        assert!(debug_str.contains("Schemes"));
    }

    #[test]
    fn test_missing_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["embedprep"]).is_err());
    }
}
