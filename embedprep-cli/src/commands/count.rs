//! Count command implementation

use crate::config::CliConfig;
use crate::input;
use anyhow::Result;
use clap::Args;
use embedprep_core::{TiktokenScheme, TokenScheme};
use std::path::PathBuf;

/// Arguments for the count command
#[derive(Debug, Args)]
pub struct CountArgs {
    /// Input file (default: stdin)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Model or encoding name
    #[arg(short, long, value_name = "NAME")]
    pub model: Option<String>,
}

impl CountArgs {
    /// Execute the count command
    pub fn execute(&self, config: &CliConfig) -> Result<()> {
        let model = self.model.as_deref().unwrap_or(&config.tokenizer.model);
        let text = input::read_input(self.input.as_deref())?;

        let scheme = TiktokenScheme::load(model)?;
        let count = scheme.count(&text);
        log::info!(
            "{} characters, {} tokens under {}",
            text.chars().count(),
            count,
            scheme.name()
        );

        println!("{count}");
        Ok(())
    }
}
