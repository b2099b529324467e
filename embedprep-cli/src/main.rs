use clap::Parser;
use embedprep_cli::commands::Cli;
use embedprep_cli::CliResult;

fn main() -> CliResult<()> {
    Cli::parse().execute()
}
