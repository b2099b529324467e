//! List command implementation

use super::ListCommands;
use embedprep_core::{supported_encodings, DEFAULT_MODEL};

/// Print the requested listing
pub fn execute(subcommand: ListCommands) {
    match subcommand {
        ListCommands::Schemes => {
            println!("Encodings:");
            for name in supported_encodings() {
                println!("  {name}");
            }
            println!();
            println!("Model names (e.g. {DEFAULT_MODEL}, gpt-4o) resolve to their encoding.");
        }
        ListCommands::Formats => {
            println!("Output formats:");
            println!("  text      - Each chunk under a marker line");
            println!("  json      - JSON array with token offsets");
            println!("  markdown  - Markdown sections");
        }
    }
}
