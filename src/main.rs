//! CLI entry point for the tile tour tool

use clap::Parser;
use tiletour::io::cli::{Cli, FileProcessor};

fn main() -> tiletour::Result<()> {
    let cli = Cli::parse();
    cli.init_logging();
    let mut processor = FileProcessor::new(cli);
    processor.process()
}
