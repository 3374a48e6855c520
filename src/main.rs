//! Postman collection generator - command-line entry point.
//!
//! Scans a local Python project, picks the files and functions that look like API handlers,
//! and asks a chat-completion service to turn them into a Postman collection.
//!
//! # Usage
//!
//! ```bash
//! postman-from-source --local-path ./my-api --output-file collection.json
//! ```
//!
//! Let the model rank files and use the tree-sitter extractor:
//! ```bash
//! postman-from-source --local-path ./my-api --file-strategy llm --extractor syntax-tree
//! ```
//!
//! The API key is read from `OPENAI_API_KEY` (process environment or a `.env` file).

use anyhow::Result;
use clap::Parser;
use log::info;
use postman_from_source::cli;

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("Postman collection generator starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args)?;

    Ok(())
}
