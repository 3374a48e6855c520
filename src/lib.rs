//! Postman collection generator - a Postman collection from the API code in a Python project.
//!
//! The library walks a source tree, narrows it down to the files and functions that look like
//! API handlers, and hands their source to a chat-completion service that writes the
//! collection. All of the API understanding is delegated to the model; locally there is only
//! file selection, function extraction and text assembly.
//!
//! # Architecture
//!
//! One linear pass, each stage feeding the next:
//!
//! 1. [`scanner`] - Recursively lists files, skipping ignore-listed directories
//! 2. [`selector`] - Picks relevant files (filename suffix or model ranking)
//! 3. [`extractor`] - Extracts function definitions (indentation heuristic or tree-sitter)
//! 4. [`selector`] - Picks relevant functions by signature prefix
//! 5. [`context`] - Joins the relevant function bodies into one context blob
//! 6. [`collection`] - Asks the model for the collection and writes it to disk
//!
//! [`pipeline`] drives the stages with an explicit [`config::Config`] and a
//! [`completion::CompletionClient`].
//!
//! # Example Usage
//!
//! ```no_run
//! use postman_from_source::{
//!     completion::OpenAiClient,
//!     config::Config,
//!     pipeline::Pipeline,
//! };
//! use std::path::Path;
//!
//! let config = Config::load(None).unwrap();
//! let client = OpenAiClient::new(&config.llm).unwrap();
//! let summary = Pipeline::new(&config, &client)
//!     .run(Path::new("./my-api"), Path::new("postman_collection.json"))
//!     .unwrap();
//! println!("{} relevant functions", summary.relevant_functions);
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod cli;
pub mod collection;
pub mod completion;
pub mod config;
pub mod context;
pub mod error;
pub mod extractor;
pub mod pipeline;
pub mod prompts;
pub mod scanner;
pub mod selector;
