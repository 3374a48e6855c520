//! The end-to-end run: walk, select files, extract, select functions, build context,
//! synthesize, write.
//!
//! Every stage runs once, in order, on the calling thread. Any failure stops the run; nothing
//! is retried and no partial output is written.

use crate::collection::{generate_collection, inspect_collection, write_to_file, CollectionCheck};
use crate::completion::CompletionClient;
use crate::config::{Config, FileStrategy};
use crate::context::{generate_context, relevant_bodies};
use crate::extractor::{self, extract_from_files};
use crate::scanner::FileScanner;
use crate::selector::{select_functions, CompletionSelector, FileSelector, SuffixSelector};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Counts and locations reported at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub files_found: usize,
    pub relevant_files: usize,
    pub functions_found: usize,
    pub relevant_functions: usize,
    pub output_path: PathBuf,
    pub valid_json: bool,
}

/// One configured run over a local source tree.
pub struct Pipeline<'a> {
    config: &'a Config,
    client: &'a dyn CompletionClient,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a Config, client: &'a dyn CompletionClient) -> Self {
        Self { config, client }
    }

    fn file_selector(&self) -> Box<dyn FileSelector + 'a> {
        match self.config.pipeline.file_strategy {
            FileStrategy::Suffix => Box::new(SuffixSelector::new(
                self.config.filter.file_suffix.clone(),
            )),
            FileStrategy::Llm => Box::new(CompletionSelector::new(self.client)),
        }
    }

    /// Runs every stage against `root` and writes the collection to `output`.
    ///
    /// # Arguments
    ///
    /// * `root` - Directory to walk
    /// * `output` - Destination of the collection, overwritten if it exists
    ///
    /// # Returns
    ///
    /// A [`RunSummary`] with the count at each stage and whether the output parsed as JSON.
    ///
    /// # Errors
    ///
    /// Returns the first stage failure. Nothing is written to `output` unless the collection
    /// was generated.
    pub fn run(&self, root: &Path, output: &Path) -> Result<RunSummary> {
        let scan = FileScanner::new(root.to_path_buf())
            .with_ignore(self.config.scan.ignore.clone())
            .scan()?;
        info!("Found {} files in {}", scan.files.len(), root.display());

        let relevant_files = self
            .file_selector()
            .select_files(&scan.files)
            .context("Failed to select relevant files")?;
        info!(
            "Selected {} relevant files using the {:?} strategy",
            relevant_files.len(),
            self.config.pipeline.file_strategy
        );
        for path in &relevant_files {
            debug!("  relevant file: {}", path.display());
        }

        let extractor = extractor::for_kind(self.config.pipeline.extractor)?;
        let functions = extract_from_files(extractor.as_ref(), &relevant_files)
            .context("Failed to extract functions")?;
        info!("Found {} function definitions.", functions.len());

        let relevant_keys = select_functions(&functions, &self.config.filter.function_prefix);
        info!(
            "Selected {} relevant functions matching '{}'",
            relevant_keys.len(),
            self.config.filter.function_prefix
        );
        if relevant_keys.is_empty() {
            warn!("No functions matched; the collection will be generated from an empty context");
        }

        let bodies = relevant_bodies(&functions, &relevant_keys);
        let context = generate_context(&bodies);
        info!("Context:\n'''\n{}\n'''", context);

        let collection = generate_collection(self.client, &context)
            .context("Failed to generate collection")?;
        let valid_json = matches!(inspect_collection(&collection), CollectionCheck::Json { .. });

        write_to_file(&collection, output)?;
        info!(
            "Postman collection generated and saved to {}",
            output.display()
        );

        Ok(RunSummary {
            files_found: scan.files.len(),
            relevant_files: relevant_files.len(),
            functions_found: functions.len(),
            relevant_functions: relevant_keys.len(),
            output_path: output.to_path_buf(),
            valid_json,
        })
    }
}
