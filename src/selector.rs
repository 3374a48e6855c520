//! Relevance filtering for files and functions.
//!
//! Files are picked by a [`FileSelector`]: either a fixed filename suffix
//! ([`SuffixSelector`]) or a ranking produced by the completion service
//! ([`CompletionSelector`]). Functions are picked by [`select_functions`], a literal prefix
//! match on the signature line.

use crate::completion::CompletionClient;
use crate::error::Result;
use crate::extractor::FunctionTable;
use crate::prompts;
use log::debug;
use std::path::PathBuf;

/// Picks the files worth extracting functions from.
pub trait FileSelector {
    fn select_files(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>>;
}

/// Keeps paths whose file name ends with a literal suffix.
pub struct SuffixSelector {
    suffix: String,
}

impl SuffixSelector {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }
}

impl FileSelector for SuffixSelector {
    fn select_files(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let selected: Vec<PathBuf> = paths
            .iter()
            .filter(|path| {
                path.file_name()
                    .map(|name| name.to_string_lossy().ends_with(&self.suffix))
                    .unwrap_or(false)
            })
            .cloned()
            .collect();

        debug!(
            "Suffix '{}' kept {} of {} files",
            self.suffix,
            selected.len(),
            paths.len()
        );
        Ok(selected)
    }
}

/// Asks the completion service which files most likely hold API code.
///
/// The reply is split on newlines and every line is taken as a path, in the order given. The
/// reply is not checked against the input list, so an empty or chatty reply yields paths that
/// fail later when they are opened.
pub struct CompletionSelector<'a> {
    client: &'a dyn CompletionClient,
}

impl<'a> CompletionSelector<'a> {
    pub fn new(client: &'a dyn CompletionClient) -> Self {
        Self { client }
    }
}

impl FileSelector for CompletionSelector<'_> {
    fn select_files(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let reply = self
            .client
            .complete(&prompts::file_ranking_messages(paths))?;

        let selected: Vec<PathBuf> = reply.split('\n').map(PathBuf::from).collect();
        debug!("Completion service ranked {} files", selected.len());
        Ok(selected)
    }
}

/// Picks the functions whose signature line starts with `prefix`.
///
/// The match is a literal, case-sensitive prefix test on [`FunctionRecord::signature`], so it
/// behaves the same whichever extractor filled the table.
///
/// # Arguments
///
/// * `table` - Functions extracted from the relevant files
/// * `prefix` - Literal signature prefix, for example `async def search`
///
/// # Returns
///
/// The keys of the matching records, in table order. Keys borrow from `table`.
///
/// [`FunctionRecord::signature`]: crate::extractor::FunctionRecord::signature
pub fn select_functions<'t>(table: &'t FunctionTable, prefix: &str) -> Vec<&'t str> {
    table
        .iter()
        .filter(|record| record.signature.starts_with(prefix))
        .map(|record| record.key.as_str())
        .collect()
}
