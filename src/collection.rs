//! Collection synthesis and output.
//!
//! The collection document is whatever text the completion service returns. It is inspected
//! with `serde_json` for logging purposes only and always written verbatim.

use crate::completion::CompletionClient;
use crate::error::Result;
use crate::prompts;
use anyhow::Context;
use log::{debug, info, warn};
use std::fs;
use std::path::Path;

/// Asks the completion service for a Postman collection describing `context`.
///
/// # Arguments
///
/// * `client` - The completion service
/// * `context` - Relevant function source, embedded in a fenced Python block
///
/// # Returns
///
/// The completion text as returned, trimmed but otherwise unchecked.
///
/// # Errors
///
/// Propagates any [`crate::error::Error`] from the client.
pub fn generate_collection(client: &dyn CompletionClient, context: &str) -> Result<String> {
    debug!("Requesting collection for {} bytes of context", context.len());
    client.complete(&prompts::collection_messages(context))
}

/// Outcome of looking at the returned collection text.
#[derive(Debug, PartialEq, Eq)]
pub enum CollectionCheck {
    /// Parses as JSON; carries `info.name` when present
    Json { name: Option<String> },
    /// Does not parse as JSON; carries the parser message
    NotJson(String),
}

/// Checks whether `text` is JSON and logs the result. Never rejects the text.
pub fn inspect_collection(text: &str) -> CollectionCheck {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(value) => {
            let name = value
                .pointer("/info/name")
                .and_then(|n| n.as_str())
                .map(str::to_string);
            match &name {
                Some(name) => info!("Collection name: {}", name),
                None => debug!("Collection has no info.name"),
            }
            CollectionCheck::Json { name }
        }
        Err(e) => {
            warn!("Completion is not valid JSON ({}); writing it unchanged", e);
            CollectionCheck::NotJson(e.to_string())
        }
    }
}

/// Writes `content` to `path`, replacing any existing file.
///
/// Parent directories are created when missing.
///
/// # Errors
///
/// Returns an error if a parent directory cannot be created or the file cannot be written.
pub fn write_to_file(content: &str, path: &Path) -> anyhow::Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
