//! Function extraction from Python source files.
//!
//! This module provides one capability, "extract function bodies from source text", behind the
//! [`FunctionExtractor`] trait, with two implementations:
//!
//! - **Indentation heuristic**: See [`indentation::IndentationExtractor`]
//! - **Syntax tree query**: See [`syntax_tree::SyntaxTreeExtractor`]
//!
//! The two variants identify functions differently. The heuristic keys a record by its full
//! signature line; the syntax-tree variant keys it by bare function name, so same-named
//! functions in different files replace one another in a [`FunctionTable`].
//!
//! # Example
//!
//! ```no_run
//! use postman_from_source::extractor::{extract_from_files, indentation::IndentationExtractor};
//! use std::path::PathBuf;
//!
//! let files = vec![PathBuf::from("app/search.py")];
//! let table = extract_from_files(&IndentationExtractor, &files).unwrap();
//! println!("Found {} functions", table.len());
//! ```

pub mod indentation;
pub mod syntax_tree;

use crate::config::ExtractorKind;
use crate::error::{Error, Result};
use log::debug;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Trait for pulling function definitions out of one source file.
pub trait FunctionExtractor {
    /// Extracts every function definition found in `source`, in source order.
    ///
    /// # Arguments
    ///
    /// * `path` - The file the source was read from, recorded on each function
    /// * `source` - The full text of the file
    fn extract_functions(&self, path: &Path, source: &str) -> Result<Vec<FunctionRecord>>;
}

/// A single extracted function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionRecord {
    /// Identity of the record inside a [`FunctionTable`]
    pub key: String,
    /// First line of the definition (e.g. `async def search(q: str):`)
    pub signature: String,
    /// File the function was found in
    pub path: PathBuf,
    /// Full definition text, signature line included
    pub body: String,
}

/// Extracted functions keyed by [`FunctionRecord::key`].
///
/// Iteration follows first-insertion order. Inserting a record whose key is already present
/// replaces the earlier record in place.
#[derive(Debug, Default)]
pub struct FunctionTable {
    records: Vec<FunctionRecord>,
    index: HashMap<String, usize>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `record`, returning the record it replaced, if any.
    pub fn insert(&mut self, record: FunctionRecord) -> Option<FunctionRecord> {
        match self.index.get(&record.key) {
            Some(&slot) => {
                debug!(
                    "Function '{}' from {} replaces the one from {}",
                    record.key,
                    record.path.display(),
                    self.records[slot].path.display()
                );
                Some(std::mem::replace(&mut self.records[slot], record))
            }
            None => {
                self.index.insert(record.key.clone(), self.records.len());
                self.records.push(record);
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&FunctionRecord> {
        self.index.get(key).map(|&slot| &self.records[slot])
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FunctionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Builds the extractor selected by `kind`.
pub fn for_kind(kind: ExtractorKind) -> Result<Box<dyn FunctionExtractor>> {
    Ok(match kind {
        ExtractorKind::Indentation => Box::new(indentation::IndentationExtractor),
        ExtractorKind::SyntaxTree => Box::new(syntax_tree::SyntaxTreeExtractor::new()?),
    })
}

/// Reads each file in order and collects its functions into one table.
///
/// # Arguments
///
/// * `extractor` - The extractor applied to every file's source text
/// * `paths` - Files to read, in the order their functions enter the table
///
/// # Returns
///
/// A [`FunctionTable`] holding every function found. A key seen again in a later file
/// replaces the earlier record in place.
///
/// # Errors
///
/// Fails on the first file that cannot be read as UTF-8 text, or on the first extractor
/// failure; no partial table is returned.
pub fn extract_from_files(
    extractor: &dyn FunctionExtractor,
    files: &[PathBuf],
) -> Result<FunctionTable> {
    let mut table = FunctionTable::new();

    for path in files {
        debug!("Extracting functions from {}", path.display());
        let source = fs::read_to_string(path).map_err(|source| Error::FileRead {
            path: path.clone(),
            source,
        })?;

        for record in extractor.extract_functions(path, &source)? {
            table.insert(record);
        }
    }

    Ok(table)
}
