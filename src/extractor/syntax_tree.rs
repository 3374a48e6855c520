use crate::error::{Error, Result};
use crate::extractor::{FunctionExtractor, FunctionRecord};
use log::debug;
use std::path::Path;
use tree_sitter::{Language, Parser, Query, QueryCursor, StreamingIterator};

const FUNCTION_QUERY: &str = r#"
(function_definition
  name: (identifier) @function_name
  body: (block) @function_body
) @function
"#;

/// Function extractor backed by the tree-sitter Python grammar.
///
/// Every `function_definition` node is reported, including methods and nested functions, in
/// source order. Records are keyed by bare function name; the body is the full definition text
/// from `def` (or `async`) to the end of the block, without decorators.
pub struct SyntaxTreeExtractor {
    language: Language,
    query: Query,
    name_capture: u32,
    function_capture: u32,
}

impl SyntaxTreeExtractor {
    /// Loads the Python grammar and compiles the function query.
    pub fn new() -> Result<Self> {
        let language: Language = tree_sitter_python::LANGUAGE.into();
        let query = Query::new(&language, FUNCTION_QUERY)?;

        let capture = |name: &str| {
            query
                .capture_index_for_name(name)
                .ok_or_else(|| Error::Grammar(format!("query has no @{} capture", name)))
        };
        let name_capture = capture("function_name")?;
        let function_capture = capture("function")?;

        Ok(Self {
            language,
            query,
            name_capture,
            function_capture,
        })
    }
}

impl FunctionExtractor for SyntaxTreeExtractor {
    fn extract_functions(&self, path: &Path, source: &str) -> Result<Vec<FunctionRecord>> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| Error::Grammar(format!("failed to set language: {}", e)))?;

        let tree = parser.parse(source, None).ok_or_else(|| {
            Error::Grammar(format!("parser produced no tree for {}", path.display()))
        })?;

        let bytes = source.as_bytes();
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&self.query, tree.root_node(), bytes);
        let mut functions = Vec::new();

        while let Some(found) = matches.next() {
            let mut name = None;
            let mut definition = None;

            for capture in found.captures {
                if capture.index == self.name_capture {
                    name = capture.node.utf8_text(bytes).ok();
                } else if capture.index == self.function_capture {
                    definition = Some(capture.node);
                }
            }

            let (Some(name), Some(node)) = (name, definition) else {
                continue;
            };
            let Ok(text) = node.utf8_text(bytes) else {
                continue;
            };

            let signature = text.lines().next().unwrap_or_default();
            functions.push((
                node.start_byte(),
                FunctionRecord {
                    key: name.to_string(),
                    signature: signature.to_string(),
                    path: path.to_path_buf(),
                    body: text.to_string(),
                },
            ));
        }

        // Outer definitions before the ones nested in them
        functions.sort_by_key(|(start, _)| *start);
        let functions: Vec<FunctionRecord> =
            functions.into_iter().map(|(_, record)| record).collect();

        debug!(
            "Syntax tree query found {} functions in {}",
            functions.len(),
            path.display()
        );
        Ok(functions)
    }
}
