use crate::error::Result;
use crate::extractor::{FunctionExtractor, FunctionRecord};
use log::debug;
use std::path::Path;

const BODY_INDENT: &str = "    ";
const TRIPLE_QUOTES: [&str; 2] = ["\"\"\"", "'''"];

/// Line-oriented function extractor.
///
/// A function starts at any line beginning with `def ` or `async def ` in column zero. Lines
/// after it belong to the function while they are indented by four spaces or while a
/// triple-quoted string is open. The first other line (a blank line included) ends the
/// function and is not part of it. Decorators, nested definitions and string content that
/// starts in column zero are not understood.
///
/// Records are keyed by their signature line.
pub struct IndentationExtractor;

struct OpenFunction<'a> {
    signature: &'a str,
    lines: Vec<&'a str>,
}

impl<'a> OpenFunction<'a> {
    fn start(line: &'a str) -> Self {
        Self {
            signature: line,
            lines: vec![line],
        }
    }

    fn finish(self, path: &Path) -> FunctionRecord {
        FunctionRecord {
            key: self.signature.to_string(),
            signature: self.signature.to_string(),
            path: path.to_path_buf(),
            body: self.lines.join("\n"),
        }
    }
}

fn is_definition(line: &str) -> bool {
    line.starts_with("def ") || line.starts_with("async def ")
}

/// Whether `line` opens or closes a triple-quoted string.
fn toggles_string(line: &str) -> bool {
    let markers: usize = TRIPLE_QUOTES.iter().map(|q| line.matches(q).count()).sum();
    markers % 2 == 1
}

impl FunctionExtractor for IndentationExtractor {
    fn extract_functions(&self, path: &Path, source: &str) -> Result<Vec<FunctionRecord>> {
        let mut functions = Vec::new();
        let mut current: Option<OpenFunction> = None;
        let mut in_string = false;

        for line in source.lines() {
            if is_definition(line) {
                if let Some(open) = current.take() {
                    functions.push(open.finish(path));
                }
                current = Some(OpenFunction::start(line));
                in_string = false;
                continue;
            }

            let Some(open) = current.as_mut() else {
                continue;
            };

            if in_string || line.starts_with(BODY_INDENT) {
                open.lines.push(line);
                if toggles_string(line) {
                    in_string = !in_string;
                }
            } else if let Some(open) = current.take() {
                functions.push(open.finish(path));
            }
        }

        // Function running to end of file
        if let Some(open) = current.take() {
            functions.push(open.finish(path));
        }

        debug!(
            "Indentation heuristic found {} functions in {}",
            functions.len(),
            path.display()
        );
        Ok(functions)
    }
}
