//! Context blob assembly.

use crate::extractor::FunctionTable;
use log::warn;

/// Joins function bodies with newlines, preserving order.
pub fn generate_context<S: AsRef<str>>(bodies: &[S]) -> String {
    bodies
        .iter()
        .map(|body| body.as_ref())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Looks up the bodies of `keys` in `table`, in the order given.
pub fn relevant_bodies<'t>(table: &'t FunctionTable, keys: &[&str]) -> Vec<&'t str> {
    keys.iter()
        .filter_map(|key| match table.get(key) {
            Some(record) => Some(record.body.as_str()),
            None => {
                warn!("No function recorded for '{}'", key);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::FunctionRecord;
    use std::path::PathBuf;

    #[test]
    fn test_generate_context_joins_with_newline() {
        assert_eq!(generate_context(&["a", "b"]), "a\nb");
    }

    #[test]
    fn test_generate_context_edge_cases() {
        let empty: [&str; 0] = [];
        assert_eq!(generate_context(&empty), "");
        assert_eq!(generate_context(&["only"]), "only");
        assert_eq!(
            generate_context(&["def a():\n    pass".to_string(), "def b():\n    pass".to_string()]),
            "def a():\n    pass\ndef b():\n    pass"
        );
    }

    #[test]
    fn test_relevant_bodies_follow_key_order() {
        let mut table = FunctionTable::new();
        for name in ["first", "second"] {
            table.insert(FunctionRecord {
                key: name.to_string(),
                signature: format!("def {}():", name),
                path: PathBuf::from("search.py"),
                body: format!("def {}():\n    pass", name),
            });
        }

        let bodies = relevant_bodies(&table, &["second", "missing", "first"]);
        assert_eq!(bodies, vec!["def second():\n    pass", "def first():\n    pass"]);
    }
}
