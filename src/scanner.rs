use anyhow::Result;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File scanner for traversing a source tree.
///
/// The `FileScanner` recursively walks a directory and collects every file below it. Entries
/// whose path contains a component equal to one of the ignore tokens (for example `.git` or
/// `__pycache__`) are pruned together with everything beneath them.
///
/// # Example
///
/// ```no_run
/// use postman_from_source::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./my-project"))
///     .with_ignore(vec![".git".to_string(), "__pycache__".to_string()]);
/// let result = scanner.scan().unwrap();
/// println!("Found {} files", result.files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
    ignore: Vec<String>,
}

/// Result of a directory scan.
pub struct ScanResult {
    /// Every regular file reachable from the root, in walk order
    pub files: Vec<PathBuf>,
    /// Warning messages for entries that could not be accessed
    pub warnings: Vec<String>,
}

impl FileScanner {
    /// Creates a scanner for `root_path` with no ignore tokens.
    pub fn new(root_path: PathBuf) -> Self {
        Self {
            root_path,
            ignore: Vec::new(),
        }
    }

    /// Sets the path components that exclude an entry from the walk.
    ///
    /// # Arguments
    ///
    /// * `ignore` - Tokens compared against every component of an entry's path relative to
    ///   the root. A match prunes the entry and, for a directory, everything beneath it.
    ///
    /// # Returns
    ///
    /// The scanner with the new ignore list, replacing any previous one.
    pub fn with_ignore(mut self, ignore: Vec<String>) -> Self {
        self.ignore = ignore;
        self
    }

    fn is_ignored(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root_path).unwrap_or(path);
        relative.components().any(|component| {
            let name = component.as_os_str().to_string_lossy();
            self.ignore.iter().any(|token| *token == name)
        })
    }

    /// Walks the tree and collects all files.
    ///
    /// Directory entries are visited in file-name order so repeated runs over the same tree
    /// report the same sequence. Inaccessible entries become warnings and the walk continues.
    /// Links are not followed into directories, but a symlink that resolves to a regular file
    /// is listed under its link path.
    ///
    /// # Returns
    ///
    /// A [`ScanResult`] with the files in walk order and any access warnings.
    ///
    /// # Errors
    ///
    /// Returns an error if the root path does not exist.
    pub fn scan(&self) -> Result<ScanResult> {
        if !self.root_path.exists() {
            anyhow::bail!("Scan root does not exist: {}", self.root_path.display());
        }

        let mut files = Vec::new();
        let mut warnings = Vec::new();

        for entry in WalkDir::new(&self.root_path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.path() == self.root_path || !self.is_ignored(e.path()))
        {
            match entry {
                Ok(entry) => {
                    let is_file = entry.file_type().is_file()
                        || (entry.path_is_symlink() && entry.path().is_file());
                    if is_file {
                        files.push(entry.path().to_path_buf());
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        debug!(
            "Scanned {}: {} files, {} warnings",
            self.root_path.display(),
            files.len(),
            warnings.len()
        );

        Ok(ScanResult { files, warnings })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn names(result: &ScanResult) -> Vec<String> {
        result
            .files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_scan_collects_every_file() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        // Create test files
        fs::write(root.join("main.py"), "print('hi')").unwrap();
        fs::write(root.join("README.md"), "# README").unwrap();
        fs::write(root.join("pyproject.toml"), "[project]").unwrap();

        let result = FileScanner::new(root.to_path_buf()).scan().unwrap();

        assert_eq!(result.files.len(), 3);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp_dir = TempDir::new().unwrap();

        let result = FileScanner::new(temp_dir.path().to_path_buf()).scan().unwrap();

        assert!(result.files.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_scan_nested_directories_in_name_order() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("app/routers")).unwrap();
        fs::write(root.join("app/routers/search.py"), "").unwrap();
        fs::write(root.join("app/main.py"), "").unwrap();
        fs::write(root.join("setup.py"), "").unwrap();

        let result = FileScanner::new(root.to_path_buf()).scan().unwrap();

        assert_eq!(names(&result), vec!["main.py", "search.py", "setup.py"]);
    }

    #[test]
    fn test_scan_skips_ignored_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        // Create sources next to cache and VCS directories
        fs::create_dir_all(root.join("pkg/__pycache__")).unwrap();
        fs::create_dir(root.join(".git")).unwrap();
        fs::write(root.join("pkg/api.py"), "").unwrap();
        fs::write(root.join("pkg/util.py"), "").unwrap();
        fs::write(root.join("pkg/__pycache__/api.cpython-311.pyc"), "").unwrap();
        fs::write(root.join("pkg/__pycache__/util.cpython-311.pyc"), "").unwrap();
        fs::write(root.join(".git/HEAD"), "ref: refs/heads/main").unwrap();

        let result = FileScanner::new(root.to_path_buf())
            .with_ignore(vec![".git".to_string(), "__pycache__".to_string()])
            .scan()
            .unwrap();

        assert_eq!(names(&result), vec!["api.py", "util.py"]);
    }

    #[test]
    fn test_scan_skips_ignored_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join(".env"), "OPENAI_API_KEY=sk-test").unwrap();
        fs::write(root.join("app.py"), "").unwrap();

        let result = FileScanner::new(root.to_path_buf())
            .with_ignore(vec![".env".to_string()])
            .scan()
            .unwrap();

        assert_eq!(names(&result), vec!["app.py"]);
    }

    #[test]
    fn test_ignore_matches_whole_components_only() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir(root.join("environment")).unwrap();
        fs::write(root.join("environment/settings.py"), "").unwrap();

        let result = FileScanner::new(root.to_path_buf())
            .with_ignore(vec!["env".to_string()])
            .scan()
            .unwrap();

        assert_eq!(names(&result), vec!["settings.py"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_includes_symlinked_files() {
        let temp_dir = TempDir::new().unwrap();
        let shared = TempDir::new().unwrap();
        let root = temp_dir.path();

        // Link a search module that lives outside the scanned tree
        fs::write(shared.path().join("search.py"), "async def search():\n    pass\n").unwrap();
        std::os::unix::fs::symlink(shared.path().join("search.py"), root.join("search.py"))
            .unwrap();

        let result = FileScanner::new(root.to_path_buf()).scan().unwrap();

        assert_eq!(result.files, vec![root.join("search.py")]);
        assert!(result.warnings.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_does_not_follow_directory_symlinks() {
        let temp_dir = TempDir::new().unwrap();
        let shared = TempDir::new().unwrap();
        let root = temp_dir.path();

        // A linked directory is listed as neither a file nor a subtree
        fs::write(shared.path().join("search.py"), "").unwrap();
        std::os::unix::fs::symlink(shared.path(), root.join("linked")).unwrap();
        fs::write(root.join("app.py"), "").unwrap();

        let result = FileScanner::new(root.to_path_buf()).scan().unwrap();

        assert_eq!(names(&result), vec!["app.py"]);
    }

    #[test]
    fn test_scan_missing_root_fails() {
        let result = FileScanner::new(PathBuf::from("/nonexistent/project")).scan();
        assert!(result.is_err());
    }
}
