//! Layered run configuration.
//!
//! A [`Config`] is assembled once at the process boundary and then passed by reference into
//! the pipeline, which never consults the process environment on its own. Layers, lowest
//! precedence first:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. An optional TOML file (`--config`)
//! 3. A `.env` dotfile plus the process environment (`OPENAI_API_KEY`, `OPENAI_BASE_URL`,
//!    `OPENAI_MODEL`)
//! 4. Command-line flags (applied by [`crate::cli`])
//!
//! # Example file
//!
//! ```toml
//! [llm]
//! model = "gpt-4o-mini"
//! temperature = 0.2
//!
//! [scan]
//! ignore = [".git", "__pycache__", "node_modules"]
//!
//! [filter]
//! file_suffix = "routes.py"
//! function_prefix = "async def get_"
//!
//! [pipeline]
//! file_strategy = "llm"
//! extractor = "syntax-tree"
//! ```

use crate::error::{Error, Result};
use clap::ValueEnum;
use log::{debug, warn};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
    pub scan: ScanConfig,
    pub filter: FilterConfig,
    pub pipeline: PipelineConfig,
}

/// Settings for the chat-completion service.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.8,
            timeout_secs: 300,
        }
    }
}

// Hand-written so the key never ends up in debug logs.
impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Path components that exclude an entry (and everything below it) from the walk
    pub ignore: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        let ignore = [
            ".git",
            ".hg",
            ".svn",
            "__pycache__",
            ".mypy_cache",
            ".pytest_cache",
            "node_modules",
            ".venv",
            "venv",
            ".env",
        ];
        Self {
            ignore: ignore.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Literal filename suffix used by the `suffix` file strategy
    pub file_suffix: String,
    /// Literal prefix a function signature must start with to be kept
    pub function_prefix: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            file_suffix: "search.py".to_string(),
            function_prefix: "async def search".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub file_strategy: FileStrategy,
    pub extractor: ExtractorKind,
}

/// How relevant files are picked from the walked tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileStrategy {
    /// Keep files whose name ends with the configured suffix
    #[default]
    Suffix,
    /// Ask the completion service to rank the file list
    Llm,
}

/// Which function extractor reads the relevant files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractorKind {
    /// Line-prefix and indentation heuristic
    #[default]
    Indentation,
    /// Tree-sitter Python grammar query
    SyntaxTree,
}

impl Config {
    /// Builds the configuration from defaults, an optional TOML file, the `.env` dotfile and
    /// the process environment.
    ///
    /// The result is not validated here. Command-line overrides are layered on top by the
    /// caller, which then calls [`Config::validate`] on the merged values.
    ///
    /// # Arguments
    ///
    /// * `path` - Optional path to a TOML configuration file
    ///
    /// # Returns
    ///
    /// The merged configuration, with environment values taking precedence over the file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileRead`] if the file cannot be read and [`Error::Config`] if it is not
    /// valid TOML for this layout.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        match dotenvy::dotenv() {
            Ok(dotfile) => debug!("Loaded environment from {}", dotfile.display()),
            Err(e) if e.not_found() => debug!("No .env file found"),
            Err(e) => warn!("Ignoring unreadable .env file: {}", e),
        }

        config.apply_env(|name| std::env::var(name).ok());

        debug!("Effective configuration: {:?}", config);
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Overlays environment values fetched through `lookup`; empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(base_url) = lookup("OPENAI_BASE_URL") {
            self.llm.base_url = base_url;
        }
        if let Some(model) = lookup("OPENAI_MODEL") {
            self.llm.model = model;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.llm.model.trim().is_empty() {
            return Err(Error::Config("llm.model must not be empty".to_string()));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(Error::Config(format!(
                "llm.temperature must be in [0.0, 2.0], got {}",
                self.llm.temperature
            )));
        }
        if self.llm.timeout_secs == 0 {
            return Err(Error::Config("llm.timeout_secs must be > 0".to_string()));
        }
        Ok(())
    }
}
