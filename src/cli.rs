use crate::completion::OpenAiClient;
use crate::config::{Config, ExtractorKind, FileStrategy};
use crate::pipeline::Pipeline;
use anyhow::Result;
use clap::Parser;
use log::{debug, info};
use std::path::PathBuf;

/// Postman collection generator - builds a Postman collection from the API code in a repository
///
/// Provide either the URL of the repository or the local path to the repository.
#[derive(Parser, Debug)]
#[command(name = "postman-from-source")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// The URL of the repository to analyze
    #[arg(long = "repo-url", value_name = "URL")]
    pub repo_url: Option<String>,

    /// The local path of the repository to analyze
    #[arg(long = "local-path", value_name = "DIR")]
    pub local_path: Option<PathBuf>,

    /// The name of the output file for the generated Postman collection
    #[arg(
        long = "output-file",
        value_name = "FILE",
        default_value = "postman_collection.json"
    )]
    pub output_file: PathBuf,

    /// TOML configuration file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// How relevant files are picked (overrides the configuration)
    #[arg(long = "file-strategy", value_enum)]
    pub file_strategy: Option<FileStrategy>,

    /// How functions are extracted (overrides the configuration)
    #[arg(long = "extractor", value_enum)]
    pub extractor: Option<ExtractorKind>,

    /// Completion model (overrides the configuration)
    #[arg(long = "model")]
    pub model: Option<String>,

    /// Sampling temperature (overrides the configuration)
    #[arg(long = "temperature")]
    pub temperature: Option<f64>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// What a run was asked to work on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Local(PathBuf),
    Remote(String),
    Missing,
}

impl CliArgs {
    /// The local path wins when both a path and a URL are given.
    pub fn target(&self) -> Target {
        match (&self.local_path, &self.repo_url) {
            (Some(path), _) => Target::Local(path.clone()),
            (None, Some(url)) => Target::Remote(url.clone()),
            (None, None) => Target::Missing,
        }
    }

    /// Applies command-line overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(strategy) = self.file_strategy {
            config.pipeline.file_strategy = strategy;
        }
        if let Some(extractor) = self.extractor {
            config.pipeline.extractor = extractor;
        }
        if let Some(ref model) = self.model {
            config.llm.model = model.clone();
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }
    }

    /// Loads the configuration and layers the command-line overrides on top.
    ///
    /// Validation runs only on the merged result, so a flag can correct a value the file
    /// or the environment got wrong.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be loaded or the merged values are
    /// out of range.
    pub fn effective_config(&self) -> crate::error::Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if let Some(ref path) = args.local_path {
        if !path.exists() {
            anyhow::bail!("Local path does not exist: {}", path.display());
        }
        if !path.is_dir() {
            anyhow::bail!("Local path is not a directory: {}", path.display());
        }
        info!("Local path: {}", path.display());
    }
    if let Some(ref url) = args.repo_url {
        info!("Repository URL: {}", url);
    }
    info!("Output file: {}", args.output_file.display());

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    let root = match args.target() {
        Target::Missing => {
            println!("Error: Please provide either --repo-url or --local-path.");
            return Ok(());
        }
        Target::Remote(url) => {
            println!("Generating Postman collection for remote repository...");
            println!("Repository URL: {}", url);
            println!("Not implemented yet.");
            return Ok(());
        }
        Target::Local(root) => root,
    };

    println!("Generating Postman collection for local repository...");

    let config = args.effective_config()?;

    let client = OpenAiClient::new(&config.llm)?;
    info!("Using model {} at {}", client.model(), client.endpoint());

    let summary = Pipeline::new(&config, &client).run(&root, &args.output_file)?;

    info!("Generation complete!");
    info!("Summary:");
    info!("  - Files scanned: {}", summary.files_found);
    info!("  - Relevant files: {}", summary.relevant_files);
    info!("  - Functions found: {}", summary.functions_found);
    info!("  - Relevant functions: {}", summary.relevant_functions);
    info!("  - Valid JSON: {}", summary.valid_json);
    info!("  - Output: {}", summary.output_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let args = CliArgs::try_parse_from(["postman-from-source"]).unwrap();
        assert_eq!(args.output_file, PathBuf::from("postman_collection.json"));
        assert_eq!(args.target(), Target::Missing);
        assert!(!args.verbose);
    }

    #[test]
    fn test_target_prefers_local_path() {
        let args = CliArgs::try_parse_from([
            "postman-from-source",
            "--repo-url",
            "https://github.com/acme/api",
            "--local-path",
            "./api",
        ])
        .unwrap();
        assert_eq!(args.target(), Target::Local(PathBuf::from("./api")));

        let args = CliArgs::try_parse_from([
            "postman-from-source",
            "--repo-url",
            "https://github.com/acme/api",
        ])
        .unwrap();
        assert_eq!(
            args.target(),
            Target::Remote("https://github.com/acme/api".to_string())
        );
    }

    #[test]
    fn test_overrides_replace_config_values() {
        let args = CliArgs::try_parse_from([
            "postman-from-source",
            "--file-strategy",
            "llm",
            "--extractor",
            "syntax-tree",
            "--model",
            "gpt-4o",
            "--temperature",
            "0.1",
        ])
        .unwrap();

        let mut config = Config::default();
        args.apply_overrides(&mut config);

        assert_eq!(config.pipeline.file_strategy, FileStrategy::Llm);
        assert_eq!(config.pipeline.extractor, ExtractorKind::SyntaxTree);
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.temperature, 0.1);
    }

    #[test]
    fn test_override_fixes_out_of_range_file_value() {
        // Create a configuration file with an invalid temperature
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[llm]\ntemperature = 3.0\n").unwrap();

        // The flag replaces the file value before validation
        let args = CliArgs::try_parse_from([
            "postman-from-source",
            "--config",
            path.to_str().unwrap(),
            "--temperature",
            "0.5",
        ])
        .unwrap();
        let config = args.effective_config().unwrap();
        assert_eq!(config.llm.temperature, 0.5);
        assert!(config.validate().is_ok());

        // Without the flag the merged value is still rejected
        let args =
            CliArgs::try_parse_from(["postman-from-source", "--config", path.to_str().unwrap()])
                .unwrap();
        assert!(args.effective_config().is_err());
    }

    #[test]
    fn test_run_without_target_is_noop() {
        let args = CliArgs::try_parse_from(["postman-from-source"]).unwrap();
        assert!(run(args).is_ok());
    }

    #[test]
    fn test_run_remote_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("collection.json");
        let args = CliArgs::try_parse_from([
            "postman-from-source",
            "--repo-url",
            "https://github.com/acme/api",
            "--output-file",
            output.to_str().unwrap(),
        ])
        .unwrap();

        assert!(run(args).is_ok());
        assert!(!output.exists());
    }

    #[test]
    fn test_rejects_missing_local_path() {
        let args =
            CliArgs::try_parse_from(["postman-from-source", "--local-path", "/nonexistent/repo"])
                .unwrap();
        let err = parse_args_from_parsed(args).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_rejects_file_as_local_path() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("search.py");
        std::fs::write(&file, "").unwrap();

        let args = CliArgs::try_parse_from([
            "postman-from-source",
            "--local-path",
            file.to_str().unwrap(),
        ])
        .unwrap();
        let err = parse_args_from_parsed(args).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }
}
