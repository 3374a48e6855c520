use std::path::PathBuf;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the library
#[derive(Debug)]
pub enum Error {
    FileRead { path: PathBuf, source: std::io::Error },
    Config(String),
    MissingApiKey,
    Http(reqwest::Error),
    Api { status: u16, body: String },
    MalformedResponse(String),
    Grammar(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::FileRead { path, source } => {
                write!(f, "Failed to read file {}: {}", path.display(), source)
            }
            Error::Config(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::MissingApiKey => write!(
                f,
                "No API key configured: set OPENAI_API_KEY (environment or .env) or llm.api_key"
            ),
            Error::Http(e) => write!(f, "Completion request failed: {}", e),
            Error::Api { status, body } => {
                write!(f, "Completion service returned HTTP {}: {}", status, body)
            }
            Error::MalformedResponse(msg) => {
                write!(f, "Malformed completion response: {}", msg)
            }
            Error::Grammar(msg) => write!(f, "Syntax tree setup failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FileRead { source, .. } => Some(source),
            Error::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<tree_sitter::QueryError> for Error {
    fn from(err: tree_sitter::QueryError) -> Self {
        Error::Grammar(format!("invalid function query: {}", err))
    }
}
