use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BooksError {
    #[error("Config directory not found at {0}. Run 'books init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Missing setting '{0}'. Set it in config.toml or through the environment.")]
    MissingSetting(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database request failed: {0}")]
    Http(String),

    #[error("Database returned {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("Unexpected row shape in '{table}': {source}")]
    Decode {
        table: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD.")]
    InvalidDate(String),

    #[error("Invalid date range: {from} is after {to}")]
    InvalidRange { from: String, to: String },

    #[error("Top-N must be at least 1")]
    InvalidTopN,

    #[error("Unknown table '{0}'. Use one of: {1}")]
    UnknownTable(String, String),
}

impl From<ureq::Error> for BooksError {
    fn from(e: ureq::Error) -> Self {
        BooksError::Http(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BooksError>;
