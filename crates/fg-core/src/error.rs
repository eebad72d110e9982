use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn one source file into a syntax tree.
///
/// Always scoped to a single file: the catalog logs it and moves on.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("syntax error in {path}: {message}")]
    Syntax { path: PathBuf, message: String },
    #[error("unsupported source extension for {path}")]
    UnsupportedExtension { path: PathBuf },
}

/// Invalid analysis configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Problems with the repository layout itself
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("source directory not found: {0}")]
    MissingSourceDir(PathBuf),
    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum FgError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("failed to serialize artifact: {0}")]
    Serialize(#[from] serde_json::Error),
}
