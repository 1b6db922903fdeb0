use std::path::PathBuf;
use thiserror::Error;

/// All errors produced while reading and analysing OSCAR output.
#[derive(Error, Debug)]
pub enum OscarError {
    /// The resolved input file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A data row appeared before any `#!` header line.
    #[error("No column names found (missing '#!' header line?) at line {line_number}: {line}")]
    MissingHeader { line_number: usize, line: String },

    /// A data row does not have as many fields as the header has columns.
    #[error(
        "Number of columns does not fit at line {line_number}: got {got}, expected {expected}\nLine: {line}"
    )]
    ColumnCount {
        line_number: usize,
        got: usize,
        expected: usize,
        line: String,
    },

    /// A `#!` header with a different column count arrived after rows were
    /// already emitted under the previous one.
    #[error(
        "Header at line {line_number} changes the column count from {expected} to {got} after rows were read\nLine: {line}"
    )]
    SchemaChanged {
        line_number: usize,
        got: usize,
        expected: usize,
        line: String,
    },

    /// A pipeline step needs a column the table does not carry.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Histogram bin edges are unusable.
    #[error("Invalid histogram: {0}")]
    InvalidHistogram(String),

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the oscar crates.
pub type Result<T> = std::result::Result<T, OscarError>;
