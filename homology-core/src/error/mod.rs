//! Core error types for the homology pipeline

use thiserror::Error;

/// Main error type for homology operations
#[derive(Error, Debug)]
pub enum HomologyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The external aligner is missing or exited unsuccessfully.
    /// `message` carries the tool's own diagnostic output.
    #[error("Aligner failure ({tool}): {message}")]
    AlignerFailure { tool: String, message: String },

    /// A line of aligner output did not match the tabular hit format.
    #[error("Parsing error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("No hit found against the reference panel")]
    NoHitFound,

    #[error("Malformed identifier: {0}")]
    MalformedIdentifier(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Failure reported by an external source or sink.
    #[error("Collaborator error: {0}")]
    Collaborator(String),
}

/// Result type alias for homology operations
pub type HomologyResult<T> = Result<T, HomologyError>;

impl HomologyError {
    pub fn aligner(tool: impl Into<String>, message: impl Into<String>) -> Self {
        HomologyError::AlignerFailure {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        HomologyError::Parse {
            line,
            message: message.into(),
        }
    }

    /// Short stable name of the error kind, used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            HomologyError::Io(_) => "io",
            HomologyError::AlignerFailure { .. } => "aligner",
            HomologyError::Parse { .. } => "parse",
            HomologyError::NoHitFound => "no_hit_found",
            HomologyError::MalformedIdentifier(_) => "malformed_identifier",
            HomologyError::Cancelled => "cancelled",
            HomologyError::Configuration(_) => "configuration",
            HomologyError::Serialization(_) => "serialization",
            HomologyError::InvalidInput(_) => "invalid_input",
            HomologyError::NotFound(_) => "not_found",
            HomologyError::Collaborator(_) => "collaborator",
        }
    }
}

impl From<serde_json::Error> for HomologyError {
    fn from(err: serde_json::Error) -> Self {
        HomologyError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for HomologyError {
    fn from(err: anyhow::Error) -> Self {
        HomologyError::Collaborator(err.to_string())
    }
}
