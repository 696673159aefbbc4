//! Error type shared by the library layers.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced while loading, aggregating or rendering a call graph.
#[derive(Debug, Error)]
pub enum VizError {
    /// The external analysis could not load or analyze the target program.
    #[error("analysis of `{entry}` failed: {message}")]
    Analysis { entry: String, message: String },

    /// The external analysis tool is not installed.
    #[error("{program} not found in PATH. {hint}")]
    ToolNotFound { program: String, hint: &'static str },

    /// An edge record from the analysis output could not be parsed.
    #[error("malformed edge at {origin}:{line}: {content:?}")]
    MalformedEdge {
        origin: String,
        line: usize,
        content: String,
    },

    /// The graph model could not be encoded.
    #[error("failed to serialize graph model: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The HTML template has no `//start-sub ... //end-sub` region.
    #[error("template has no //start-sub ... //end-sub placeholder region")]
    MarkersNotFound,

    #[error("invalid template pattern: {0}")]
    Template(#[from] regex::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl VizError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        VizError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience result type for library operations.
pub type Result<T> = std::result::Result<T, VizError>;
