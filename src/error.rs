//! Error taxonomy shared by the loader, topic model, formatter and orchestrator.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias for library operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Everything that can stop a TopicENA run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The raw input table does not exist or is not a file.
    #[error("input file not found at {}", path.display())]
    InputNotFound { path: PathBuf },

    /// A required column is missing from the input header.
    #[error("CSV must contain columns: {required:?}; found: {found:?}")]
    Schema {
        required: Vec<String>,
        found: Vec<String>,
    },

    /// An external or in-process stage did not complete cleanly.
    #[error("{stage} failed with error:\n{diagnostic}")]
    StageFailure { stage: String, diagnostic: String },

    /// A companion tool could not be probed. Reported as a warning only.
    #[error("{tool} not found; is it installed and in your PATH?")]
    MissingOptionalTool { tool: String },

    /// The topic model could not produce an assignment.
    #[error("clustering failed: {0}")]
    Clustering(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataframe error: {0}")]
    Frame(#[from] polars::error::PolarsError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    /// Wrap a stage diagnostic, keeping the text verbatim.
    pub fn stage<S: Into<String>, D: Into<String>>(stage: S, diagnostic: D) -> Self {
        Self::StageFailure {
            stage: stage.into(),
            diagnostic: diagnostic.into(),
        }
    }

    /// Diagnostic text captured from a failing stage, if any.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::StageFailure { diagnostic, .. } => Some(diagnostic),
            _ => None,
        }
    }
}
