use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("renderer '{name}' not found on PATH (install graphviz or set renderer.exe)")]
    ToolNotFound { name: String },

    #[error("input directory not found: {}", .0.display())]
    MissingInputDirectory(PathBuf),

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serializing comparison index: {0}")]
    Json(#[from] serde_json::Error),

    #[error("building worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// A single render that did not produce an image. Never escalates past the dispatcher.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{diagnostic}")]
pub struct RenderFailure {
    pub diagnostic: String,
}

impl RenderFailure {
    pub fn new(diagnostic: impl Into<String>) -> Self {
        Self {
            diagnostic: diagnostic.into(),
        }
    }
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> PipelineError {
    PipelineError::Io {
        path: path.into(),
        source,
    }
}
