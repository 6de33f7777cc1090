use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestSide {
    Parent,
    Child,
}

impl fmt::Display for ManifestSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parent => f.write_str("parent"),
            Self::Child => f.write_str("child"),
        }
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to process {}: {message}", path.display())]
    ProcessingFailure { path: PathBuf, message: String },

    #[error("parent manifests produced no data")]
    NoParentData,

    #[error("no '{column}' column found in {side} manifest")]
    SchemaMismatch {
        side: ManifestSide,
        column: &'static str,
    },

    #[error("failed to write {}: {message}", path.display())]
    WriteFailure { path: PathBuf, message: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to compile pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl PipelineError {
    pub fn processing(path: &Path, cause: impl fmt::Display) -> Self {
        Self::ProcessingFailure {
            path: path.to_path_buf(),
            message: cause.to_string(),
        }
    }

    pub fn write(path: &Path, cause: impl fmt::Display) -> Self {
        Self::WriteFailure {
            path: path.to_path_buf(),
            message: cause.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Rows(T),
    NoData,
}
