use crate::domain::models::DeletionWarning;
use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("berry library directory not found at {}", .0.display())]
    MissingBerryDir(PathBuf),
    #[error("failed to read generate directory {}: {source}", .path.display())]
    ReadGenerateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to start generator `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("generator exited with status {code}")]
    ToolFailed {
        code: i32,
        warnings: Vec<DeletionWarning>,
    },
    #[error("generator was terminated by a signal")]
    ToolTerminated { warnings: Vec<DeletionWarning> },
}

impl GenerateError {
    /// Cleanup warnings collected before the generator failed.
    pub fn deletion_warnings(&self) -> &[DeletionWarning] {
        match self {
            GenerateError::ToolFailed { warnings, .. }
            | GenerateError::ToolTerminated { warnings } => warnings.as_slice(),
            _ => &[],
        }
    }
}
