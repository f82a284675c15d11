use std::path::PathBuf;

/// Errors raised while capturing a snapshot from the proc filesystem.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// A counter file could not be read.
    #[error("capture: failed to read {file}: {source}")]
    Io {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A counter file did not have the expected shape.
    #[error("capture: malformed {file}: {reason}")]
    Parse { file: PathBuf, reason: String },
}

impl CaptureError {
    pub(crate) fn io(file: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CaptureError::Io {
            file: file.into(),
            source,
        }
    }

    pub(crate) fn parse(file: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        CaptureError::Parse {
            file: file.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience `Result` alias for capture operations.
pub type Result<T> = std::result::Result<T, CaptureError>;
