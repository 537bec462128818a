use std::path::PathBuf;

/// Errors from photo archive operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A name produced no usable path component after sanitizing.
    #[error("invalid name for a photo path: {0:?}")]
    InvalidName(String),

    /// I/O error while writing under the archive root.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
