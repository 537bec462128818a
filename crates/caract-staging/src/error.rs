//! Error types for the staging crate.

/// Errors that can occur while staging photos.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StagingError {
    /// A photo must be attached to a named material.
    #[error("material name must not be empty")]
    EmptyMaterial,

    /// The captured buffer holds no data.
    #[error("photo for {0} is empty")]
    EmptyPhoto(String),
}

/// Convenience alias for staging results.
pub type StagingResult<T> = Result<T, StagingError>;
