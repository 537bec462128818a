use thiserror::Error;

use caract_types::ValidationError;

/// Errors from editing a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no session in progress; choose a mode first")]
    NotEntering,

    #[error("a session is already in progress")]
    AlreadyEntering,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Staging(#[from] caract_staging::StagingError),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Errors from committing a session. None of them clears session state.
#[derive(Debug, Error)]
pub enum CommitError {
    #[error("no session in progress; nothing to commit")]
    NotEntering,

    #[error("cannot name the session photo folder: {0}")]
    SessionFolder(#[source] caract_store::StoreError),

    #[error("photo for {material} could not be saved: {source}")]
    PhotoWriteFailed {
        material: String,
        #[source]
        source: caract_store::StoreError,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Ledger(#[from] caract_ledger::LedgerError),
}
