use caract_types::Mode;

/// Errors produced by ledger operations.
///
/// All variants are terminal for the attempt: writers never retry, the caller
/// decides whether to re-invoke.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("ledger store for {mode} not found at {path}")]
    NotFound { mode: Mode, path: String },

    #[error("ledger store {path} is open in another program; close it and retry")]
    Locked { path: String },

    #[error("sheet {sheet:?} not found in {path}")]
    SheetNotFound { path: String, sheet: String },

    #[error("ledger I/O failure: {0}")]
    IoFailure(String),
}
