//! Characterization session API.
//!
//! A [`Session`] walks `IDLE -> ENTERING -> COMMITTING -> IDLE | ENTERING`.
//! While entering, the operator fills the header, weights and staged photos;
//! [`Session::commit`] persists the photos, appends the ledger row, and only
//! then resets. Any failure returns the session to `ENTERING` with all data
//! kept for a retry.

pub mod commit;
pub mod error;
pub mod session;

pub use commit::CommitReceipt;
pub use error::{CommitError, SessionError, SessionResult};
pub use session::{Session, SessionState};

// Re-export key types
pub use caract_ledger::{InMemoryLedger, LedgerError, LedgerReader, LedgerWriter, XlsxLedger};
pub use caract_staging::{PhotoStaging, StagedPhoto};
pub use caract_store::{FsPhotoArchive, PhotoArchive, SessionFolder};
pub use caract_types::{Location, Mode, SessionHeader, Taxonomy, Team, WeightEntry};
