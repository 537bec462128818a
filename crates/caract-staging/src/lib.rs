//! Photo staging area for a characterization session.
//!
//! Holds at most one pending photo per material between capture and commit.
//! Everything is in memory; persisting photos is the job of `caract-store`.
//!
//! # Key Types
//!
//! - [`PhotoStaging`] -- The staging area (BTreeMap-backed)
//! - [`StagedPhoto`] -- A captured photo awaiting commit

pub mod entry;
pub mod error;
pub mod staging;

pub use entry::StagedPhoto;
pub use error::{StagingError, StagingResult};
pub use staging::PhotoStaging;
