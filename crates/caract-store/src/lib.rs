//! Photo archive for committed characterization sessions.
//!
//! Photos land under `<root>/<ENTRANT|SORTANT>/<flux>_<date>/<material>.<ext>`.
//!
//! # Design Rules
//!
//! 1. One file per material per session folder; a retry overwrites, never duplicates.
//! 2. Every path component is sanitized: no material or flux name can escape
//!    its directory.
//! 3. Writes go through a temporary file renamed into place.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod archive;
pub mod error;
pub mod format;
pub mod naming;
pub mod traits;

pub use archive::{FsPhotoArchive, DEFAULT_PHOTO_ROOT};
pub use error::{StoreError, StoreResult};
pub use format::ImageFormat;
pub use naming::{sanitize_component, SessionFolder};
pub use traits::PhotoArchive;
