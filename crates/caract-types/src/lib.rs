//! Foundation types for waste characterization sessions.
//!
//! Every other caract crate depends on `caract-types`.
//!
//! # Key Types
//!
//! - [`Mode`] — Recording context (incoming or outgoing material stream)
//! - [`SessionHeader`] — Date, flux/client, team and location of a session
//! - [`WeightEntry`] — Sparse operator-entered weights keyed by material
//! - [`LedgerRow`] — Fixed-order row written to the ledger store
//! - [`Taxonomy`] — Ordered material catalog defining ledger column order
//! - [`PresentationHints`] — Group colors, consumed only by rendering layers

pub mod error;
pub mod header;
pub mod mode;
pub mod naming;
pub mod row;
pub mod taxonomy;
pub mod weight;

pub use error::ValidationError;
pub use header::{SessionHeader, DATE_FORMAT};
pub use mode::{Location, Mode, Team};
pub use naming::path_component;
pub use row::{CellValue, LedgerRow};
pub use taxonomy::{GroupHint, MaterialGroup, PresentationHints, Taxonomy};
pub use weight::{parse_weight, WeightEntry};
