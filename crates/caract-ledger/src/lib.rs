//! Append-only session ledger.
//!
//! This crate provides:
//! - [`RowComposer`], turning a header and sparse weights into a fixed-order row
//! - `LedgerWriter` / `LedgerReader` trait boundaries
//! - [`XlsxLedger`], one workbook per mode
//! - [`InMemoryLedger`] for tests and embedding
//!
//! Every backend follows the same layout: row 1 is reserved for column
//! headers, data starts at row 2, the key (flux/client) sits in column 2 and
//! the first value is written to column 2. The append position is the first
//! row, scanning down from row 2, whose key cell is empty.

pub mod compose;
pub mod error;
pub mod layout;
pub mod memory;
pub mod traits;
pub mod xlsx;

pub use compose::RowComposer;
pub use error::LedgerError;
pub use layout::{FIRST_DATA_ROW, FIRST_VALUE_COLUMN, KEY_COLUMN};
pub use memory::InMemoryLedger;
pub use traits::{LedgerReader, LedgerWriter};
pub use xlsx::{XlsxLedger, DEFAULT_SHEET};
