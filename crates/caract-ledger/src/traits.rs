use caract_types::{CellValue, LedgerRow, Mode};

use crate::error::LedgerError;

/// Write boundary for ledger appends.
pub trait LedgerWriter: Send + Sync {
    /// Append one composed row to the mode's store and persist it.
    ///
    /// Returns the 1-based row index written. Exactly one new row lands per
    /// successful call; existing rows are never modified. No deduplication:
    /// appending the same row twice yields two rows.
    fn append(&self, mode: Mode, row: &LedgerRow) -> Result<u32, LedgerError>;
}

/// Read boundary for inspecting a ledger.
pub trait LedgerReader: Send + Sync {
    /// Row index the next append would write to.
    fn next_free_row(&self, mode: Mode) -> Result<u32, LedgerError>;

    /// Cells of one row, from the first value column to the last non-empty one.
    fn read_row(&self, mode: Mode, row: u32) -> Result<Vec<CellValue>, LedgerError>;
}
