//! Fixed ledger geometry, shared by every backend.

/// First data row; row 1 holds column headers.
pub const FIRST_DATA_ROW: u32 = 2;

/// Column holding the flux/client key. An empty key cell marks the end of data.
pub const KEY_COLUMN: u32 = 2;

/// Column receiving the first value of a row.
pub const FIRST_VALUE_COLUMN: u32 = 2;

/// Linear scan from [`FIRST_DATA_ROW`] to the first row whose key is empty.
///
/// A row with a key but blank values (e.g. a crash mid-write) is treated as
/// data and skipped, never repaired.
pub fn append_position(mut key_filled: impl FnMut(u32) -> bool) -> u32 {
    let mut row = FIRST_DATA_ROW;
    while key_filled(row) {
        row += 1;
    }
    row
}
