use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::RwLock;

use caract_types::{CellValue, LedgerRow, Mode};
use tracing::{debug, info};

use crate::error::LedgerError;
use crate::layout::{append_position, FIRST_DATA_ROW, FIRST_VALUE_COLUMN, KEY_COLUMN};
use crate::traits::{LedgerReader, LedgerWriter};

/// In-memory ledger for tests, local demos, and embedding.
///
/// Each mode must be [provisioned](Self::provision) before use, mirroring a
/// workbook that has to exist on disk. A mode can be marked locked to
/// simulate another program holding the store.
pub struct InMemoryLedger {
    inner: RwLock<LedgerState>,
}

#[derive(Default)]
struct LedgerState {
    sheets: HashMap<Mode, Sheet>,
    locked: HashSet<Mode>,
}

#[derive(Default)]
struct Sheet {
    cells: BTreeMap<(u32, u32), StoredCell>,
}

#[derive(Clone)]
struct StoredCell {
    value: CellValue,
    centered: bool,
}

impl Sheet {
    fn key_filled(&self, row: u32) -> bool {
        self.cells
            .get(&(row, KEY_COLUMN))
            .is_some_and(|c| !c.value.is_blank())
    }
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(LedgerState::default()),
        }
    }

    /// Ledger with every mode provisioned.
    pub fn provisioned() -> Self {
        let state = LedgerState {
            sheets: Mode::ALL.into_iter().map(|m| (m, Sheet::default())).collect(),
            locked: HashSet::new(),
        };
        Self {
            inner: RwLock::new(state),
        }
    }

    /// Create the (empty) store for a mode. Existing content is kept.
    pub fn provision(&self, mode: Mode) -> Result<(), LedgerError> {
        let mut state = self.inner.write().map_err(|_| poisoned())?;
        state.sheets.entry(mode).or_default();
        Ok(())
    }

    /// Simulate another process holding the mode's store.
    pub fn set_locked(&self, mode: Mode, locked: bool) -> Result<(), LedgerError> {
        let mut state = self.inner.write().map_err(|_| poisoned())?;
        if locked {
            state.locked.insert(mode);
        } else {
            state.locked.remove(&mode);
        }
        Ok(())
    }

    /// Write a cell directly, bypassing append (fixtures, header rows).
    pub fn set_cell(
        &self,
        mode: Mode,
        row: u32,
        column: u32,
        value: impl Into<CellValue>,
    ) -> Result<(), LedgerError> {
        let mut state = self.inner.write().map_err(|_| poisoned())?;
        state.sheets.entry(mode).or_default().cells.insert(
            (row, column),
            StoredCell {
                value: value.into(),
                centered: false,
            },
        );
        Ok(())
    }

    pub fn cell(&self, mode: Mode, row: u32, column: u32) -> Option<CellValue> {
        let state = self.inner.read().ok()?;
        state
            .sheets
            .get(&mode)?
            .cells
            .get(&(row, column))
            .map(|c| c.value.clone())
    }

    /// Whether the cell was written with center alignment.
    pub fn is_centered(&self, mode: Mode, row: u32, column: u32) -> bool {
        self.inner
            .read()
            .ok()
            .and_then(|state| {
                state
                    .sheets
                    .get(&mode)
                    .and_then(|s| s.cells.get(&(row, column)))
                    .map(|c| c.centered)
            })
            .unwrap_or(false)
    }

    /// Number of data rows before the append position.
    pub fn data_rows(&self, mode: Mode) -> Result<u32, LedgerError> {
        Ok(self.next_free_row(mode)? - FIRST_DATA_ROW)
    }

    fn path(mode: Mode) -> String {
        format!("memory://{}", mode.subtype())
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> LedgerError {
    LedgerError::IoFailure("ledger lock poisoned".into())
}

impl LedgerWriter for InMemoryLedger {
    fn append(&self, mode: Mode, row: &LedgerRow) -> Result<u32, LedgerError> {
        let mut state = self.inner.write().map_err(|_| poisoned())?;
        if state.locked.contains(&mode) {
            return Err(LedgerError::Locked {
                path: Self::path(mode),
            });
        }
        let sheet = state
            .sheets
            .get_mut(&mode)
            .ok_or_else(|| LedgerError::NotFound {
                mode,
                path: Self::path(mode),
            })?;

        let target = append_position(|r| sheet.key_filled(r));
        debug!(%mode, row = target, "append position located");

        for (offset, value) in row.cells().into_iter().enumerate() {
            sheet.cells.insert(
                (target, FIRST_VALUE_COLUMN + offset as u32),
                StoredCell {
                    value,
                    centered: true,
                },
            );
        }

        info!(%mode, row = target, key = row.key(), "ledger row appended");
        Ok(target)
    }
}

impl LedgerReader for InMemoryLedger {
    fn next_free_row(&self, mode: Mode) -> Result<u32, LedgerError> {
        let state = self.inner.read().map_err(|_| poisoned())?;
        let sheet = state.sheets.get(&mode).ok_or_else(|| LedgerError::NotFound {
            mode,
            path: Self::path(mode),
        })?;
        Ok(append_position(|r| sheet.key_filled(r)))
    }

    fn read_row(&self, mode: Mode, row: u32) -> Result<Vec<CellValue>, LedgerError> {
        let state = self.inner.read().map_err(|_| poisoned())?;
        let sheet = state.sheets.get(&mode).ok_or_else(|| LedgerError::NotFound {
            mode,
            path: Self::path(mode),
        })?;

        let last = sheet
            .cells
            .range((row, FIRST_VALUE_COLUMN)..=(row, u32::MAX))
            .filter(|(_, c)| !c.value.is_blank())
            .map(|((_, col), _)| *col)
            .last();
        let Some(last) = last else {
            return Ok(Vec::new());
        };

        Ok((FIRST_VALUE_COLUMN..=last)
            .map(|col| {
                sheet
                    .cells
                    .get(&(row, col))
                    .map(|c| c.value.clone())
                    .unwrap_or_else(|| CellValue::Text(String::new()))
            })
            .collect())
    }
}
