//! Workbook-backed ledger: one `.xlsx` file per mode.
//!
//! The workbook is loaded fully, the row is written in memory, and the whole
//! workbook is saved once at the end through a temporary file renamed over
//! the original. A failure anywhere before the rename leaves the file on disk
//! untouched.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Cursor, Read, Write};
use std::path::{Path, PathBuf};

use caract_types::{CellValue, LedgerRow, Mode};
use tracing::{debug, info};
use umya_spreadsheet::{HorizontalAlignmentValues, Spreadsheet, Worksheet};

use crate::error::LedgerError;
use crate::layout::{append_position, FIRST_VALUE_COLUMN, KEY_COLUMN};
use crate::traits::{LedgerReader, LedgerWriter};

/// Default sheet receiving session rows.
pub const DEFAULT_SHEET: &str = "SAISIE";

/// Ledger stored as one workbook per mode.
#[derive(Clone, Debug)]
pub struct XlsxLedger {
    incoming: PathBuf,
    outgoing: PathBuf,
    sheet: String,
}

impl XlsxLedger {
    pub fn new(
        incoming: impl Into<PathBuf>,
        outgoing: impl Into<PathBuf>,
        sheet: impl Into<String>,
    ) -> Self {
        Self {
            incoming: incoming.into(),
            outgoing: outgoing.into(),
            sheet: sheet.into(),
        }
    }

    pub fn path(&self, mode: Mode) -> &Path {
        match mode {
            Mode::Incoming => &self.incoming,
            Mode::Outgoing => &self.outgoing,
        }
    }

    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    /// Whether the mode's workbook exists on disk.
    pub fn is_provisioned(&self, mode: Mode) -> bool {
        self.path(mode).is_file()
    }

    fn existing_path(&self, mode: Mode) -> Result<&Path, LedgerError> {
        let path = self.path(mode);
        if !path.is_file() {
            return Err(LedgerError::NotFound {
                mode,
                path: path.display().to_string(),
            });
        }
        Ok(path)
    }

    /// Open for reading and writing, so a workbook held by another program is
    /// reported as locked before any work is done.
    fn open_for_write(path: &Path) -> Result<File, LedgerError> {
        OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| classify_io(path, e))
    }

    fn load(path: &Path, mut file: File) -> Result<Spreadsheet, LedgerError> {
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|e| classify_io(path, e))?;
        umya_spreadsheet::reader::xlsx::read_reader(Cursor::new(bytes), true)
            .map_err(|e| LedgerError::IoFailure(format!("{}: {e}", path.display())))
    }

    fn read_only(&self, mode: Mode) -> Result<(PathBuf, Spreadsheet), LedgerError> {
        let path = self.existing_path(mode)?;
        let file = File::open(path).map_err(|e| classify_io(path, e))?;
        let book = Self::load(path, file)?;
        Ok((path.to_path_buf(), book))
    }

    fn sheet_of<'b>(
        &self,
        path: &Path,
        book: &'b Spreadsheet,
    ) -> Result<&'b Worksheet, LedgerError> {
        book.get_sheet_by_name(&self.sheet)
            .ok_or_else(|| self.missing_sheet(path))
    }

    fn missing_sheet(&self, path: &Path) -> LedgerError {
        LedgerError::SheetNotFound {
            path: path.display().to_string(),
            sheet: self.sheet.clone(),
        }
    }

    /// Serialize the workbook and move it over the original in one rename.
    fn save(path: &Path, book: &Spreadsheet) -> Result<(), LedgerError> {
        let mut buffer = Vec::new();
        umya_spreadsheet::writer::xlsx::write_writer(book, Cursor::new(&mut buffer))
            .map_err(|e| LedgerError::IoFailure(format!("{}: {e}", path.display())))?;

        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| classify_io(path, e))?;
        tmp.write_all(&buffer).map_err(|e| classify_io(path, e))?;
        tmp.as_file().sync_all().map_err(|e| classify_io(path, e))?;
        if let Ok(meta) = fs::metadata(path) {
            fs::set_permissions(tmp.path(), meta.permissions())
                .map_err(|e| classify_io(path, e))?;
        }
        tmp.persist(path).map_err(|e| classify_io(path, e.error))?;
        Ok(())
    }
}

fn key_filled(sheet: &Worksheet, row: u32) -> bool {
    sheet
        .get_cell((KEY_COLUMN, row))
        .is_some_and(|c| !c.get_value().trim().is_empty())
}

fn is_lock_error(err: &io::Error) -> bool {
    // 32/33: ERROR_SHARING_VIOLATION / ERROR_LOCK_VIOLATION
    err.kind() == io::ErrorKind::PermissionDenied
        || (cfg!(windows) && matches!(err.raw_os_error(), Some(32) | Some(33)))
}

fn classify_io(path: &Path, err: io::Error) -> LedgerError {
    if is_lock_error(&err) {
        LedgerError::Locked {
            path: path.display().to_string(),
        }
    } else {
        LedgerError::IoFailure(format!("{}: {err}", path.display()))
    }
}

impl LedgerWriter for XlsxLedger {
    fn append(&self, mode: Mode, row: &LedgerRow) -> Result<u32, LedgerError> {
        let path = self.existing_path(mode)?;
        let file = Self::open_for_write(path)?;
        let mut book = Self::load(path, file)?;

        let sheet = book
            .get_sheet_by_name_mut(&self.sheet)
            .ok_or_else(|| self.missing_sheet(path))?;

        let target = append_position(|r| key_filled(sheet, r));
        debug!(%mode, path = %path.display(), row = target, "append position located");

        for (offset, value) in row.cells().into_iter().enumerate() {
            let cell = sheet.get_cell_mut((FIRST_VALUE_COLUMN + offset as u32, target));
            match value {
                CellValue::Text(text) => {
                    cell.set_value_string(text);
                }
                CellValue::Number(number) => {
                    cell.set_value_number(number);
                }
            }
            cell.get_style_mut()
                .get_alignment_mut()
                .set_horizontal(HorizontalAlignmentValues::Center);
        }

        Self::save(path, &book)?;
        info!(%mode, path = %path.display(), row = target, key = row.key(), "ledger row appended");
        Ok(target)
    }
}

impl LedgerReader for XlsxLedger {
    fn next_free_row(&self, mode: Mode) -> Result<u32, LedgerError> {
        let (path, book) = self.read_only(mode)?;
        let sheet = self.sheet_of(&path, &book)?;
        Ok(append_position(|r| key_filled(sheet, r)))
    }

    fn read_row(&self, mode: Mode, row: u32) -> Result<Vec<CellValue>, LedgerError> {
        let (path, book) = self.read_only(mode)?;
        let sheet = self.sheet_of(&path, &book)?;

        let mut cells: Vec<CellValue> = (FIRST_VALUE_COLUMN..=sheet.get_highest_column())
            .map(|col| match sheet.get_cell((col, row)) {
                Some(cell) => match cell.get_value_number() {
                    Some(n) => CellValue::Number(n),
                    None => CellValue::Text(cell.get_value().into_owned()),
                },
                None => CellValue::Text(String::new()),
            })
            .collect();
        while cells.last().is_some_and(CellValue::is_blank) {
            cells.pop();
        }
        Ok(cells)
    }
}
