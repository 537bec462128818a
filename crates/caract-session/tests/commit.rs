//! End-to-end commit scenarios: photos, ledger and session reset together.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use caract_ledger::{
    InMemoryLedger, LedgerError, LedgerReader, XlsxLedger, DEFAULT_SHEET, KEY_COLUMN,
};
use caract_session::{CommitError, Session, SessionState};
use caract_store::FsPhotoArchive;
use caract_types::{CellValue, Location, Mode, Taxonomy, Team};
use chrono::NaiveDate;

const JPEG: &[u8] = &[0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10, 0x4a, 0x46];

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

fn outgoing_session(flux: &str) -> Session {
    let mut session = Session::new(Arc::new(Taxonomy::builtin()));
    session.begin_on(Mode::Outgoing, day()).unwrap();
    session.set_flux_or_client(flux).unwrap();
    session.set_team(Team::Afternoon).unwrap();
    session.set_location(Location::Cabin).unwrap();
    session
}

#[test]
fn locked_ledger_keeps_photo_on_disk_and_in_staging() {
    let dir = tempfile::tempdir().unwrap();
    let archive = FsPhotoArchive::new(dir.path());
    let ledger = InMemoryLedger::provisioned();
    ledger.set_locked(Mode::Outgoing, true).unwrap();

    let mut session = outgoing_session("ELA");
    session.set_weight("ELA", "4,2").unwrap();
    session.stage_photo("ELA", JPEG).unwrap();

    let err = session.commit(&ledger, &archive).unwrap_err();
    assert!(matches!(err, CommitError::Ledger(LedgerError::Locked { .. })));

    let photo = dir.path().join("SORTANT").join("ELA_01-01-2025").join("ELA.jpg");
    assert_eq!(fs::read(&photo).unwrap(), JPEG);
    assert_eq!(ledger.data_rows(Mode::Outgoing).unwrap(), 0);
    assert_eq!(session.state(), SessionState::Entering);
    assert!(session.photos().unwrap().contains("ELA"));
    assert_eq!(session.weights().unwrap().get("ELA"), Some("4,2"));

    // Retry once the workbook is closed: same file, one row.
    ledger.set_locked(Mode::Outgoing, false).unwrap();
    let receipt = session.commit(&ledger, &archive).unwrap();
    assert_eq!(receipt.row, 2);
    assert_eq!(receipt.photos, vec![photo.clone()]);
    assert_eq!(fs::read_dir(photo.parent().unwrap()).unwrap().count(), 1);
    assert_eq!(session.state(), SessionState::Idle);
}

#[test]
fn recapture_in_other_format_leaves_one_file_after_retry() {
    let dir = tempfile::tempdir().unwrap();
    let archive = FsPhotoArchive::new(dir.path());
    let ledger = InMemoryLedger::provisioned();
    ledger.set_locked(Mode::Outgoing, true).unwrap();

    let mut session = outgoing_session("ELA");
    session.stage_photo("ELA", JPEG).unwrap();
    assert!(session.commit(&ledger, &archive).is_err());

    let png: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
    session.stage_photo("ELA", png).unwrap();
    ledger.set_locked(Mode::Outgoing, false).unwrap();
    let receipt = session.commit(&ledger, &archive).unwrap();

    let folder = dir.path().join("SORTANT").join("ELA_01-01-2025");
    let mut names: Vec<String> = fs::read_dir(&folder)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, vec!["ELA.png"]);
    assert_eq!(receipt.photos, vec![folder.join("ELA.png")]);
    assert_eq!(fs::read(folder.join("ELA.png")).unwrap(), png);
}

#[test]
fn failed_photo_write_touches_neither_staging_nor_ledger() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("SORTANT"), b"not a directory").unwrap();
    let archive = FsPhotoArchive::new(dir.path());
    let ledger = InMemoryLedger::provisioned();

    let mut session = outgoing_session("CARTON");
    session.set_weight("CARTON", "10").unwrap();
    session.stage_photo("CARTON", JPEG).unwrap();
    let before = session.photos().unwrap().snapshot();

    let err = session.commit(&ledger, &archive).unwrap_err();
    assert!(
        matches!(err, CommitError::PhotoWriteFailed { ref material, .. } if material == "CARTON")
    );
    assert_eq!(session.photos().unwrap().snapshot(), before);
    assert_eq!(ledger.data_rows(Mode::Outgoing).unwrap(), 0);
    assert_eq!(session.state(), SessionState::Entering);
}

#[test]
fn missing_ledger_store_preserves_session() {
    let dir = tempfile::tempdir().unwrap();
    let archive = FsPhotoArchive::new(dir.path());
    let ledger = InMemoryLedger::new();

    let mut session = outgoing_session("GM");
    session.set_weight("GM", "1").unwrap();
    let err = session.commit(&ledger, &archive).unwrap_err();
    assert!(matches!(err, CommitError::Ledger(LedgerError::NotFound { .. })));
    assert_eq!(session.header().unwrap().flux_or_client, "GM");
}

#[test]
fn consecutive_sessions_fill_consecutive_rows() {
    let dir = tempfile::tempdir().unwrap();
    let archive = FsPhotoArchive::new(dir.path());
    let ledger = InMemoryLedger::provisioned();
    let mut session = Session::new(Arc::new(Taxonomy::builtin()));

    for (i, client) in ["SNCF", "CDG", "ORLY", "SNCF"].iter().enumerate() {
        session.begin_on(Mode::Incoming, day()).unwrap();
        session.set_flux_or_client(*client).unwrap();
        session.set_weight("FINES", format!("{i},5")).unwrap();
        let receipt = session.commit(&ledger, &archive).unwrap();
        assert_eq!(receipt.row, 2 + i as u32);
    }

    assert_eq!(ledger.next_free_row(Mode::Incoming).unwrap(), 6);
    assert_eq!(ledger.cell(Mode::Incoming, 4, KEY_COLUMN), Some(CellValue::from("ORLY")));
}

fn provision_workbook(path: &Path) {
    let mut book = umya_spreadsheet::new_file();
    book.new_sheet(DEFAULT_SHEET).unwrap();
    umya_spreadsheet::writer::xlsx::write(&book, path).unwrap();
}

#[test]
fn incoming_session_lands_in_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let incoming = dir.path().join("Suivi CARACT_ENTRANT.xlsx");
    let outgoing = dir.path().join("CARACT_SORTANT.xlsx");
    provision_workbook(&incoming);
    provision_workbook(&outgoing);
    let ledger = XlsxLedger::new(&incoming, &outgoing, DEFAULT_SHEET);
    let archive = FsPhotoArchive::new(dir.path().join("PHOTOS_CARACT"));

    let mut session = Session::new(Arc::new(Taxonomy::builtin()));
    session.begin_on(Mode::Incoming, day()).unwrap();
    session.set_flux_or_client("SNCF").unwrap();
    session.set_weight("CARTON", "12,5").unwrap();
    session.stage_photo("CARTON", JPEG).unwrap();
    let receipt = session.commit(&ledger, &archive).unwrap();

    assert_eq!(receipt.row, 2);
    assert_eq!(receipt.folder, "SNCF_01-01-2025");
    assert!(receipt.photos[0].ends_with("ENTRANT/SNCF_01-01-2025/CARTON.jpg"));

    let cells = ledger.read_row(Mode::Incoming, 2).unwrap();
    assert_eq!(cells[0], CellValue::from("SNCF"));
    assert_eq!(cells[1], CellValue::from("01-01-2025"));
    assert_eq!(cells[2], CellValue::from(12.5));
    assert_eq!(ledger.next_free_row(Mode::Outgoing).unwrap(), 2);
}
