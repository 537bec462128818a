use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use chrono::NaiveDate;
use tracing::{debug, info, warn};

use caract_ledger::{LedgerWriter, RowComposer};
use caract_staging::PhotoStaging;
use caract_store::{PhotoArchive, SessionFolder};
use caract_types::{
    parse_weight, Location, Mode, SessionHeader, Taxonomy, Team, ValidationError, WeightEntry,
};

use crate::commit::CommitReceipt;
use crate::error::{CommitError, SessionError, SessionResult};

/// Lifecycle position of a [`Session`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No mode chosen.
    Idle,
    /// Mode chosen; header, weights and photos are being entered.
    Entering,
    /// Persisting photos and the ledger row.
    Committing,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "IDLE"),
            Self::Entering => write!(f, "ENTERING"),
            Self::Committing => write!(f, "COMMITTING"),
        }
    }
}

/// Everything the operator entered since choosing a mode.
#[derive(Debug)]
struct Draft {
    mode: Mode,
    header: SessionHeader,
    weights: WeightEntry,
    photos: PhotoStaging,
}

/// The single active characterization session of a running instance.
///
/// Weights and staged photos live and die together: both are dropped on a
/// successful commit or an explicit [`abandon`](Self::abandon), never one
/// without the other.
pub struct Session {
    taxonomy: Arc<Taxonomy>,
    state: SessionState,
    draft: Option<Draft>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("mode", &self.mode())
            .field("weights", &self.draft.as_ref().map(|d| d.weights.len()))
            .field("photos", &self.draft.as_ref().map(|d| d.photos.len()))
            .finish()
    }
}

impl Session {
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        Self {
            taxonomy,
            state: SessionState::Idle,
            draft: None,
        }
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mode(&self) -> Option<Mode> {
        self.draft.as_ref().map(|d| d.mode)
    }

    pub fn header(&self) -> Option<&SessionHeader> {
        self.draft.as_ref().map(|d| &d.header)
    }

    pub fn weights(&self) -> Option<&WeightEntry> {
        self.draft.as_ref().map(|d| &d.weights)
    }

    pub fn photos(&self) -> Option<&PhotoStaging> {
        self.draft.as_ref().map(|d| &d.photos)
    }

    fn draft_mut(&mut self) -> SessionResult<&mut Draft> {
        self.draft.as_mut().ok_or(SessionError::NotEntering)
    }

    // ---- Lifecycle ----

    /// Choose a mode and start entering, with a header defaulted to `today`.
    pub fn begin_on(&mut self, mode: Mode, today: NaiveDate) -> SessionResult<()> {
        if self.draft.is_some() {
            return Err(SessionError::AlreadyEntering);
        }
        let header = SessionHeader::fresh(mode, &self.taxonomy, today);
        self.draft = Some(Draft {
            mode,
            header,
            weights: WeightEntry::new(),
            photos: PhotoStaging::new(),
        });
        self.state = SessionState::Entering;
        debug!(%mode, "session started");
        Ok(())
    }

    /// [`begin_on`](Self::begin_on) with the local calendar date.
    pub fn begin(&mut self, mode: Mode) -> SessionResult<()> {
        self.begin_on(mode, chrono::Local::now().date_naive())
    }

    /// Drop everything entered and return to `IDLE`. Idempotent.
    pub fn abandon(&mut self) {
        if let Some(draft) = self.draft.take() {
            debug!(mode = %draft.mode, "session abandoned");
        }
        self.state = SessionState::Idle;
    }

    // ---- Header ----

    /// Replace the whole header after checking it against the mode.
    pub fn set_header(&mut self, header: SessionHeader) -> SessionResult<()> {
        let taxonomy = Arc::clone(&self.taxonomy);
        let draft = self.draft_mut()?;
        header.validate(draft.mode, &taxonomy)?;
        draft.header = header;
        Ok(())
    }

    pub fn set_date(&mut self, date: impl Into<String>) -> SessionResult<()> {
        let date = date.into();
        if date.trim().is_empty() {
            return Err(ValidationError::EmptyDate.into());
        }
        self.draft_mut()?.header.date = date;
        Ok(())
    }

    pub fn set_flux_or_client(&mut self, value: impl Into<String>) -> SessionResult<()> {
        let value = value.into();
        let taxonomy = Arc::clone(&self.taxonomy);
        let draft = self.draft_mut()?;
        if !taxonomy.has_source(draft.mode, &value) {
            return Err(ValidationError::UnknownSource {
                mode: draft.mode,
                value,
            }
            .into());
        }
        draft.header.flux_or_client = value;
        Ok(())
    }

    pub fn set_team(&mut self, team: Team) -> SessionResult<()> {
        self.draft_mut()?.header.team = team;
        Ok(())
    }

    pub fn set_location(&mut self, location: Location) -> SessionResult<()> {
        self.draft_mut()?.header.location = location;
        Ok(())
    }

    // ---- Weights ----

    fn check_material(&self, mode: Mode, material: &str) -> SessionResult<()> {
        if !self.taxonomy.contains(mode, material) {
            return Err(ValidationError::UnknownMaterial {
                mode,
                material: material.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Record the raw weight typed for a material.
    ///
    /// Unparseable input is rejected here and the previous value is kept.
    pub fn set_weight(&mut self, material: &str, raw: impl Into<String>) -> SessionResult<f64> {
        let mode = self.mode().ok_or(SessionError::NotEntering)?;
        self.check_material(mode, material)?;
        let raw = raw.into();
        let value = parse_weight(material, &raw)?;
        self.draft_mut()?.weights.set(material, raw);
        Ok(value)
    }

    pub fn clear_weight(&mut self, material: &str) -> SessionResult<()> {
        self.draft_mut()?.weights.remove(material);
        Ok(())
    }

    // ---- Photos ----

    /// Stage a captured photo, replacing any earlier one for the material.
    pub fn stage_photo(&mut self, material: &str, data: impl Into<Bytes>) -> SessionResult<()> {
        let mode = self.mode().ok_or(SessionError::NotEntering)?;
        self.check_material(mode, material)?;
        self.draft_mut()?.photos.stage(material, data)?;
        Ok(())
    }

    pub fn discard_photo(&mut self, material: &str) -> SessionResult<()> {
        self.draft_mut()?.photos.discard(material);
        Ok(())
    }

    // ---- Commit ----

    /// Persist staged photos, then append the ledger row, then reset.
    ///
    /// On failure the session goes back to `ENTERING` untouched. Photos
    /// written before a ledger failure stay on disk; a retry overwrites them.
    pub fn commit(
        &mut self,
        ledger: &dyn LedgerWriter,
        archive: &dyn PhotoArchive,
    ) -> Result<CommitReceipt, CommitError> {
        let draft = self.draft.as_ref().ok_or(CommitError::NotEntering)?;
        self.state = SessionState::Committing;

        match persist(&self.taxonomy, draft, ledger, archive) {
            Ok(receipt) => {
                info!(
                    mode = %receipt.mode,
                    key = %receipt.flux_or_client,
                    row = receipt.row,
                    photos = receipt.photos.len(),
                    "session committed"
                );
                self.draft = None;
                self.state = SessionState::Idle;
                Ok(receipt)
            }
            Err(err) => {
                warn!(mode = %draft.mode, error = %err, "commit failed; session kept for retry");
                self.state = SessionState::Entering;
                Err(err)
            }
        }
    }
}

fn persist(
    taxonomy: &Taxonomy,
    draft: &Draft,
    ledger: &dyn LedgerWriter,
    archive: &dyn PhotoArchive,
) -> Result<CommitReceipt, CommitError> {
    let folder = SessionFolder::derive(&draft.header).map_err(CommitError::SessionFolder)?;

    let mut photos = Vec::with_capacity(draft.photos.len());
    for photo in draft.photos.snapshot() {
        let path = archive
            .persist(draft.mode, &folder, &photo.material, &photo.data)
            .map_err(|source| CommitError::PhotoWriteFailed {
                material: photo.material.clone(),
                source,
            })?;
        photos.push(path);
    }

    let row = RowComposer::new(taxonomy).compose(draft.mode, &draft.header, &draft.weights)?;
    let index = ledger.append(draft.mode, &row)?;

    Ok(CommitReceipt {
        mode: draft.mode,
        flux_or_client: draft.header.flux_or_client.clone(),
        date: draft.header.date.clone(),
        row: index,
        folder: folder.to_string(),
        photos,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use caract_ledger::InMemoryLedger;
    use caract_store::FsPhotoArchive;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn session() -> Session {
        Session::new(Arc::new(Taxonomy::builtin()))
    }

    #[test]
    fn starts_idle_and_rejects_edits() {
        let mut s = session();
        assert_eq!(s.state(), SessionState::Idle);
        assert_eq!(s.set_weight("CARTON", "1"), Err(SessionError::NotEntering));
        assert_eq!(s.stage_photo("CARTON", vec![1u8]), Err(SessionError::NotEntering));
    }

    #[test]
    fn begin_sets_fresh_header() {
        let mut s = session();
        s.begin_on(Mode::Incoming, day()).unwrap();
        assert_eq!(s.state(), SessionState::Entering);
        let header = s.header().unwrap();
        assert_eq!(header.date, "01-01-2025");
        assert_eq!(header.flux_or_client, "GARE MONTPARNASSE");
        assert_eq!(s.begin_on(Mode::Outgoing, day()), Err(SessionError::AlreadyEntering));
    }

    #[test]
    fn invalid_weight_keeps_previous_value() {
        let mut s = session();
        s.begin_on(Mode::Outgoing, day()).unwrap();
        assert_eq!(s.set_weight("ALU", "2,5").unwrap(), 2.5);
        assert!(matches!(
            s.set_weight("ALU", "deux"),
            Err(SessionError::Validation(ValidationError::InvalidWeight { .. }))
        ));
        assert_eq!(s.weights().unwrap().get("ALU"), Some("2,5"));
    }

    #[test]
    fn materials_outside_mode_are_rejected() {
        let mut s = session();
        s.begin_on(Mode::Outgoing, day()).unwrap();
        assert!(matches!(
            s.set_weight("CARTONNETTE", "1"),
            Err(SessionError::Validation(ValidationError::UnknownMaterial { .. }))
        ));
        assert!(s.stage_photo("BOIS", vec![1u8]).is_err());
    }

    #[test]
    fn header_fields_are_validated() {
        let mut s = session();
        s.begin_on(Mode::Incoming, day()).unwrap();
        s.set_flux_or_client("SNCF").unwrap();
        assert!(s.set_flux_or_client("PETQ9").is_err());
        assert_eq!(s.set_date(""), Err(SessionError::Validation(ValidationError::EmptyDate)));
        s.set_team(Team::Afternoon).unwrap();
        s.set_location(Location::Compactor).unwrap();
        let header = s.header().unwrap();
        assert_eq!(header.flux_or_client, "SNCF");
        assert_eq!(header.team, Team::Afternoon);
    }

    #[test]
    fn abandon_is_idempotent_and_clears_everything() {
        let mut s = session();
        s.begin_on(Mode::Incoming, day()).unwrap();
        s.set_weight("CARTON", "1").unwrap();
        s.stage_photo("CARTON", vec![1u8]).unwrap();
        s.abandon();
        s.abandon();
        assert_eq!(s.state(), SessionState::Idle);
        assert!(s.weights().is_none());
        assert!(s.photos().is_none());
    }

    #[test]
    fn commit_without_session_is_rejected() {
        let mut s = session();
        let ledger = InMemoryLedger::provisioned();
        let archive = FsPhotoArchive::default();
        assert!(matches!(
            s.commit(&ledger, &archive),
            Err(CommitError::NotEntering)
        ));
        assert_eq!(s.state(), SessionState::Idle);
    }

    #[test]
    fn successful_commit_resets_to_idle() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session();
        let ledger = InMemoryLedger::provisioned();
        let archive = FsPhotoArchive::new(dir.path());

        s.begin_on(Mode::Incoming, day()).unwrap();
        s.set_flux_or_client("SNCF").unwrap();
        s.set_weight("CARTON", "12,5").unwrap();
        let receipt = s.commit(&ledger, &archive).unwrap();

        assert_eq!(receipt.row, 2);
        assert_eq!(receipt.flux_or_client, "SNCF");
        assert!(receipt.photos.is_empty());
        assert_eq!(s.state(), SessionState::Idle);
        assert!(s.header().is_none());
    }
}
