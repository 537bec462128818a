use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::mode::{Location, Mode, Team};
use crate::taxonomy::Taxonomy;

/// Date format used on the form and in the ledger (`dd-mm-YYYY`).
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Identifying fields of a characterization session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionHeader {
    /// Date as entered by the operator.
    pub date: String,
    /// Flux (outgoing) or client (incoming), from the mode's source list.
    pub flux_or_client: String,
    pub team: Team,
    pub location: Location,
}

impl SessionHeader {
    pub fn new(
        date: impl Into<String>,
        flux_or_client: impl Into<String>,
        team: Team,
        location: Location,
    ) -> Self {
        Self {
            date: date.into(),
            flux_or_client: flux_or_client.into(),
            team,
            location,
        }
    }

    /// Default header shown when a session begins: the given day, the first
    /// flux/client of the mode, morning team, silo.
    pub fn fresh(mode: Mode, taxonomy: &Taxonomy, today: NaiveDate) -> Self {
        Self {
            date: today.format(DATE_FORMAT).to_string(),
            flux_or_client: taxonomy
                .sources(mode)
                .first()
                .cloned()
                .unwrap_or_default(),
            team: Team::default(),
            location: Location::default(),
        }
    }

    /// Check the header against the mode's source list.
    pub fn validate(&self, mode: Mode, taxonomy: &Taxonomy) -> Result<(), ValidationError> {
        if self.date.trim().is_empty() {
            return Err(ValidationError::EmptyDate);
        }
        if !taxonomy.has_source(mode, &self.flux_or_client) {
            return Err(ValidationError::UnknownSource {
                mode,
                value: self.flux_or_client.clone(),
            });
        }
        Ok(())
    }

    /// Header cells for the ledger row of the given mode.
    pub fn cells(&self, mode: Mode) -> Vec<String> {
        let mut cells = vec![self.flux_or_client.clone(), self.date.clone()];
        if mode == Mode::Outgoing {
            cells.push(self.team.label().to_string());
            cells.push(self.location.label().to_string());
        }
        cells
    }
}
