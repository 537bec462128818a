use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Recording context of a characterization session.
///
/// The mode selects the taxonomy, the flux/client list, the ledger store and
/// the header shape of the written row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    /// Incoming material characterization (per client).
    Incoming,
    /// Outgoing material characterization (per sorted flux).
    Outgoing,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Incoming, Mode::Outgoing];

    /// Directory name used under the photo root.
    pub fn subtype(&self) -> &'static str {
        match self {
            Self::Incoming => "ENTRANT",
            Self::Outgoing => "SORTANT",
        }
    }

    /// Operator-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Incoming => "CARACT ENTRANT",
            Self::Outgoing => "CARACT SORTANT",
        }
    }

    /// Number of header cells preceding the weights in a ledger row.
    pub fn header_width(&self) -> usize {
        match self {
            Self::Incoming => 2,
            Self::Outgoing => 4,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incoming => write!(f, "INCOMING"),
            Self::Outgoing => write!(f, "OUTGOING"),
        }
    }
}

impl FromStr for Mode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INCOMING" | "ENTRANT" | "CARACT ENTRANT" => Ok(Self::Incoming),
            "OUTGOING" | "SORTANT" | "CARACT SORTANT" => Ok(Self::Outgoing),
            _ => Err(ValidationError::UnknownMode(s.to_string())),
        }
    }
}

/// Shift that performed the characterization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Team {
    #[default]
    Morning,
    Afternoon,
}

impl Team {
    /// Value written to the ledger.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Morning => "MATIN",
            Self::Afternoon => "APRES-MIDI",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Team {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MORNING" | "MATIN" => Ok(Self::Morning),
            "AFTERNOON" | "APRES-MIDI" => Ok(Self::Afternoon),
            _ => Err(ValidationError::UnknownTeam(s.to_string())),
        }
    }
}

/// Place on site where the sample was taken.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Location {
    #[default]
    Silo,
    Cabin,
    Compactor,
    Collection,
}

impl Location {
    pub const ALL: [Location; 4] = [
        Location::Silo,
        Location::Cabin,
        Location::Compactor,
        Location::Collection,
    ];

    /// Value written to the ledger.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Silo => "SILO",
            Self::Cabin => "CABINE",
            Self::Compactor => "COMPACTEUR",
            Self::Collection => "COLLECTE",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Location {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SILO" => Ok(Self::Silo),
            "CABIN" | "CABINE" => Ok(Self::Cabin),
            "COMPACTOR" | "COMPACTEUR" => Ok(Self::Compactor),
            "COLLECTION" | "COLLECTE" => Ok(Self::Collection),
            _ => Err(ValidationError::UnknownLocation(s.to_string())),
        }
    }
}
