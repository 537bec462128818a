use thiserror::Error;

use crate::mode::Mode;

/// Errors produced while validating operator input or taxonomy data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid weight for {material}: {raw:?} ({reason})")]
    InvalidWeight {
        material: String,
        raw: String,
        reason: &'static str,
    },

    #[error("material {material:?} is not part of the {mode} taxonomy")]
    UnknownMaterial { mode: Mode, material: String },

    #[error("{value:?} is not a known {mode} flux/client")]
    UnknownSource { mode: Mode, value: String },

    #[error("unknown mode: {0}")]
    UnknownMode(String),

    #[error("unknown team: {0}")]
    UnknownTeam(String),

    #[error("unknown location: {0}")]
    UnknownLocation(String),

    #[error("session date must not be empty")]
    EmptyDate,

    #[error("invalid taxonomy: {0}")]
    Taxonomy(String),
}
