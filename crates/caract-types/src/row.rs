use std::fmt;

use serde::{Deserialize, Serialize};

use crate::mode::Mode;

/// A single value written into a ledger cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl CellValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    /// Whether the cell counts as empty for the append-position scan.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// One fully composed submission, ready to be appended to a ledger.
///
/// Layout: header cells (`[flux, date]` for incoming, `[flux, date, team,
/// location]` for outgoing) followed by one weight per taxonomy material in
/// taxonomy order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub mode: Mode,
    pub header: Vec<String>,
    pub weights: Vec<f64>,
}

impl LedgerRow {
    pub fn new(mode: Mode, header: Vec<String>, weights: Vec<f64>) -> Self {
        Self {
            mode,
            header,
            weights,
        }
    }

    /// The key column value (flux or client).
    pub fn key(&self) -> &str {
        self.header.first().map(String::as_str).unwrap_or_default()
    }

    /// The session date as entered.
    pub fn date(&self) -> &str {
        self.header.get(1).map(String::as_str).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.header.len() + self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All cells in column order.
    pub fn cells(&self) -> Vec<CellValue> {
        self.header
            .iter()
            .cloned()
            .map(CellValue::Text)
            .chain(self.weights.iter().copied().map(CellValue::Number))
            .collect()
    }
}
