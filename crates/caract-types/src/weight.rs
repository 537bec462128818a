use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Normalize and parse an operator-entered weight in kilograms.
///
/// Both `.` and `,` are accepted as decimal separator. Blank input means
/// "nothing weighed" and yields `0.0`.
pub fn parse_weight(material: &str, raw: &str) -> Result<f64, ValidationError> {
    let invalid = |reason| ValidationError::InvalidWeight {
        material: material.to_string(),
        raw: raw.to_string(),
        reason,
    };

    let normalized = raw.trim().replace(',', ".");
    if normalized.is_empty() {
        return Ok(0.0);
    }

    let value: f64 = normalized.parse().map_err(|_| invalid("not a number"))?;
    if !value.is_finite() {
        return Err(invalid("not a finite number"));
    }
    if value < 0.0 {
        return Err(invalid("negative weight"));
    }
    // Folds -0.0 into 0.0.
    Ok(value + 0.0)
}

/// Sparse map of material name to the raw weight the operator typed.
///
/// Values are kept as entered; normalization happens in [`parse_weight`] so
/// the same text always yields the same number. Materials that are absent
/// weigh `0.0`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightEntry {
    entries: BTreeMap<String, String>,
}

impl WeightEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or overwrite) the raw weight for a material.
    pub fn set(&mut self, material: impl Into<String>, raw: impl Into<String>) {
        self.entries.insert(material.into(), raw.into());
    }

    pub fn get(&self, material: &str) -> Option<&str> {
        self.entries.get(material).map(String::as_str)
    }

    pub fn remove(&mut self, material: &str) -> Option<String> {
        self.entries.remove(material)
    }

    /// Parsed weight for a material, `0.0` when absent.
    pub fn weight(&self, material: &str) -> Result<f64, ValidationError> {
        match self.get(material) {
            Some(raw) => parse_weight(material, raw),
            None => Ok(0.0),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn materials(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(m, w)| (m.as_str(), w.as_str()))
    }
}

impl<M, W> FromIterator<(M, W)> for WeightEntry
where
    M: Into<String>,
    W: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (M, W)>>(iter: I) -> Self {
        let mut entry = Self::new();
        for (material, raw) in iter {
            entry.set(material, raw);
        }
        entry
    }
}
