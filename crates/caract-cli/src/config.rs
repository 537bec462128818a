use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use caract_ledger::{XlsxLedger, DEFAULT_SHEET};
use caract_store::{FsPhotoArchive, DEFAULT_PHOTO_ROOT};
use caract_types::{PresentationHints, Taxonomy};
use serde::{Deserialize, Serialize};

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "caract.toml";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaractConfig {
    pub ledger: LedgerConfig,
    pub photos: PhotoConfig,
    /// Deployment taxonomy file; the built-in catalog when absent.
    pub taxonomy: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub incoming: PathBuf,
    pub outgoing: PathBuf,
    pub sheet: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            incoming: PathBuf::from("Suivi CARACT_ENTRANT.xlsx"),
            outgoing: PathBuf::from("CARACT_SORTANT.xlsx"),
            sheet: DEFAULT_SHEET.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoConfig {
    pub root: PathBuf,
}

impl Default for PhotoConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_PHOTO_ROOT),
        }
    }
}

impl CaractConfig {
    /// Load an explicit file, or `caract.toml` if present, or defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.is_file() {
                    tracing::debug!("no {DEFAULT_CONFIG_FILE}; using defaults");
                    return Ok(Self::default());
                }
                fallback
            }
        };
        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn ledger(&self) -> XlsxLedger {
        XlsxLedger::new(
            &self.ledger.incoming,
            &self.ledger.outgoing,
            &self.ledger.sheet,
        )
    }

    pub fn archive(&self) -> FsPhotoArchive {
        FsPhotoArchive::new(&self.photos.root)
    }

    pub fn taxonomy(&self) -> anyhow::Result<(Taxonomy, PresentationHints)> {
        match &self.taxonomy {
            None => Ok((Taxonomy::builtin(), PresentationHints::builtin())),
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading taxonomy {}", path.display()))?;
                Taxonomy::from_toml_str(&text)
                    .with_context(|| format!("loading taxonomy {}", path.display()))
            }
        }
    }
}
