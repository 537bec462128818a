//! Path component naming for session folders and photo files.

use std::fmt;

use caract_types::{path_component, SessionHeader};

use crate::error::{StoreError, StoreResult};

/// Make a display name safe to use as a single path component.
///
/// See [`path_component`] for the mapping; a name with nothing usable left
/// is [`StoreError::InvalidName`].
pub fn sanitize_component(name: &str) -> StoreResult<String> {
    path_component(name).ok_or_else(|| StoreError::InvalidName(name.to_string()))
}

/// Folder grouping the photos of one session: `<flux>_<date-with-dashes>`.
///
/// Two sessions sharing mode, flux and date share a folder; later photos are
/// added next to (or over, for the same material) the earlier ones.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionFolder(String);

impl SessionFolder {
    pub fn derive(header: &SessionHeader) -> StoreResult<Self> {
        let flux = sanitize_component(&header.flux_or_client)?;
        let date = sanitize_component(&header.date.replace(['/', '.'], "-"))?;
        Ok(Self(format!("{flux}_{date}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
