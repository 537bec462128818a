use std::path::PathBuf;

use caract_types::Mode;

use crate::error::StoreResult;
use crate::naming::SessionFolder;

/// Destination for committed session photos.
///
/// Implementations must make a repeated `persist` for the same mode, folder
/// and material overwrite the earlier file rather than add a second one.
pub trait PhotoArchive: Send + Sync {
    /// Write one material photo and return where it landed.
    fn persist(
        &self,
        mode: Mode,
        folder: &SessionFolder,
        material: &str,
        data: &[u8],
    ) -> StoreResult<PathBuf>;
}
