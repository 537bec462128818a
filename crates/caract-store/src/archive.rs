use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use caract_types::Mode;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::format::ImageFormat;
use crate::naming::{sanitize_component, SessionFolder};
use crate::traits::PhotoArchive;

/// Default archive root, relative to the working directory.
pub const DEFAULT_PHOTO_ROOT: &str = "PHOTOS_CARACT";

/// Filesystem photo archive rooted at a directory.
#[derive(Clone, Debug)]
pub struct FsPhotoArchive {
    root: PathBuf,
}

impl FsPhotoArchive {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding a session's photos.
    pub fn session_dir(&self, mode: Mode, folder: &SessionFolder) -> PathBuf {
        self.root.join(mode.subtype()).join(folder.as_str())
    }

    /// Final path of a material photo, extension picked from the content.
    pub fn photo_path(
        &self,
        mode: Mode,
        folder: &SessionFolder,
        material: &str,
        data: &[u8],
    ) -> StoreResult<PathBuf> {
        let stem = sanitize_component(material)?;
        let name = format!("{stem}.{}", ImageFormat::extension_for(data));
        Ok(self.session_dir(mode, folder).join(name))
    }
}

impl Default for FsPhotoArchive {
    fn default() -> Self {
        Self::new(DEFAULT_PHOTO_ROOT)
    }
}

impl PhotoArchive for FsPhotoArchive {
    fn persist(
        &self,
        mode: Mode,
        folder: &SessionFolder,
        material: &str,
        data: &[u8],
    ) -> StoreResult<PathBuf> {
        let target = self.photo_path(mode, folder, material, data)?;
        let dir = self.session_dir(mode, folder);
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| StoreError::io(&dir, e))?;
        tmp.write_all(data).map_err(|e| StoreError::io(tmp.path(), e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| StoreError::io(&target, e))?;
        tmp.persist(&target)
            .map_err(|e| StoreError::io(&target, e.error))?;
        remove_other_formats(&target)?;

        debug!(%mode, material, path = %target.display(), bytes = data.len(), "photo persisted");
        Ok(target)
    }
}

/// Drop earlier captures of the same material saved under another extension,
/// so a material keeps a single file per session folder.
fn remove_other_formats(target: &Path) -> StoreResult<()> {
    let current = target.extension().and_then(|e| e.to_str());
    for format in ImageFormat::ALL {
        if current == Some(format.extension()) {
            continue;
        }
        let stale = target.with_extension(format.extension());
        match fs::remove_file(&stale) {
            Ok(()) => debug!(path = %stale.display(), "stale photo removed"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(StoreError::io(&stale, e)),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use caract_types::{Location, SessionHeader, Team};

    const JPEG: &[u8] = &[0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10];

    fn folder() -> SessionFolder {
        SessionFolder::derive(&SessionHeader::new(
            "01-01-2025",
            "SNCF",
            Team::Morning,
            Location::Silo,
        ))
        .unwrap()
    }

    #[test]
    fn writes_under_mode_and_session_folder() {
        let dir = tempfile::tempdir().unwrap();
        let archive = FsPhotoArchive::new(dir.path().join(DEFAULT_PHOTO_ROOT));
        let path = archive
            .persist(Mode::Incoming, &folder(), "CARTON", JPEG)
            .unwrap();

        assert_eq!(
            path,
            dir.path()
                .join("PHOTOS_CARACT")
                .join("ENTRANT")
                .join("SNCF_01-01-2025")
                .join("CARTON.jpg")
        );
        assert_eq!(fs::read(&path).unwrap(), JPEG);
    }

    #[test]
    fn retry_overwrites_same_file() {
        let dir = tempfile::tempdir().unwrap();
        let archive = FsPhotoArchive::new(dir.path());
        let first = archive.persist(Mode::Outgoing, &folder(), "ELA", JPEG).unwrap();
        let mut second_bytes = JPEG.to_vec();
        second_bytes.push(0x42);
        let second = archive
            .persist(Mode::Outgoing, &folder(), "ELA", &second_bytes)
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(fs::read(&second).unwrap(), second_bytes);
        let files = fs::read_dir(archive.session_dir(Mode::Outgoing, &folder()))
            .unwrap()
            .count();
        assert_eq!(files, 1);
    }

    #[test]
    fn format_change_replaces_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let archive = FsPhotoArchive::new(dir.path());
        let png: &[u8] = b"\x89PNG\r\n\x1a\n\0\0";
        archive.persist(Mode::Outgoing, &folder(), "ELA", JPEG).unwrap();
        let path = archive.persist(Mode::Outgoing, &folder(), "ELA", png).unwrap();

        assert_eq!(path.file_name().unwrap(), "ELA.png");
        let names: Vec<_> = fs::read_dir(archive.session_dir(Mode::Outgoing, &folder()))
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["ELA.png"]);
    }

    #[test]
    fn other_materials_are_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let archive = FsPhotoArchive::new(dir.path());
        archive.persist(Mode::Incoming, &folder(), "ALU", JPEG).unwrap();
        archive.persist(Mode::Incoming, &folder(), "ACIER", JPEG).unwrap();
        assert_eq!(
            fs::read_dir(archive.session_dir(Mode::Incoming, &folder())).unwrap().count(),
            2
        );
    }

    #[test]
    fn material_with_slash_stays_in_session_folder() {
        let dir = tempfile::tempdir().unwrap();
        let archive = FsPhotoArchive::new(dir.path());
        let path = archive
            .persist(Mode::Incoming, &folder(), "EMBALLAGES NON VIDES / SOUILLÉS", JPEG)
            .unwrap();
        assert_eq!(path.parent().unwrap(), archive.session_dir(Mode::Incoming, &folder()));
    }

    #[test]
    fn blocked_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        // A plain file where the mode directory should be.
        fs::write(dir.path().join("ENTRANT"), b"x").unwrap();
        let archive = FsPhotoArchive::new(dir.path());
        let err = archive
            .persist(Mode::Incoming, &folder(), "CARTON", JPEG)
            .unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
