//! Staged photo entries.

use std::time::SystemTime;

use bytes::Bytes;

/// A captured photo held in memory until the session commits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StagedPhoto {
    /// Material the photo documents.
    pub material: String,
    /// Raw image bytes as captured.
    pub data: Bytes,
    /// When the photo was staged (last replacement wins).
    pub staged_at: SystemTime,
}

impl StagedPhoto {
    pub fn new(material: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            material: material.into(),
            data: data.into(),
            staged_at: SystemTime::now(),
        }
    }

    /// Size of the image in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_entry_keeps_bytes() {
        let photo = StagedPhoto::new("CARTON", vec![0xff, 0xd8, 0xff]);
        assert_eq!(photo.material, "CARTON");
        assert_eq!(photo.size(), 3);
        assert_eq!(&photo.data[..], &[0xff, 0xd8, 0xff]);
    }
}
