//! The staging area holding one pending photo per material.
//!
//! [`PhotoStaging`] manages a `BTreeMap<String, StagedPhoto>`. Staging a
//! material twice replaces the earlier photo. Nothing here touches the
//! filesystem.

use std::collections::BTreeMap;

use bytes::Bytes;
use tracing::debug;

use crate::entry::StagedPhoto;
use crate::error::{StagingError, StagingResult};

/// Session-scoped staging area for captured photos.
#[derive(Clone, Default)]
pub struct PhotoStaging {
    entries: BTreeMap<String, StagedPhoto>,
}

impl std::fmt::Debug for PhotoStaging {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoStaging")
            .field("materials", &self.entries.keys().collect::<Vec<_>>())
            .field("bytes", &self.total_bytes())
            .finish()
    }
}

impl PhotoStaging {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of staged photos.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, material: &str) -> Option<&StagedPhoto> {
        self.entries.get(material)
    }

    pub fn contains(&self, material: &str) -> bool {
        self.entries.contains_key(material)
    }

    pub fn materials(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn total_bytes(&self) -> usize {
        self.entries.values().map(StagedPhoto::size).sum()
    }

    /// Stage a photo for a material, replacing any earlier one.
    ///
    /// Returns the replaced photo, if any.
    pub fn stage(
        &mut self,
        material: &str,
        data: impl Into<Bytes>,
    ) -> StagingResult<Option<StagedPhoto>> {
        if material.trim().is_empty() {
            return Err(StagingError::EmptyMaterial);
        }
        let data = data.into();
        if data.is_empty() {
            return Err(StagingError::EmptyPhoto(material.to_string()));
        }

        debug!(material, bytes = data.len(), "photo staged");
        Ok(self
            .entries
            .insert(material.to_string(), StagedPhoto::new(material, data)))
    }

    /// Drop the staged photo for a material. No-op if none is staged.
    pub fn discard(&mut self, material: &str) -> Option<StagedPhoto> {
        let removed = self.entries.remove(material);
        if removed.is_some() {
            debug!(material, "staged photo discarded");
        }
        removed
    }

    /// Drop every staged photo.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Read-only copy of the staged photos for commit.
    ///
    /// Buffers are reference-counted, so this does not copy image data.
    pub fn snapshot(&self) -> Vec<StagedPhoto> {
        self.entries.values().cloned().collect()
    }
}
