//! Saved-images collection.
//!
//! Only ids are kept; the encoded form is a JSON array of ids stored under a
//! single key-value entry.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::model::ImageId;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BookmarkError {
    #[error("could not decode saved images: {0}")]
    Decode(String),

    #[error("could not encode saved images: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Toggled {
    Saved,
    Removed,
}

/// Entries written either as bare ids or, by older pages, as whole image
/// records carrying an `id` field.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredEntry {
    Id(ImageId),
    Record { id: ImageId },
}

impl StoredEntry {
    fn id(&self) -> ImageId {
        match self {
            Self::Id(id) | Self::Record { id } => *id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkStore {
    saved: BTreeSet<ImageId>,
}

impl BookmarkStore {
    /// Returns `true` if the id was not saved before.
    pub fn add(&mut self, id: ImageId) -> bool {
        self.saved.insert(id)
    }

    /// Returns `true` if the id was saved before.
    pub fn remove(&mut self, id: ImageId) -> bool {
        self.saved.remove(&id)
    }

    #[must_use]
    pub fn contains(&self, id: ImageId) -> bool {
        self.saved.contains(&id)
    }

    #[must_use]
    pub fn list(&self) -> &BTreeSet<ImageId> {
        &self.saved
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.saved.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }

    pub fn toggle(&mut self, id: ImageId) -> Toggled {
        if self.remove(id) {
            Toggled::Removed
        } else {
            self.add(id);
            Toggled::Saved
        }
    }

    /// Adds every id of `other`, keeping ids already saved here.
    ///
    /// Returns `true` when this store held ids missing from `other`, i.e. the
    /// copy `other` was read from no longer matches.
    pub fn merge(&mut self, other: BookmarkStore) -> bool {
        let diverged = !self.saved.is_subset(&other.saved);
        self.saved.extend(other.saved);
        diverged
    }

    pub fn encode(&self) -> Result<Vec<u8>, BookmarkError> {
        serde_json::to_vec(&self.saved).map_err(|e| BookmarkError::Encode(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, BookmarkError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let entries: Vec<StoredEntry> =
            serde_json::from_slice(bytes).map_err(|e| BookmarkError::Decode(e.to_string()))?;
        Ok(Self {
            saved: entries.iter().map(StoredEntry::id).collect(),
        })
    }
}

impl FromIterator<ImageId> for BookmarkStore {
    fn from_iter<I: IntoIterator<Item = ImageId>>(iter: I) -> Self {
        Self {
            saved: iter.into_iter().collect(),
        }
    }
}
