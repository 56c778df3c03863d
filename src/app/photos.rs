// SPDX-License-Identifier: GPL-3.0-only

//! In-memory photo roll
//!
//! Photos live only for the session. The roll is ordered newest first and
//! ids are unique; every mutation goes through [`PhotoStore`].

use chrono::{DateTime, Local};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

/// Stable photo identifier, derived from creation time in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhotoId(String);

impl PhotoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PhotoId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Hands out time-derived ids that never repeat within a session
///
/// Two photos created in the same millisecond get consecutive values.
#[derive(Debug, Default)]
pub struct PhotoIdGenerator {
    last: i64,
}

impl PhotoIdGenerator {
    pub fn next(&mut self, now: DateTime<Local>) -> PhotoId {
        let millis = now.timestamp_millis().max(self.last + 1);
        self.last = millis;
        PhotoId(millis.to_string())
    }
}

/// A captured or imported still
#[derive(Clone, PartialEq)]
pub struct Photo {
    pub id: PhotoId,
    /// Self-contained PNG payload
    pub data: Arc<[u8]>,
    pub created_at: DateTime<Local>,
    /// Preset the current pixels were rendered with
    pub filter_id: String,
    /// Set only by a successful remote enhancement
    pub ai_enhanced: bool,
}

impl fmt::Debug for Photo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Photo")
            .field("id", &self.id)
            .field("bytes", &self.data.len())
            .field("created_at", &self.created_at)
            .field("filter_id", &self.filter_id)
            .field("ai_enhanced", &self.ai_enhanced)
            .finish()
    }
}

/// Field changes for an existing photo; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotoPatch {
    pub data: Option<Arc<[u8]>>,
    pub filter_id: Option<String>,
    pub ai_enhanced: Option<bool>,
}

impl PhotoPatch {
    fn apply_to(self, photo: &mut Photo) {
        if let Some(data) = self.data {
            photo.data = data;
        }
        if let Some(filter_id) = self.filter_id {
            photo.filter_id = filter_id;
        }
        if let Some(ai_enhanced) = self.ai_enhanced {
            photo.ai_enhanced = ai_enhanced;
        }
    }
}

/// Replace the single photo matching `id`; unchanged collection if absent
pub fn apply_patch(
    mut photos: VecDeque<Photo>,
    id: &PhotoId,
    patch: PhotoPatch,
) -> VecDeque<Photo> {
    if let Some(photo) = photos.iter_mut().find(|p| &p.id == id) {
        patch.apply_to(photo);
    }
    photos
}

/// Session photo roll, newest first
#[derive(Debug, Default)]
pub struct PhotoStore {
    photos: VecDeque<Photo>,
}

impl PhotoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a photo. Returns false (and drops it) if the id is taken.
    pub fn add(&mut self, photo: Photo) -> bool {
        if self.find(&photo.id).is_some() {
            return false;
        }
        self.photos.push_front(photo);
        true
    }

    /// Patch the photo with `id`. Returns whether it existed.
    pub fn update(&mut self, id: &PhotoId, patch: PhotoPatch) -> bool {
        let exists = self.find(id).is_some();
        self.photos = apply_patch(std::mem::take(&mut self.photos), id, patch);
        exists
    }

    /// Remove and return the photo with `id`
    pub fn delete(&mut self, id: &PhotoId) -> Option<Photo> {
        let index = self.photos.iter().position(|p| &p.id == id)?;
        self.photos.remove(index)
    }

    pub fn find(&self, id: &PhotoId) -> Option<&Photo> {
        self.photos.iter().find(|p| &p.id == id)
    }

    pub fn first(&self) -> Option<&Photo> {
        self.photos.front()
    }

    pub fn get(&self, index: usize) -> Option<&Photo> {
        self.photos.get(index)
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Photo> {
        self.photos.iter()
    }
}
