// SPDX-License-Identifier: GPL-3.0-only

//! Editor handlers
//!
//! Filter re-application and AI enhancement both run off the update loop.
//! Their results are committed when they arrive, whatever the editor shows
//! by then: the store is patched if the photo still exists and the editor is
//! pointed back at it. Neither can be cancelled.
//!
//! While an enhancement is in flight nothing else may change the roll, and an
//! enhancement cannot start while a re-application is still pending.

use crate::app::Task;
use crate::app::photos::{PhotoId, PhotoPatch};
use crate::app::state::{AppModel, EditorSelection, Message};
use crate::enhance::enhance_photo;
use crate::errors::PhotoError;
use crate::filters::find_filter;
use std::sync::Arc;
use tracing::{debug, info, warn};

impl AppModel {
    pub(crate) fn handle_open_editor(&mut self, id: PhotoId) -> Task {
        match self.photos.find(&id) {
            Some(photo) => {
                debug!(id = %id, filter = %photo.filter_id, "Opening editor");
                self.editor = Some(EditorSelection {
                    filter_id: photo.filter_id.clone(),
                    photo_id: id,
                });
            }
            None => warn!(id = %id, "Cannot open missing photo"),
        }
        Task::none()
    }

    /// Bake a preset into the open photo's current pixels
    pub(crate) fn handle_apply_editor_filter(&mut self, filter_id: String) -> Task {
        if self.locked_by_enhancement("apply filter") {
            return Task::none();
        }

        let Some(preset) = find_filter(&filter_id) else {
            warn!(filter = %filter_id, "Unknown filter");
            return Task::none();
        };

        let Some(selection) = self.editor.as_mut() else {
            debug!("No photo open, ignoring filter change");
            return Task::none();
        };
        selection.filter_id = preset.id.to_string();
        let photo_id = selection.photo_id.clone();

        let Some(photo) = self.photos.find(&photo_id) else {
            return Task::none();
        };
        let data = Arc::clone(&photo.data);
        let pipeline = self.pipeline;
        self.pending_filters += 1;

        info!(id = %photo_id, filter = preset.id, "Re-applying filter");
        Task::perform(
            async move { pipeline.reapply_async(data, preset).await },
            move |result| Message::FilterApplied {
                photo_id,
                filter_id: preset.id.to_string(),
                result,
            },
        )
    }

    pub(crate) fn handle_filter_applied(
        &mut self,
        photo_id: PhotoId,
        filter_id: String,
        result: Result<Vec<u8>, PhotoError>,
    ) -> Task {
        self.pending_filters = self.pending_filters.saturating_sub(1);

        let data = match result {
            Ok(data) => data,
            Err(e) => {
                warn!(id = %photo_id, error = %e, "Filter re-application failed");
                return Task::none();
            }
        };

        let patch = PhotoPatch {
            data: Some(Arc::from(data)),
            filter_id: Some(filter_id),
            ai_enhanced: None,
        };
        self.commit_edit(photo_id, patch);
        Task::none()
    }

    /// Send the open photo to the enhancement service
    pub(crate) fn handle_enhance(&mut self) -> Task {
        if self.is_enhancing {
            warn!("Enhancement already in progress");
            return Task::none();
        }
        if self.pending_filters > 0 {
            warn!(
                pending = self.pending_filters,
                "Filter re-application in progress, ignoring enhance"
            );
            return Task::none();
        }

        let Some(selection) = self.editor.as_ref() else {
            debug!("No photo open, ignoring enhance");
            return Task::none();
        };
        let Some(photo) = self.photos.find(&selection.photo_id) else {
            return Task::none();
        };

        let style = find_filter(&selection.filter_id)
            .unwrap_or(self.active_filter)
            .description
            .to_string();
        let photo_id = photo.id.clone();
        let data = Arc::clone(&photo.data);
        let enhancer = Arc::clone(&self.enhancer);

        self.is_enhancing = true;
        info!(id = %photo_id, style = %style, "Starting AI enhancement");

        Task::perform(
            async move { enhance_photo(enhancer.as_ref(), &data, &style).await },
            move |data| Message::EnhanceFinished { photo_id, data },
        )
    }

    pub(crate) fn handle_enhance_finished(
        &mut self,
        photo_id: PhotoId,
        data: Option<Vec<u8>>,
    ) -> Task {
        self.is_enhancing = false;

        let Some(data) = data else {
            debug!(id = %photo_id, "Enhancement produced nothing, photo unchanged");
            return Task::none();
        };

        let patch = PhotoPatch {
            data: Some(Arc::from(data)),
            filter_id: None,
            ai_enhanced: Some(true),
        };
        self.commit_edit(photo_id, patch);
        Task::none()
    }

    /// Apply a finished edit and point the editor at the edited photo
    ///
    /// Last writer wins. A photo deleted in the meantime is left deleted and
    /// the selection is not touched.
    fn commit_edit(&mut self, photo_id: PhotoId, patch: PhotoPatch) {
        if !self.photos.update(&photo_id, patch) {
            debug!(id = %photo_id, "Edited photo no longer exists, dropping result");
            return;
        }

        let filter_id = match self.editor.take() {
            Some(selection) => selection.filter_id,
            None => self
                .photos
                .find(&photo_id)
                .map(|photo| photo.filter_id.clone())
                .unwrap_or_default(),
        };
        info!(id = %photo_id, "Edit committed");
        self.editor = Some(EditorSelection {
            photo_id,
            filter_id,
        });
    }
}
