// SPDX-License-Identifier: GPL-3.0-only

//! Gallery handlers: deletion and export

use crate::app::Task;
use crate::app::photos::PhotoId;
use crate::app::state::{AppModel, Message};
use crate::errors::PhotoError;
use crate::pipelines::photo::export_photo;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info};

impl AppModel {
    pub(crate) fn handle_delete(&mut self, id: PhotoId) -> Task {
        if self.locked_by_enhancement("delete") {
            return Task::none();
        }

        let Some(removed) = self.photos.delete(&id) else {
            debug!(id = %id, "Delete of unknown photo ignored");
            return Task::none();
        };
        info!(id = %removed.id, remaining = self.photos.len(), "Photo deleted");

        if self
            .editor
            .as_ref()
            .is_some_and(|selection| selection.photo_id == id)
        {
            self.editor = None;
        }
        Task::none()
    }

    /// Write a photo into the export directory
    pub(crate) fn handle_export(&mut self, id: PhotoId) -> Task {
        let Some(photo) = self.photos.find(&id) else {
            debug!(id = %id, "Export of unknown photo ignored");
            return Task::none();
        };

        let data = Arc::clone(&photo.data);
        let output_dir = self.config.export_dir.clone();
        Task::perform(
            async move { export_photo(&data, &output_dir).await },
            Message::Exported,
        )
    }

    pub(crate) fn handle_exported(&mut self, result: Result<PathBuf, PhotoError>) -> Task {
        match result {
            Ok(path) => {
                info!(path = %path.display(), "Photo exported");
                self.last_export = Some(path);
            }
            Err(e) => error!(error = %e, "Export failed"),
        }
        Task::none()
    }
}
