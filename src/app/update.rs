// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! `update()` routes each message to a handler in `handlers`, grouped by
//! domain:
//!
//! - `handlers::capture`: viewfinder settings, capture, import
//! - `handlers::gallery`: gallery visibility, delete, export
//! - `handlers::editor`: editor selection, filter re-application, AI enhancement

use super::Task;
use crate::app::state::{AppModel, Message};
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tracing::{debug, trace};

impl AppModel {
    /// Main message handler - routes messages to appropriate handler methods.
    pub fn update(&mut self, message: Message) -> Task {
        trace!(?message, "update");

        match message {
            // ===== Viewfinder =====
            Message::SelectFilter(id) => self.handle_select_filter(id),
            Message::SetExposure(value) => self.handle_set_exposure(value),
            Message::SetZoom(value) => {
                self.zoom = Self::clamp_zoom(value);
                Task::none()
            }
            Message::ToggleFlash => {
                self.flash_enabled = !self.flash_enabled;
                Task::none()
            }

            // ===== Capture =====
            Message::Capture => self.handle_capture(),
            Message::CaptureFinished => {
                self.is_capturing = false;
                Task::none()
            }
            Message::Import(bytes) => self.handle_import(bytes),

            // ===== Gallery =====
            Message::ShowGallery => {
                self.gallery_visible = true;
                Task::none()
            }
            Message::HideGallery => {
                self.gallery_visible = false;
                Task::none()
            }
            Message::Delete(id) => self.handle_delete(id),
            Message::Export(id) => self.handle_export(id),
            Message::Exported(result) => self.handle_exported(result),

            // ===== Editor =====
            Message::OpenEditor(id) => self.handle_open_editor(id),
            Message::CloseEditor => {
                self.editor = None;
                Task::none()
            }
            Message::ApplyEditorFilter(filter_id) => self.handle_apply_editor_filter(filter_id),
            Message::FilterApplied {
                photo_id,
                filter_id,
                result,
            } => self.handle_filter_applied(photo_id, filter_id, result),
            Message::Enhance => self.handle_enhance(),
            Message::EnhanceFinished { photo_id, data } => {
                self.handle_enhance_finished(photo_id, data)
            }
        }
    }

    /// Process a message and every follow-up it triggers until nothing is pending
    ///
    /// Follow-ups are applied in completion order.
    pub async fn dispatch(&mut self, message: Message) {
        let mut pending = FuturesUnordered::new();
        pending.extend(self.update(message).into_futures());

        while let Some(next) = pending.next().await {
            let task = self.update(next);
            if !task.is_none() {
                debug!(follow_ups = task.len(), "Queueing follow-up work");
            }
            pending.extend(task.into_futures());
        }
    }
}
