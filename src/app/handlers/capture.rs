// SPDX-License-Identifier: GPL-3.0-only

//! Capture operations handlers
//!
//! Handles the camera stream, viewfinder settings, photo capture and import.

use crate::app::Task;
use crate::app::photos::Photo;
use crate::app::state::{AppModel, EditorSelection, Message};
use crate::backends::camera::{CameraBackend, CameraRequest, CameraSession};
use crate::constants::{CAPTURE_PULSE_MS, IDENTITY_FILTER_ID, clamp_exposure};
use crate::filters::find_filter;
use crate::pipelines::photo::normalize_import;
use chrono::Local;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

impl AppModel {
    // =========================================================================
    // Camera Lifecycle
    // =========================================================================

    /// Acquire the camera stream for this session
    ///
    /// On failure the error is logged and the session keeps running without
    /// a camera; capture then does nothing. Returns whether a stream is open.
    pub fn start_camera(&mut self, backend: &dyn CameraBackend, request: &CameraRequest) -> bool {
        // Release any previous stream before opening a new one
        self.camera = None;

        match CameraSession::start(backend, request) {
            Ok(session) => {
                info!(request = ?session.request(), "Camera ready");
                self.camera = Some(session);
                true
            }
            Err(e) => {
                error!(error = %e, "Failed to start camera");
                false
            }
        }
    }

    /// Release the camera stream
    pub fn stop_camera(&mut self) {
        if self.camera.take().is_some() {
            info!("Camera stopped");
        }
    }

    // =========================================================================
    // Viewfinder Settings
    // =========================================================================

    pub(crate) fn handle_select_filter(&mut self, id: String) -> Task {
        match find_filter(&id) {
            Some(preset) => {
                info!(filter = preset.id, "Filter selected");
                self.active_filter = preset;
            }
            None => warn!(filter = %id, "Unknown filter, keeping current"),
        }
        Task::none()
    }

    pub(crate) fn handle_set_exposure(&mut self, value: f32) -> Task {
        self.exposure = clamp_exposure(value);
        debug!(exposure = self.exposure, "Exposure changed");
        Task::none()
    }

    // =========================================================================
    // Capture Operations
    // =========================================================================

    /// Capture the current frame with the active filter and exposure
    pub(crate) fn handle_capture(&mut self) -> Task {
        if self.locked_by_enhancement("capture") {
            return Task::none();
        }

        let Some(camera) = self.camera.as_mut() else {
            warn!("No camera available, ignoring capture");
            return Task::none();
        };

        let frame = match camera.capture_frame() {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, "Failed to grab frame");
                return Task::none();
            }
        };

        self.is_capturing = true;
        let pulse = Task::delay(CAPTURE_PULSE_MS, Message::CaptureFinished);

        let data = match self
            .pipeline
            .capture(&frame, self.active_filter, self.exposure)
        {
            Ok(data) => data,
            Err(e) => {
                warn!(error = %e, "Capture failed");
                return pulse;
            }
        };

        let now = Local::now();
        let photo = Photo {
            id: self.ids.next(now),
            data: Arc::from(data),
            created_at: now,
            filter_id: self.active_filter.id.to_string(),
            ai_enhanced: false,
        };
        info!(id = %photo.id, filter = %photo.filter_id, "Photo captured");
        self.photos.add(photo);

        pulse
    }

    /// Add an external image to the roll and open it in the editor
    pub(crate) fn handle_import(&mut self, bytes: Vec<u8>) -> Task {
        if self.locked_by_enhancement("import") {
            return Task::none();
        }

        let data = match normalize_import(&bytes) {
            Ok(data) => data,
            Err(e) => {
                warn!(error = %e, size = bytes.len(), "Import failed");
                return Task::none();
            }
        };

        let now = Local::now();
        let id = self.ids.next(now);
        self.photos.add(Photo {
            id: id.clone(),
            data: Arc::from(data),
            created_at: now,
            filter_id: IDENTITY_FILTER_ID.to_string(),
            ai_enhanced: false,
        });
        info!(id = %id, "Photo imported");

        self.editor = Some(EditorSelection {
            photo_id: id,
            filter_id: IDENTITY_FILTER_ID.to_string(),
        });
        self.gallery_visible = true;
        Task::none()
    }
}

#[cfg(test)]
mod tests {
    use crate::app::Message;
    use crate::app::handlers::testing::{MockEnhancer, model_with, model_with_camera, scene};
    use crate::backends::camera::{BackendError, UnavailableBackend};
    use crate::constants::{EXPOSURE_MAX, IDENTITY_FILTER_ID};
    use crate::pipelines::photo::encode_png;

    #[tokio::test]
    async fn test_capture_with_identity_filter() {
        let mut model = model_with_camera(MockEnhancer::failing());
        let _ = model.update(Message::SelectFilter(IDENTITY_FILTER_ID.to_string()));
        let _ = model.update(Message::SetExposure(0.5));

        let task = model.update(Message::Capture);
        assert!(model.is_capturing);
        assert_eq!(model.photos().len(), 1);

        let photo = model.photos().get(0).unwrap();
        assert_eq!(photo.filter_id, "none");
        assert!(!photo.ai_enhanced);

        for message in task.resolve().await {
            let _ = model.update(message);
        }
        assert!(!model.is_capturing);
    }

    #[test]
    fn test_captures_are_newest_first() {
        let mut model = model_with_camera(MockEnhancer::failing());
        for _ in 0..5 {
            let _ = model.update(Message::Capture);
        }

        let photos: Vec<_> = model.photos().iter().collect();
        assert_eq!(photos.len(), 5);
        for pair in photos.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
            let newer: i64 = pair[0].id.as_str().parse().unwrap();
            let older: i64 = pair[1].id.as_str().parse().unwrap();
            assert!(newer > older, "ids should descend: {} then {}", newer, older);
        }
    }

    #[test]
    fn test_capture_without_camera_is_noop() {
        let mut model = model_with(MockEnhancer::failing());
        let backend = UnavailableBackend::new(BackendError::PermissionDenied("denied".into()));
        let request = model.config.camera_request();
        assert!(!model.start_camera(&backend, &request));

        let task = model.update(Message::Capture);
        assert!(task.is_none());
        assert!(model.photos().is_empty());
        assert!(!model.is_capturing);
    }

    #[test]
    fn test_capture_after_stop_is_noop() {
        let mut model = model_with_camera(MockEnhancer::failing());
        model.stop_camera();
        assert!(!model.has_camera());
        let _ = model.update(Message::Capture);
        assert!(model.photos().is_empty());
    }

    #[test]
    fn test_select_unknown_filter_keeps_current() {
        let mut model = model_with(MockEnhancer::failing());
        let _ = model.update(Message::SelectFilter("vapor".to_string()));
        let _ = model.update(Message::SelectFilter("nope".to_string()));
        assert_eq!(model.active_filter().id, "vapor");
    }

    #[test]
    fn test_viewfinder_settings_are_clamped() {
        let mut model = model_with(MockEnhancer::failing());
        let _ = model.update(Message::SetExposure(9.0));
        let _ = model.update(Message::SetZoom(0.2));
        assert_eq!(model.exposure(), EXPOSURE_MAX);
        assert_eq!(model.zoom(), 1.0);

        let _ = model.update(Message::ToggleFlash);
        assert!(model.flash_enabled);
    }

    #[tokio::test]
    async fn test_roll_is_locked_while_enhancing() {
        let replacement = encode_png(&image::RgbaImage::new(2, 2)).unwrap();
        let mut model = model_with_camera(MockEnhancer::succeeding(replacement));
        let _ = model.update(Message::Import(encode_png(&scene()).unwrap()));

        let enhance = model.update(Message::Enhance);
        assert!(model.update(Message::Capture).is_none());
        assert!(!model.is_capturing);
        let _ = model.update(Message::Import(encode_png(&scene()).unwrap()));
        assert_eq!(model.photos().len(), 1);

        for message in enhance.resolve().await {
            let _ = model.update(message);
        }
        let _ = model.update(Message::Capture);
        assert_eq!(model.photos().len(), 2);
    }

    #[test]
    fn test_import_opens_editor() {
        let mut model = model_with(MockEnhancer::failing());
        let png = encode_png(&scene()).unwrap();

        let _ = model.update(Message::Import(png));

        let photo = model.photos().first().unwrap();
        assert_eq!(photo.filter_id, IDENTITY_FILTER_ID);
        assert!(!photo.ai_enhanced);

        let selection = model.editor().unwrap();
        assert_eq!(selection.photo_id, photo.id);
        assert_eq!(selection.filter_id, IDENTITY_FILTER_ID);
        assert!(model.gallery_visible);
    }

    #[test]
    fn test_import_garbage_is_noop() {
        let mut model = model_with(MockEnhancer::failing());
        let _ = model.update(Message::Import(b"not an image".to_vec()));
        assert!(model.photos().is_empty());
        assert!(model.editor().is_none());
    }
}
