// SPDX-License-Identifier: GPL-3.0-only

//! Application state types

use super::photos::{Photo, PhotoId, PhotoIdGenerator, PhotoStore};
use crate::backends::camera::CameraSession;
use crate::config::Config;
use crate::constants::{ZOOM_MAX, ZOOM_MIN, clamp_exposure};
use crate::enhance::EnhancementService;
use crate::errors::PhotoError;
use crate::filters::{FilterPreset, default_filter, find_filter};
use crate::pipelines::photo::PhotoPipeline;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

/// The photo open in the editor and the preset picked for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSelection {
    pub photo_id: PhotoId,
    pub filter_id: String,
}

/// Everything that can happen to a session
#[derive(Debug, Clone)]
pub enum Message {
    // ===== Viewfinder =====
    /// Change the active film simulation
    SelectFilter(String),
    /// Exposure compensation in EV, clamped to [-1, 2]
    SetExposure(f32),
    /// Viewfinder zoom, clamped to [1, 3]
    SetZoom(f32),
    ToggleFlash,

    // ===== Capture =====
    /// Take a photo from the live camera
    Capture,
    /// End of the capture indicator pulse
    CaptureFinished,
    /// Add an image file's contents to the roll and open it
    Import(Vec<u8>),

    // ===== Gallery =====
    ShowGallery,
    HideGallery,
    Delete(PhotoId),
    Export(PhotoId),
    Exported(Result<PathBuf, PhotoError>),

    // ===== Editor =====
    OpenEditor(PhotoId),
    CloseEditor,
    /// Pick a preset in the editor and bake it into the open photo
    ApplyEditorFilter(String),
    FilterApplied {
        photo_id: PhotoId,
        filter_id: String,
        result: Result<Vec<u8>, PhotoError>,
    },
    /// Send the open photo to the remote model
    Enhance,
    EnhanceFinished {
        photo_id: PhotoId,
        data: Option<Vec<u8>>,
    },
}

/// Session state and controller
///
/// Owns the camera stream, the photo roll and every UI flag. State changes
/// only through [`AppModel::update`].
pub struct AppModel {
    /// User configuration
    pub config: Config,
    /// Live camera, if one could be acquired
    pub(crate) camera: Option<CameraSession>,
    pub(crate) pipeline: PhotoPipeline,
    pub(crate) enhancer: Arc<dyn EnhancementService>,
    pub(crate) ids: PhotoIdGenerator,
    pub(crate) photos: PhotoStore,
    pub(crate) editor: Option<EditorSelection>,
    /// Active viewfinder preset
    pub(crate) active_filter: &'static FilterPreset,
    pub(crate) exposure: f32,
    pub(crate) zoom: f32,
    /// Flash toggle (viewfinder only)
    pub flash_enabled: bool,
    /// Whether the gallery panel is shown
    pub gallery_visible: bool,
    /// Capture indicator, raised briefly after each shot
    pub is_capturing: bool,
    /// Gate for the single in-flight enhancement
    pub is_enhancing: bool,
    /// Filter re-applications whose result has not been committed yet
    pub(crate) pending_filters: usize,
    /// Path of the most recent successful export
    pub last_export: Option<PathBuf>,
}

impl AppModel {
    /// Create a session with no camera attached
    pub fn new(config: Config, enhancer: Arc<dyn EnhancementService>) -> Self {
        let active_filter = find_filter(&config.default_filter).unwrap_or_else(default_filter);
        let exposure = clamp_exposure(config.default_exposure);

        Self {
            config,
            camera: None,
            pipeline: PhotoPipeline::new(),
            enhancer,
            ids: PhotoIdGenerator::default(),
            photos: PhotoStore::new(),
            editor: None,
            active_filter,
            exposure,
            zoom: ZOOM_MIN,
            flash_enabled: false,
            gallery_visible: false,
            is_capturing: false,
            is_enhancing: false,
            pending_filters: 0,
            last_export: None,
        }
    }

    pub fn photos(&self) -> &PhotoStore {
        &self.photos
    }

    pub fn editor(&self) -> Option<&EditorSelection> {
        self.editor.as_ref()
    }

    /// Photo currently open in the editor
    pub fn editing_photo(&self) -> Option<&Photo> {
        self.editor
            .as_ref()
            .and_then(|selection| self.photos.find(&selection.photo_id))
    }

    pub fn active_filter(&self) -> &'static FilterPreset {
        self.active_filter
    }

    pub fn exposure(&self) -> f32 {
        self.exposure
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn has_camera(&self) -> bool {
        self.camera.is_some()
    }

    /// Whether a pending enhancement locks the roll; logs the refused action
    pub(crate) fn locked_by_enhancement(&self, action: &str) -> bool {
        if self.is_enhancing {
            warn!(action, "Enhancement in progress, ignoring");
        }
        self.is_enhancing
    }

    pub(crate) fn clamp_zoom(zoom: f32) -> f32 {
        if zoom.is_nan() {
            return ZOOM_MIN;
        }
        zoom.clamp(ZOOM_MIN, ZOOM_MAX)
    }
}

impl std::fmt::Debug for AppModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppModel")
            .field("camera", &self.camera)
            .field("photos", &self.photos.len())
            .field("editor", &self.editor)
            .field("active_filter", &self.active_filter.id)
            .field("exposure", &self.exposure)
            .field("zoom", &self.zoom)
            .field("is_capturing", &self.is_capturing)
            .field("is_enhancing", &self.is_enhancing)
            .field("pending_filters", &self.pending_filters)
            .finish()
    }
}
