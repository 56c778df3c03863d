// SPDX-License-Identifier: MPL-2.0

//! Camera capability abstraction
//!
//! ```text
//! ┌─────────────────────┐
//! │   AppModel          │
//! └──────────┬──────────┘
//!            │ owns
//!            ▼
//! ┌─────────────────────┐
//! │   CameraSession     │  ← scoped acquisition, released on drop
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │  FrameSource trait  │  ← opened by a CameraBackend
//! └─────────────────────┘
//! ```
//!
//! Hardware access itself lives outside this crate; backends only need to
//! hand out frames in RGBA form.

pub mod still;
pub mod types;

pub use still::StillImageBackend;
pub use types::*;

use tracing::{debug, info, warn};

/// Opens frame sources for a camera request
pub trait CameraBackend {
    /// Acquire a live source matching the request as closely as possible
    ///
    /// # Returns
    /// * `Ok(Box<dyn FrameSource>)` - Source ready for capture
    /// * `Err(BackendError)` - Permission denied or no device
    fn open(&self, request: &CameraRequest) -> BackendResult<Box<dyn FrameSource>>;
}

/// A live frame source
pub trait FrameSource: Send {
    /// Grab the current frame at the source's native resolution
    fn capture_frame(&mut self) -> BackendResult<CameraFrame>;

    /// Stop the underlying stream. Idempotent.
    fn release(&mut self);

    /// Human-readable source name for logs
    fn name(&self) -> &str {
        "camera"
    }
}

/// An acquired camera stream
///
/// The stream is released when the session is dropped, so the camera is
/// held exactly as long as the owning application session.
pub struct CameraSession {
    source: Box<dyn FrameSource>,
    request: CameraRequest,
}

impl CameraSession {
    /// Acquire a stream from the backend
    pub fn start(backend: &dyn CameraBackend, request: &CameraRequest) -> BackendResult<Self> {
        info!(
            facing = ?request.facing,
            width = request.ideal_width,
            height = request.ideal_height,
            "Requesting camera stream"
        );

        let source = backend.open(request)?;
        debug!(source = source.name(), "Camera stream acquired");

        Ok(Self {
            source,
            request: *request,
        })
    }

    /// Request used to open this session
    pub fn request(&self) -> &CameraRequest {
        &self.request
    }

    /// Pull the current frame
    pub fn capture_frame(&mut self) -> BackendResult<CameraFrame> {
        self.source.capture_frame()
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        debug!(source = self.source.name(), "Releasing camera stream");
        self.source.release();
    }
}

impl std::fmt::Debug for CameraSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraSession")
            .field("source", &self.source.name())
            .field("request", &self.request)
            .finish()
    }
}

/// Backend that never yields a camera (no device / permission refused)
#[derive(Debug, Clone)]
pub struct UnavailableBackend {
    reason: BackendError,
}

impl UnavailableBackend {
    pub fn new(reason: BackendError) -> Self {
        Self { reason }
    }
}

impl CameraBackend for UnavailableBackend {
    fn open(&self, _request: &CameraRequest) -> BackendResult<Box<dyn FrameSource>> {
        warn!(reason = %self.reason, "Camera unavailable");
        Err(self.reason.clone())
    }
}
