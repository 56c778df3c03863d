// SPDX-License-Identifier: MPL-2.0

//! Digi-Pro - a retro digital camera with film simulations
//!
//! This library provides the core of the Digi-Pro camera: capture through
//! a filter preset with exposure and glow, an in-memory photo roll, an
//! editor that re-applies presets, and optional AI re-grading.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: Session state and message handling
//! - [`backends`]: Camera capability abstraction
//! - [`filters`]: Film simulation catalog and filter operations
//! - [`pipelines`]: Photo capture and re-rendering pipeline
//! - [`enhance`]: Remote AI enhancement adapter
//! - [`config`]: User configuration handling
//!
//! # Example
//!
//! ```ignore
//! // Render an image through the default preset:
//! // digi-pro capture --source input.jpg
//! ```

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod enhance;
pub mod errors;
pub mod filters;
pub mod pipelines;

// Re-export commonly used types
pub use app::{AppModel, Message, Photo, PhotoId, Task};
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use filters::{FILTERS, FilterPreset};
