// SPDX-License-Identifier: MPL-2.0

//! Application session for Digi-Pro
//!
//! This module contains the session state, message handling and the photo
//! roll. The presentation layer (the CLI here) only sends [`Message`]s and
//! reads state back.
//!
//! # Architecture
//!
//! - `state`: Session state types (AppModel, Message, EditorSelection)
//! - `photos`: Photo roll and the pure patch function
//! - `task`: Deferred follow-up work returned by handlers
//! - `update`: Message routing
//! - `handlers`: Capture, gallery and editor handlers
//!
//! # Main Types
//!
//! - `AppModel`: Session state with camera management
//! - `Message`: All possible user interactions and async completions
//! - `Task`: Futures that resolve to follow-up messages

mod handlers;
mod photos;
mod state;
mod task;
mod update;

pub use photos::{Photo, PhotoId, PhotoIdGenerator, PhotoPatch, PhotoStore, apply_patch};
pub use state::{AppModel, EditorSelection, Message};
pub use task::Task;
