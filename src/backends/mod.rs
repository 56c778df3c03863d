// SPDX-License-Identifier: MPL-2.0

//! Device backends
//!
//! Only the camera is abstracted here; file import and export go through
//! [`crate::pipelines::photo::encoding`].

pub mod camera;
