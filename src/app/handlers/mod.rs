// SPDX-License-Identifier: GPL-3.0-only

//! Message handler modules
//!
//! Handlers are grouped by functional domain. Each one mutates the model
//! synchronously and returns the follow-up [`Task`](super::Task), if any.

pub mod capture;
pub mod editor;
pub mod gallery;
