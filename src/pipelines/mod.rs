// SPDX-License-Identifier: MPL-2.0

//! Processing pipelines
//!
//! ```text
//! ┌──────────────┐     ┌───────────────────┐     ┌──────────────┐
//! │ Camera Frame │ ──▶ │  Photo Pipeline   │ ──▶ │  PNG payload │
//! │   (RGBA)     │     │  - Filter chain   │     │ (photo roll) │
//! │              │     │  - Exposure       │     │              │
//! │              │     │  - Screen glow    │     │              │
//! └──────────────┘     └───────────────────┘     └──────────────┘
//! ```
//!
//! Pixel work is CPU-bound; callers that must stay responsive run it on the
//! blocking pool (see [`photo::PhotoPipeline::reapply_async`]).

pub mod photo;
