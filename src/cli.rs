// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for the camera core
//!
//! This module provides command-line functionality for:
//! - Listing the film simulations
//! - Showing and saving the configuration
//! - Taking a photo from a still image standing in for the camera
//! - Editing an existing image (re-applying presets, AI enhancement)

use digi_pro::app::{AppModel, Message, Photo};
use digi_pro::backends::camera::StillImageBackend;
use digi_pro::config::Config;
use digi_pro::errors::AppResult;
use digi_pro::enhance::{CurlTransport, DisabledEnhancer, EnhancementService, GeminiEnhancer};
use digi_pro::filters::FILTERS;
use digi_pro::pipelines::photo::decode_image;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

/// List all film simulations
pub fn list_filters() -> AppResult<()> {
    println!("Available filters:");
    println!();
    for preset in FILTERS.iter() {
        println!("  {:<12} {}", preset.id, preset.name);
        println!("      {}", preset.description);
        println!("      {}", preset.chain());
        println!();
    }
    Ok(())
}

/// Print the effective configuration, optionally writing it back
pub fn show_config(save: bool) -> AppResult<()> {
    let config = Config::load();
    match Config::default_path() {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: (no config directory)"),
    }
    println!("{}", serde_json::to_string_pretty(&config)?);

    if save {
        config.save()?;
        println!("Saved.");
    }
    Ok(())
}

/// Take a photo using a still image as the camera
pub fn take_photo(
    source: PathBuf,
    filter: Option<String>,
    exposure: Option<f32>,
    output: Option<PathBuf>,
) -> AppResult<()> {
    let config = load_config(output);
    let backend = StillImageBackend::from_path(&source)?;
    let (width, height) = backend.dimensions();
    println!("Using source: {} ({}x{})", source.display(), width, height);

    let enhancer = build_enhancer(&config);
    let mut model = AppModel::new(config, enhancer);
    let request = model.config.camera_request();
    if !model.start_camera(&backend, &request) {
        return Err("Camera could not be started".into());
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(capture_and_export(&mut model, filter, exposure))
}

async fn capture_and_export(
    model: &mut AppModel,
    filter: Option<String>,
    exposure: Option<f32>,
) -> AppResult<()> {
    if let Some(filter) = filter {
        model.dispatch(Message::SelectFilter(filter)).await;
    }
    if let Some(exposure) = exposure {
        model.dispatch(Message::SetExposure(exposure)).await;
    }

    println!(
        "Capturing with {} at {:+.1} EV...",
        model.active_filter().name,
        model.exposure()
    );
    model.dispatch(Message::Capture).await;

    let photo = model.photos().first().cloned().ok_or("Capture failed")?;
    export(model, &photo).await
}

/// Import an image, re-apply presets to it and optionally enhance it
pub fn edit_photo(
    input: PathBuf,
    filters: Vec<String>,
    enhance: bool,
    output: Option<PathBuf>,
) -> AppResult<()> {
    let bytes = std::fs::read(&input)?;
    let (width, height) = decode_image(&bytes)?.dimensions();
    println!("Editing: {} ({}x{})", input.display(), width, height);

    let config = load_config(output);
    let enhancer = build_enhancer(&config);
    let mut model = AppModel::new(config, enhancer);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(edit_and_export(&mut model, &input, bytes, filters, enhance))
}

async fn edit_and_export(
    model: &mut AppModel,
    input: &Path,
    bytes: Vec<u8>,
    filters: Vec<String>,
    enhance: bool,
) -> AppResult<()> {
    model.dispatch(Message::Import(bytes)).await;
    if model.editing_photo().is_none() {
        return Err(format!("Could not import {}", input.display()).into());
    }

    for filter in filters {
        println!("Applying {}...", filter);
        model.dispatch(Message::ApplyEditorFilter(filter)).await;
    }

    if enhance {
        println!("Enhancing...");
        model.dispatch(Message::Enhance).await;
    }

    let photo = model.editing_photo().cloned().ok_or("Photo disappeared")?;
    if enhance && !photo.ai_enhanced {
        println!("Enhancement unavailable, keeping the photo as is");
    }
    export(model, &photo).await
}

async fn export(model: &mut AppModel, photo: &Photo) -> AppResult<()> {
    model.dispatch(Message::Export(photo.id.clone())).await;
    let path = model.last_export.as_deref().ok_or("Export failed")?;
    println!("Photo saved: {}", path.display());
    Ok(())
}

/// Load config, pointing exports at `output` if given
fn load_config(output: Option<PathBuf>) -> Config {
    let mut config = Config::load();
    if let Some(dir) = output {
        config.export_dir = dir;
    }
    config
}

fn build_enhancer(config: &Config) -> Arc<dyn EnhancementService> {
    match GeminiEnhancer::from_config(config, CurlTransport::new()) {
        Ok(enhancer) => Arc::new(enhancer),
        Err(e) => {
            warn!(error = %e, "AI enhancement disabled");
            Arc::new(DisabledEnhancer::new(e))
        }
    }
}
