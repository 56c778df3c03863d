// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "digi-pro")]
#[command(about = "Retro digital camera with film simulations")]
#[command(version = env!("GIT_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available film simulations
    Filters,

    /// Show the configuration file and its effective values
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        save: bool,
    },

    /// Take a photo, using an image file as the camera
    Capture {
        /// Image standing in for the live camera frame
        #[arg(short, long)]
        source: PathBuf,

        /// Film simulation id (from 'digi-pro filters')
        #[arg(short, long)]
        filter: Option<String>,

        /// Exposure compensation in EV, from -1 to 2
        #[arg(short, long, allow_negative_numbers = true)]
        exposure: Option<f32>,

        /// Output directory (default: export_dir from config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import an image and edit it
    Edit {
        /// Image to import
        input: PathBuf,

        /// Film simulation to bake in; repeat to stack them
        #[arg(short, long)]
        filter: Vec<String>,

        /// Re-grade the result with the AI model
        #[arg(long)]
        enhance: bool,

        /// Output directory (default: export_dir from config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=digi_pro=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Filters => cli::list_filters(),
        Commands::Config { save } => cli::show_config(save),
        Commands::Capture {
            source,
            filter,
            exposure,
            output,
        } => cli::take_photo(source, filter, exposure, output),
        Commands::Edit {
            input,
            filter,
            enhance,
            output,
        } => cli::edit_photo(input, filter, enhance, output),
    }?;
    Ok(())
}
