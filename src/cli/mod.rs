// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod detect;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Detection overlay CLI
#[derive(Parser, Debug)]
#[command(name = "detect-overlay")]
#[command(version)]
#[command(about = "Run a hosted object-detection model on an image and draw the boxes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect objects in an uploaded image or an image URL
    Detect(detect::DetectArgs),

    /// Show the effective endpoint configuration
    ShowConfig,
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Detect(args) => detect::detect(args).await,
        Commands::ShowConfig => detect::show_config(),
    }
}
