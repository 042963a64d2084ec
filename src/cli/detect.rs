// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use crate::config::{DetectionConfig, EndpointVariant};
use crate::detection::ThresholdParams;
use crate::pipeline::DetectionPipeline;
use crate::vision::ImageLoader;

/// Arguments for the detect command
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Image file to upload
    #[arg(long, conflicts_with = "url", required_unless_present = "url")]
    pub image: Option<PathBuf>,

    /// Public image URL for the service to fetch
    #[arg(long, conflicts_with = "image", required_unless_present = "image")]
    pub url: Option<String>,

    /// Confidence threshold (default: 40 percent / 0.4 fraction)
    #[arg(long)]
    pub confidence: Option<f64>,

    /// Overlap/IoU threshold (default: 30 percent / 0.3 fraction)
    #[arg(long)]
    pub overlap: Option<f64>,

    /// Threshold scale of the endpoint (percent or fraction)
    #[arg(long, env = "DETECTION_THRESHOLD_SCALE")]
    pub scale: Option<EndpointVariant>,

    /// Model version to query
    #[arg(long, env = "DETECTION_MODEL_ID")]
    pub model_id: Option<String>,

    /// Font used to draw box labels
    #[arg(long, env = "DETECTION_FONT_PATH")]
    pub font: Option<PathBuf>,

    /// Where to write the annotated image
    #[arg(long, default_value = "annotated.png")]
    pub output: PathBuf,

    /// Print the raw model output
    #[arg(long)]
    pub json: bool,
}

/// Apply command-line overrides on top of the environment configuration
pub fn apply_overrides(mut config: DetectionConfig, args: &DetectArgs) -> DetectionConfig {
    if let Some(scale) = args.scale {
        config.variant = scale;
    }
    if let Some(model_id) = &args.model_id {
        config.model_id = model_id.clone();
    }
    if let Some(font) = &args.font {
        config.font_path = Some(font.clone());
    }
    config
}

/// Thresholds from flags, falling back to the variant defaults
pub fn resolve_thresholds(
    variant: EndpointVariant,
    confidence: Option<f64>,
    overlap: Option<f64>,
) -> Result<ThresholdParams> {
    let (default_confidence, default_overlap) = variant.default_thresholds();
    let params = ThresholdParams::new(
        variant,
        confidence.unwrap_or(default_confidence),
        overlap.unwrap_or(default_overlap),
    )?;
    Ok(params)
}

/// Run one detection and write the annotated image
pub async fn detect(args: DetectArgs) -> Result<()> {
    let config = apply_overrides(DetectionConfig::from_env().map_err(|e| anyhow!(e))?, &args);
    config.validate().map_err(|e| anyhow!(e))?;

    let thresholds = resolve_thresholds(config.variant, args.confidence, args.overlap)?;
    let pipeline = DetectionPipeline::from_config(&config)?;
    let loader = ImageLoader::new()?;

    let loaded = match (&args.image, &args.url) {
        (Some(path), _) => loader.load_file(path)?,
        (None, Some(image_url)) => loader.fetch_url(image_url).await?,
        (None, None) => return Err(anyhow!("either --image or --url is required")),
    };

    let outcome = pipeline.run(&loaded, &thresholds).await?;

    outcome
        .annotated
        .image
        .save(&args.output)
        .map_err(|e| anyhow!("failed to write {}: {}", args.output.display(), e))?;
    info!("Annotated image written to {}", args.output.display());

    println!("Predictions: {}", outcome.summary);
    for label in &outcome.annotated.labels {
        println!("  {}", label);
    }
    println!("Annotated image: {}", args.output.display());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.predictions.raw)?);
    }

    Ok(())
}

/// Print the effective configuration without the API key
pub fn show_config() -> Result<()> {
    let config = DetectionConfig::from_env().map_err(|e| anyhow!(e))?;
    println!("Endpoint:        {}", config.endpoint_url());
    println!("Threshold scale: {}", config.variant);
    println!(
        "API key:         {}",
        if config.api_key.is_empty() { "missing" } else { "set" }
    );
    match &config.font_path {
        Some(path) => println!("Label font:      {}", path.display()),
        None => println!("Label font:      none (labels printed only)"),
    }
    if let Err(e) = config.validate() {
        println!("Invalid:         {}", e);
    }
    Ok(())
}
