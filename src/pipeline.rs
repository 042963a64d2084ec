// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! One detection run: predict, annotate, summarize
//!
//! Runs are independent. Either the full result comes back or an error does;
//! nothing is annotated after a failed prediction.

use tracing::info;

use crate::config::DetectionConfig;
use crate::detection::{DetectionClient, DetectionError, PredictionResult, ThresholdParams};
use crate::vision::{AnnotatedImage, Annotator, ClassSymbols, LoadedImage};

/// Everything a presentation layer needs after a successful run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub annotated: AnnotatedImage,
    pub summary: String,
    pub predictions: PredictionResult,
}

pub struct DetectionPipeline {
    client: DetectionClient,
    annotator: Annotator,
    symbols: ClassSymbols,
}

impl DetectionPipeline {
    pub fn new(client: DetectionClient, annotator: Annotator, symbols: ClassSymbols) -> Self {
        Self {
            client,
            annotator,
            symbols,
        }
    }

    /// Build client, annotator and symbol table from configuration
    pub fn from_config(config: &DetectionConfig) -> Result<Self, DetectionError> {
        let client = DetectionClient::new(config)?;
        let annotator = match &config.font_path {
            Some(path) => Annotator::new()
                .with_font_file(path)
                .map_err(|e| DetectionError::Config(e.to_string()))?,
            None => Annotator::new(),
        };
        let symbols = ClassSymbols::default().extend(config.class_symbols.clone());
        Ok(Self::new(client, annotator, symbols))
    }

    pub fn client(&self) -> &DetectionClient {
        &self.client
    }

    pub async fn run(
        &self,
        loaded: &LoadedImage,
        thresholds: &ThresholdParams,
    ) -> Result<RunOutcome, DetectionError> {
        let predictions = self.client.predict(&loaded.source, thresholds).await?;

        let annotated = self
            .annotator
            .annotate(&loaded.image, &predictions.predictions);
        let summary = self.symbols.summarize(&predictions.predictions);
        info!(
            "Run complete: {} boxes, summary={:?}",
            predictions.len(),
            summary
        );

        Ok(RunOutcome {
            annotated,
            summary,
            predictions,
        })
    }
}
