// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod cli;
pub mod config;
pub mod detection;
pub mod pipeline;
pub mod vision;

pub use config::{DetectionConfig, EndpointVariant};
pub use detection::{
    DetectionBox, DetectionClient, DetectionError, ImageSource, PredictionResult,
    ThresholdParams,
};
pub use pipeline::{DetectionPipeline, RunOutcome};
pub use vision::{AnnotatedImage, Annotator, BoxCorners, ClassSymbols, ImageLoader, LoadedImage};
