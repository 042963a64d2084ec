// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prediction requests against a hosted object-detection endpoint
//!
//! This module provides:
//! - Request construction for byte uploads and remote URLs
//! - Parsing of the `predictions` payload into typed boxes
//! - Typed errors for upstream, parse and source failures

pub mod client;
pub mod errors;
pub mod request;
pub mod response;

pub use client::{DetectionClient, FORM_CONTENT_TYPE};
pub use errors::DetectionError;
pub use request::{ImageSource, ThresholdParams};
pub use response::{DetectionBox, ImageDimensions, PredictionResult};
