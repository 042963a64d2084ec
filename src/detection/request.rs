// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Inputs of a prediction request

use crate::config::EndpointVariant;

use super::errors::DetectionError;

/// Where the endpoint gets the image from
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// Encoded image bytes, sent base64 in the request body
    Bytes(Vec<u8>),
    /// Publicly reachable URL, passed as the `image` query parameter
    RemoteUrl(String),
}

impl ImageSource {
    pub fn kind(&self) -> &'static str {
        match self {
            ImageSource::Bytes(_) => "bytes",
            ImageSource::RemoteUrl(_) => "url",
        }
    }
}

/// Confidence and overlap thresholds in the native scale of an endpoint
/// variant. Only constructible through [`ThresholdParams::new`], so a value
/// outside the variant's range never reaches the wire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdParams {
    variant: EndpointVariant,
    confidence: f64,
    overlap: f64,
}

impl ThresholdParams {
    /// Validate and build a threshold pair for `variant`
    pub fn new(
        variant: EndpointVariant,
        confidence: f64,
        overlap: f64,
    ) -> Result<Self, DetectionError> {
        check_range(variant, "confidence", confidence)?;
        check_range(variant, variant.overlap_param(), overlap)?;
        Ok(Self {
            variant,
            confidence,
            overlap,
        })
    }

    /// Variant defaults: 40/30 percent or 0.4/0.3 fraction
    pub fn defaults(variant: EndpointVariant) -> Self {
        let (confidence, overlap) = variant.default_thresholds();
        Self {
            variant,
            confidence,
            overlap,
        }
    }

    pub fn variant(&self) -> EndpointVariant {
        self.variant
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn overlap(&self) -> f64 {
        self.overlap
    }

    /// Threshold query parameters in wire order
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [
            ("confidence", self.variant.format_threshold(self.confidence)),
            (
                self.variant.overlap_param(),
                self.variant.format_threshold(self.overlap),
            ),
        ]
    }
}

fn check_range(
    variant: EndpointVariant,
    name: &'static str,
    value: f64,
) -> Result<(), DetectionError> {
    let (min, max) = variant.range();
    let in_range = value.is_finite() && value >= min && value <= max;
    let integral = variant != EndpointVariant::Percent || value.fract() == 0.0;
    if in_range && integral {
        Ok(())
    } else {
        Err(DetectionError::InvalidThreshold {
            name,
            value,
            min,
            max,
        })
    }
}
