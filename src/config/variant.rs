// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Threshold scale and parameter naming of the detection endpoint
//!
//! Two endpoint generations are in use:
//! - `Percent`: `confidence` and `overlap` as integers in 0..=100
//! - `Fraction`: `confidence` and `iou_threshold` as floats in 0.0..=1.0

use std::fmt;
use std::str::FromStr;

/// Which parameter profile the detection endpoint expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndpointVariant {
    /// Integer percent thresholds, overlap sent as `overlap`
    #[default]
    Percent,
    /// Fractional thresholds, overlap sent as `iou_threshold`
    Fraction,
}

impl EndpointVariant {
    /// Query parameter name for the overlap/IoU threshold
    pub fn overlap_param(&self) -> &'static str {
        match self {
            EndpointVariant::Percent => "overlap",
            EndpointVariant::Fraction => "iou_threshold",
        }
    }

    /// Inclusive valid range for both thresholds
    pub fn range(&self) -> (f64, f64) {
        match self {
            EndpointVariant::Percent => (0.0, 100.0),
            EndpointVariant::Fraction => (0.0, 1.0),
        }
    }

    /// Default confidence/overlap pair
    pub fn default_thresholds(&self) -> (f64, f64) {
        match self {
            EndpointVariant::Percent => (40.0, 30.0),
            EndpointVariant::Fraction => (0.4, 0.3),
        }
    }

    /// Render a threshold the way the endpoint expects it on the query string
    pub fn format_threshold(&self, value: f64) -> String {
        match self {
            EndpointVariant::Percent => format!("{}", value.round() as i64),
            EndpointVariant::Fraction => format!("{}", value),
        }
    }
}

impl fmt::Display for EndpointVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointVariant::Percent => write!(f, "percent"),
            EndpointVariant::Fraction => write!(f, "fraction"),
        }
    }
}

impl FromStr for EndpointVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "percent" | "v1" | "a" => Ok(EndpointVariant::Percent),
            "fraction" | "v2" | "b" => Ok(EndpointVariant::Fraction),
            other => Err(format!(
                "unknown threshold scale '{}'; expected percent or fraction",
                other
            )),
        }
    }
}
