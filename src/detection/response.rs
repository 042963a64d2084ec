// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prediction payload returned by the detection endpoint

use serde::{Deserialize, Serialize};

use super::errors::DetectionError;

/// One predicted object in center form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionBox {
    /// Center x in pixels
    pub x: f64,
    /// Center y in pixels
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Class label
    #[serde(rename = "class")]
    pub class_name: String,
    /// Class index; only used to pick a palette color
    pub class_id: i64,
    /// Score in [0, 1]
    pub confidence: f64,
}

/// Image dimensions as seen by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Deserialize)]
struct PredictionResponse {
    predictions: Vec<DetectionBox>,
    #[serde(default)]
    image: Option<ImageDimensions>,
    #[serde(default)]
    time: Option<f64>,
    #[serde(default)]
    inference_id: Option<String>,
}

/// Boxes in the order the service returned them, with response metadata
#[derive(Debug, Clone)]
pub struct PredictionResult {
    pub predictions: Vec<DetectionBox>,
    pub image: Option<ImageDimensions>,
    /// Server-side inference time in seconds
    pub time: Option<f64>,
    pub inference_id: Option<String>,
    /// Raw JSON body, kept for display
    pub raw: serde_json::Value,
}

impl PredictionResult {
    /// Parse a response body. Any box missing a required field, or with a
    /// negative size, fails the whole parse.
    pub fn parse(body: &str) -> Result<Self, DetectionError> {
        let raw: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| DetectionError::ResponseParse(format!("body is not JSON: {}", e)))?;
        Self::from_value(raw)
    }

    pub fn from_value(raw: serde_json::Value) -> Result<Self, DetectionError> {
        let response: PredictionResponse = serde_json::from_value(raw.clone())
            .map_err(|e| DetectionError::ResponseParse(e.to_string()))?;

        for (index, prediction) in response.predictions.iter().enumerate() {
            let size_ok = prediction.width.is_finite()
                && prediction.height.is_finite()
                && prediction.width >= 0.0
                && prediction.height >= 0.0;
            if !size_ok {
                return Err(DetectionError::ResponseParse(format!(
                    "prediction {} has invalid size {}x{}",
                    index, prediction.width, prediction.height
                )));
            }
        }

        Ok(Self {
            predictions: response.predictions,
            image: response.image,
            time: response.time,
            inference_id: response.inference_id,
            raw,
        })
    }

    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }
}
