// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error types for a single detection run
//!
//! Every error is local to the run that produced it; nothing here is retried
//! and nothing is rendered once one of these is returned.

use thiserror::Error;

/// Errors that can occur while loading a source, calling the endpoint or
/// reading its response
#[derive(Error, Debug)]
pub enum DetectionError {
    /// The image source could not be read, fetched or decoded
    #[error("{0}")]
    SourceFetch(String),

    /// The detection endpoint answered with a non-2xx status
    #[error("Request failed: {status} {reason}")]
    UpstreamHttp { status: u16, reason: String },

    /// The response body is not a well-formed prediction payload
    #[error("Invalid prediction response: {0}")]
    ResponseParse(String),

    /// A threshold is outside the range of the configured endpoint variant
    #[error("{name} threshold {value} is outside {min}..={max}")]
    InvalidThreshold {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Client setup or configuration problem
    #[error("Configuration error: {0}")]
    Config(String),

    /// The detection call never produced a response
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl DetectionError {
    /// Get error code for logging
    pub fn error_code(&self) -> &'static str {
        match self {
            DetectionError::SourceFetch(_) => "SOURCE_FETCH_FAILED",
            DetectionError::UpstreamHttp { .. } => "UPSTREAM_HTTP_ERROR",
            DetectionError::ResponseParse(_) => "RESPONSE_PARSE_ERROR",
            DetectionError::InvalidThreshold { .. } => "INVALID_THRESHOLD",
            DetectionError::Config(_) => "CONFIG_ERROR",
            DetectionError::Transport(_) => "TRANSPORT_ERROR",
        }
    }

    /// Status code of an upstream HTTP failure
    pub fn status(&self) -> Option<u16> {
        match self {
            DetectionError::UpstreamHttp { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<crate::vision::ImageError> for DetectionError {
    fn from(err: crate::vision::ImageError) -> Self {
        DetectionError::SourceFetch(format!("Error: {}", err))
    }
}
