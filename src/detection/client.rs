// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Client for a hosted object-detection inference endpoint

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Request};
use tracing::{debug, info, warn};

use crate::config::{DetectionConfig, EndpointVariant};

use super::errors::DetectionError;
use super::request::{ImageSource, ThresholdParams};
use super::response::PredictionResult;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Builds and sends one prediction request per call. No retries, no
/// timeout beyond the transport default.
pub struct DetectionClient {
    client: Client,
    endpoint: url::Url,
    api_key: String,
    variant: EndpointVariant,
}

impl DetectionClient {
    /// Create a client from a validated configuration
    pub fn new(config: &DetectionConfig) -> Result<Self, DetectionError> {
        config.validate().map_err(DetectionError::Config)?;

        let endpoint = url::Url::parse(&config.endpoint_url())
            .map_err(|e| DetectionError::Config(format!("invalid endpoint URL: {}", e)))?;
        let client = Client::builder().build()?;

        info!(
            "Detection client configured: endpoint={}, variant={}",
            endpoint, config.variant
        );

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
            variant: config.variant,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    pub fn variant(&self) -> EndpointVariant {
        self.variant
    }

    /// Build the request without sending it.
    ///
    /// Both source kinds share `api_key`, the two thresholds and
    /// `format=json`. Bytes go base64 in a form-encoded body; a URL goes in
    /// the `image` parameter with no body and no content type.
    pub fn build_request(
        &self,
        source: &ImageSource,
        thresholds: &ThresholdParams,
    ) -> Result<Request, DetectionError> {
        if thresholds.variant() != self.variant {
            return Err(DetectionError::Config(format!(
                "thresholds are in {} scale but the endpoint expects {}",
                thresholds.variant(),
                self.variant
            )));
        }

        let [confidence, overlap] = thresholds.query_pairs();
        let mut params: Vec<(&str, String)> = vec![
            ("api_key", self.api_key.clone()),
            confidence,
            overlap,
            ("format", "json".to_string()),
        ];
        if let ImageSource::RemoteUrl(image_url) = source {
            params.push(("image", image_url.clone()));
        }

        let mut builder = self.client.post(self.endpoint.clone()).query(&params);
        if let ImageSource::Bytes(bytes) = source {
            builder = builder
                .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(STANDARD.encode(bytes));
        }

        Ok(builder.build()?)
    }

    /// Run one prediction. A non-2xx status is returned as
    /// [`DetectionError::UpstreamHttp`] before the body is looked at.
    pub async fn predict(
        &self,
        source: &ImageSource,
        thresholds: &ThresholdParams,
    ) -> Result<PredictionResult, DetectionError> {
        let request = self.build_request(source, thresholds)?;
        debug!(
            "Detection POST {} (source={}, confidence={}, {}={})",
            self.endpoint,
            source.kind(),
            thresholds.confidence(),
            self.variant.overlap_param(),
            thresholds.overlap()
        );

        let start = std::time::Instant::now();
        let response = self.client.execute(request).await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Detection endpoint returned {}", status);
            return Err(upstream_error(status));
        }

        let body = response.text().await?;
        let result = PredictionResult::parse(&body)?;
        info!(
            "Received {} predictions in {}ms",
            result.len(),
            start.elapsed().as_millis()
        );
        Ok(result)
    }
}

/// Error for a non-2xx status. The reason is the standard phrase for the
/// code (`reqwest` does not expose the server's own status line), or
/// `"Unknown"` for codes without one.
pub fn upstream_error(status: reqwest::StatusCode) -> DetectionError {
    DetectionError::UpstreamHttp {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
    }
}
