// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for the detection endpoint client

pub mod variant;

pub use variant::EndpointVariant;

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://detect.roboflow.com";
pub const DEFAULT_PROJECT: &str = "lions_and_hippos";
pub const DEFAULT_MODEL_ID: &str = "1";

/// Configuration for one detection endpoint, built once per process
#[derive(Clone)]
pub struct DetectionConfig {
    /// Opaque credential sent as `api_key`
    pub api_key: String,
    /// Service root, e.g. `https://detect.roboflow.com`
    pub base_url: String,
    /// Project slug
    pub project: String,
    /// Model version within the project
    pub model_id: String,
    /// Threshold scale and parameter naming
    pub variant: EndpointVariant,
    /// TrueType/OpenType font used for box labels
    pub font_path: Option<PathBuf>,
    /// Extra class name -> symbol mappings for the summary line
    pub class_symbols: HashMap<String, String>,
}

impl DetectionConfig {
    /// Load configuration from environment variables; an unrecognised
    /// `DETECTION_THRESHOLD_SCALE` is an error, not a silent default
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            api_key: env::var("ROBOFLOW_API_KEY").unwrap_or_default(),
            base_url: env::var("DETECTION_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            project: env::var("DETECTION_PROJECT")
                .unwrap_or_else(|_| DEFAULT_PROJECT.to_string()),
            model_id: env::var("DETECTION_MODEL_ID")
                .unwrap_or_else(|_| DEFAULT_MODEL_ID.to_string()),
            variant: parse_variant(env::var("DETECTION_THRESHOLD_SCALE").ok().as_deref())?,
            font_path: env::var("DETECTION_FONT_PATH").ok().map(PathBuf::from),
            class_symbols: env::var("CLASS_SYMBOLS")
                .map(|v| parse_class_symbols(&v))
                .unwrap_or_default(),
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.trim().is_empty() {
            return Err("API key is required (set ROBOFLOW_API_KEY)".to_string());
        }
        if url::Url::parse(&self.base_url).is_err() {
            return Err(format!("Invalid base URL: {}", self.base_url));
        }
        if self.project.trim().is_empty() {
            return Err("Project must not be empty".to_string());
        }
        if self.model_id.trim().is_empty() {
            return Err("Model id must not be empty".to_string());
        }
        Ok(())
    }

    /// Full inference URL: `{base_url}/{project}/{model_id}`
    pub fn endpoint_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.project.trim_matches('/'),
            self.model_id.trim_matches('/')
        )
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            project: DEFAULT_PROJECT.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            variant: EndpointVariant::default(),
            font_path: None,
            class_symbols: HashMap::new(),
        }
    }
}

// Keep the key out of logs and panics
impl std::fmt::Debug for DetectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectionConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("project", &self.project)
            .field("model_id", &self.model_id)
            .field("variant", &self.variant)
            .field("font_path", &self.font_path)
            .field("class_symbols", &self.class_symbols)
            .finish()
    }
}

/// Threshold scale from its env value; unset or blank means the default
pub fn parse_variant(raw: Option<&str>) -> Result<EndpointVariant, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(EndpointVariant::default()),
        Some(value) => value
            .parse()
            .map_err(|e| format!("DETECTION_THRESHOLD_SCALE: {}", e)),
    }
}

/// Parse `name=symbol,name=symbol`; malformed pairs are skipped
pub fn parse_class_symbols(raw: &str) -> HashMap<String, String> {
    raw.split(',')
        .filter_map(|pair| {
            let (name, symbol) = pair.split_once('=')?;
            let name = name.trim();
            let symbol = symbol.trim();
            if name.is_empty() || symbol.is_empty() {
                None
            } else {
                Some((name.to_string(), symbol.to_string()))
            }
        })
        .collect()
}
