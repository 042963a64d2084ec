// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Loading the user's image before a run
//!
//! Uploads are decoded locally and re-encoded as JPEG for the request body.
//! URLs are fetched once so the image can be shown and annotated; the
//! detection endpoint then fetches the same URL itself.

use image::RgbImage;
use reqwest::Client;
use std::path::Path;
use tracing::{debug, info};

use crate::detection::{DetectionError, ImageSource};

use super::image_utils::{decode_image_bytes, normalize_upload, ImageError, MAX_IMAGE_SIZE};

/// Decoded image ready for display plus the source to send
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub image: RgbImage,
    pub source: ImageSource,
}

/// Loads images from uploads and remote URLs
pub struct ImageLoader {
    client: Client,
}

impl ImageLoader {
    pub fn new() -> Result<Self, DetectionError> {
        let client = Client::builder().build()?;
        Ok(Self { client })
    }

    /// Wrap uploaded bytes
    pub fn from_upload(&self, bytes: &[u8]) -> Result<LoadedImage, DetectionError> {
        let (image, jpeg) = normalize_upload(bytes)?;
        Ok(LoadedImage {
            image,
            source: ImageSource::Bytes(jpeg),
        })
    }

    /// Read and wrap an image file from disk
    pub fn load_file(&self, path: &Path) -> Result<LoadedImage, DetectionError> {
        let bytes = std::fs::read(path).map_err(|e| {
            DetectionError::SourceFetch(format!("Error: {}: {}", path.display(), e))
        })?;
        debug!("Read {} bytes from {}", bytes.len(), path.display());
        self.from_upload(&bytes)
    }

    /// Fetch and decode an image URL
    pub async fn fetch_url(&self, image_url: &str) -> Result<LoadedImage, DetectionError> {
        let parsed = url::Url::parse(image_url)
            .map_err(|e| DetectionError::SourceFetch(format!("Error: invalid URL: {}", e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DetectionError::SourceFetch(format!(
                "Error: unsupported URL scheme '{}'",
                parsed.scheme()
            )));
        }

        debug!("Fetching source image from: {}", image_url);
        let mut response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| DetectionError::SourceFetch(format!("Error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DetectionError::SourceFetch(format!(
                "Request failed: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        // Refuse oversized bodies up front when announced, else while reading
        if let Some(length) = response.content_length() {
            if length > MAX_IMAGE_SIZE as u64 {
                return Err(ImageError::TooLarge(length as usize, MAX_IMAGE_SIZE).into());
            }
        }
        let mut bytes = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| DetectionError::SourceFetch(format!("Error: {}", e)))?
        {
            if bytes.len() + chunk.len() > MAX_IMAGE_SIZE {
                return Err(
                    ImageError::TooLarge(bytes.len() + chunk.len(), MAX_IMAGE_SIZE).into(),
                );
            }
            bytes.extend_from_slice(&chunk);
        }
        let (image, info) = decode_image_bytes(&bytes)?;
        info!(
            "Fetched {}x{} {:?} image ({} bytes)",
            info.width, info.height, info.format, info.size_bytes
        );

        Ok(LoadedImage {
            image: image.to_rgb8(),
            source: ImageSource::RemoteUrl(image_url.to_string()),
        })
    }
}
