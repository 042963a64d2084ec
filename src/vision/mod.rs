// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image handling around a detection run
//!
//! This module provides:
//! - Decoding of uploads and fetched URLs
//! - Box overlay rendering on a copy of the image
//! - The per-run class summary line

pub mod annotate;
pub mod image_utils;
pub mod source;
pub mod summary;

pub use annotate::{
    box_label, palette_color, palette_index, AnnotatedImage, Annotator, BoxCorners, PALETTE,
};
pub use image_utils::{
    decode_image_bytes, detect_format, normalize_upload, ImageError, ImageInfo, MAX_IMAGE_SIZE,
};
pub use source::{ImageLoader, LoadedImage};
pub use summary::ClassSymbols;
