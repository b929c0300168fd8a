// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing for hand detection
//!
//! This module provides:
//! - Frame decoding (multipart bytes, base64 data-URIs)
//! - The hand detector adapter around a pre-trained ONNX model
//!
//! Inference runs on CPU.

pub mod hands;
pub mod image_utils;

pub use hands::{HandDescriptor, HandDetector, HandDetectorConfig, Handedness, OnnxHandDetector};
pub use image_utils::{
    decode_base64_image, decode_blocking, decode_data_uri, decode_image_bytes, detect_format, ImageError, ImageInfo,
    DEFAULT_MAX_IMAGE_BYTES,
};
