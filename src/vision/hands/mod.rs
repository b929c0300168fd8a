// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Hand detection adapter
//!
//! Components:
//! - `detector` - `HandDetector` trait and descriptor types
//! - `preprocessing` - Letterboxing and tensor conversion
//! - `model` - ONNX Runtime backed detector

pub mod detector;
pub mod model;
pub mod preprocessing;

pub use detector::{
    detect_blocking, HandDescriptor, HandDetector, Handedness, PixelBox,
    DEFAULT_DETECTION_CONFIDENCE, MAX_HANDS,
};
pub use model::{HandDetectorConfig, OnnxHandDetector};
pub use preprocessing::{preprocess_for_detection, LetterboxInfo, DEFAULT_INPUT_SIZE};
