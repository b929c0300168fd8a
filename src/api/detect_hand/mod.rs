// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Hand detection API endpoint module
//!
//! Provides POST /detect-hand for single-shot image uploads.

pub mod handler;
pub mod response;

pub use handler::{detect_hand_handler, UPLOAD_FIELD};
pub use response::{BoundingBox, DetectionResult, INVALID_IMAGE_MESSAGE};
