// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Hand detection result record
//!
//! Shared by the HTTP endpoint and the stream transport. `handDetected` is
//! false exactly when both `handType` and `bbox` are null.

use serde::{Deserialize, Serialize};

use crate::vision::hands::{HandDescriptor, Handedness};

/// Error text sent on the stream when a frame cannot be decoded
pub const INVALID_IMAGE_MESSAGE: &str = "Invalid image";

/// Bounding box in original image pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Per-frame detection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub hand_detected: bool,
    pub hand_type: Option<Handedness>,
    pub bbox: Option<BoundingBox>,
    /// Present only on stream decode failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DetectionResult {
    /// A valid image with no hand in it
    pub fn no_hand() -> Self {
        Self {
            hand_detected: false,
            hand_type: None,
            bbox: None,
            error: None,
        }
    }

    pub fn hand(descriptor: &HandDescriptor) -> Self {
        Self {
            hand_detected: true,
            hand_type: Some(descriptor.handedness),
            bbox: Some(BoundingBox {
                x: descriptor.bbox.x,
                y: descriptor.bbox.y,
                w: descriptor.bbox.width,
                h: descriptor.bbox.height,
            }),
            error: None,
        }
    }

    /// Error record for a frame that could not be decoded
    pub fn invalid_image() -> Self {
        Self {
            error: Some(INVALID_IMAGE_MESSAGE.to_string()),
            ..Self::no_hand()
        }
    }

    /// `handDetected` agrees with the presence of both `handType` and `bbox`
    pub fn is_consistent(&self) -> bool {
        if self.hand_detected {
            self.hand_type.is_some() && self.bbox.is_some()
        } else {
            self.hand_type.is_none() && self.bbox.is_none()
        }
    }
}

impl From<Option<HandDescriptor>> for DetectionResult {
    fn from(descriptor: Option<HandDescriptor>) -> Self {
        descriptor
            .as_ref()
            .map(DetectionResult::hand)
            .unwrap_or_else(DetectionResult::no_hand)
    }
}
