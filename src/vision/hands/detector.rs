// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Hand detector seam and the descriptor it produces

use anyhow::{Context, Result};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Detector is configured for a single hand per image
pub const MAX_HANDS: usize = 1;

/// Default minimum detection confidence
pub const DEFAULT_DETECTION_CONFIDENCE: f32 = 0.7;

/// Left/right classification of a detected hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    /// Map a model class index to a label (0 = Left, 1 = Right)
    pub fn from_class_id(class_id: usize) -> Option<Self> {
        match class_id {
            0 => Some(Handedness::Left),
            1 => Some(Handedness::Right),
            _ => None,
        }
    }

    /// The opposite hand, used when the model sees mirrored frames
    pub fn mirrored(self) -> Self {
        match self {
            Handedness::Left => Handedness::Right,
            Handedness::Right => Handedness::Left,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Handedness::Left => "Left",
            Handedness::Right => "Right",
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Axis-aligned box in original image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// A single detected hand
#[derive(Debug, Clone, PartialEq)]
pub struct HandDescriptor {
    pub bbox: PixelBox,
    pub handedness: Handedness,
    /// Detection confidence score (0.0-1.0)
    pub score: f32,
}

/// A long-lived hand detection model
///
/// Implementations are shared across every request handler, so `detect` takes
/// `&self` and must serialize access internally if the backing model is not
/// reentrant. Configuration is fixed at construction.
pub trait HandDetector: Send + Sync {
    /// Run detection on a decoded RGB image, returning at most one hand
    fn detect(&self, image: &DynamicImage) -> Result<Option<HandDescriptor>>;

    /// Short identifier reported by the health endpoint
    fn name(&self) -> &str;

    /// Release model resources. Later `detect` calls return an error.
    fn release(&self) {}
}

/// Run detection on the blocking thread pool
///
/// Inference is CPU-bound and must not run on the async workers.
pub async fn detect_blocking(
    detector: Arc<dyn HandDetector>,
    image: DynamicImage,
) -> Result<Option<HandDescriptor>> {
    tokio::task::spawn_blocking(move || detector.detect(&image))
        .await
        .context("Hand detection task failed to complete")?
}
