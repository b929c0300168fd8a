// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ONNX hand detection model
//!
//! Wraps a pre-trained hand detector exported to ONNX. The graph is expected to
//! take a letterboxed `[1, 3, S, S]` RGB tensor in 0..1 and to emit candidates
//! as rows of `x1, y1, x2, y2, score, class` (class 0 = Left, 1 = Right) with
//! non-maximum suppression already applied. This adapter only converts tensors
//! and picks the best candidate; it does not implement detection itself.

use anyhow::{anyhow, Context, Result};
use image::DynamicImage;
use ndarray::ArrayViewD;
use ort::execution_providers::CPU as CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, info};

use super::detector::{
    HandDescriptor, HandDetector, Handedness, PixelBox, DEFAULT_DETECTION_CONFIDENCE, MAX_HANDS,
};
use super::preprocessing::{preprocess_for_detection, LetterboxInfo, DEFAULT_INPUT_SIZE};

/// Values per candidate row in the model output
const CANDIDATE_WIDTH: usize = 6;

/// Configuration fixed when the detector is constructed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandDetectorConfig {
    /// Path to the ONNX model file
    pub model_path: PathBuf,
    /// Minimum score for a candidate to count as a hand
    pub detection_confidence: f32,
    /// Square model input size in pixels
    pub input_size: u32,
    /// ONNX Runtime intra-op threads
    pub intra_threads: usize,
    /// Swap Left/Right labels (for models trained on mirrored selfie frames)
    pub mirror_handedness: bool,
}

impl Default for HandDetectorConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("./models/hand-detector/model.onnx"),
            detection_confidence: DEFAULT_DETECTION_CONFIDENCE,
            input_size: DEFAULT_INPUT_SIZE,
            intra_threads: 4,
            mirror_handedness: false,
        }
    }
}

/// Raw candidate as emitted by the model, in model input space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub score: f32,
    pub class_id: usize,
}

/// Hand detector backed by an ONNX Runtime session
///
/// Runs on CPU. The session sits behind a mutex so at most one inference is
/// in flight for this model instance; `release` drops it.
pub struct OnnxHandDetector {
    session: Arc<Mutex<Option<Session>>>,
    input_name: String,
    config: HandDetectorConfig,
}

impl std::fmt::Debug for OnnxHandDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxHandDetector")
            .field("input_name", &self.input_name)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl OnnxHandDetector {
    /// Load the hand detection model
    ///
    /// # Errors
    /// Returns error if:
    /// - Model file not found
    /// - ONNX Runtime initialization fails
    pub fn new(config: HandDetectorConfig) -> Result<Self> {
        let model_path: &Path = config.model_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("Hand detection model not found: {}", model_path.display());
        }

        info!("Loading hand detection model from {}", model_path.display());

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .map_err(ort::Error::<()>::from)
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(ort::Error::<()>::from)
            .context("Failed to set optimization level")?
            .with_intra_threads(config.intra_threads)
            .map_err(ort::Error::<()>::from)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .with_context(|| {
                format!(
                    "Failed to load hand detection model from {}",
                    model_path.display()
                )
            })?;

        let input_name = session
            .inputs()
            .first()
            .map(|input| input.name().to_string())
            .unwrap_or_else(|| "images".to_string());

        debug!("Hand detection model input: {}", input_name);

        info!(
            "✅ Hand detection model loaded (max_hands={}, confidence={:.2}, input={})",
            MAX_HANDS, config.detection_confidence, config.input_size
        );

        Ok(Self {
            session: Arc::new(Mutex::new(Some(session))),
            input_name,
            config,
        })
    }

    pub fn config(&self) -> &HandDetectorConfig {
        &self.config
    }

    fn run_model(&self, image: &DynamicImage) -> Result<(Vec<Candidate>, LetterboxInfo)> {
        let (tensor, letterbox) = preprocess_for_detection(image, self.config.input_size);

        let mut guard = self
            .session
            .lock()
            .map_err(|_| anyhow!("Hand detection session lock poisoned"))?;
        let session = guard
            .as_mut()
            .ok_or_else(|| anyhow!("Hand detection model has been released"))?;

        let input_value = Value::from_array(tensor).context("Failed to create input tensor")?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_value])
            .context("Hand detection inference failed")?;

        let output = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        let candidates = parse_candidates(output.view())?;
        Ok((candidates, letterbox))
    }
}

impl HandDetector for OnnxHandDetector {
    fn detect(&self, image: &DynamicImage) -> Result<Option<HandDescriptor>> {
        let start = Instant::now();
        let (candidates, letterbox) = self.run_model(image)?;

        let hand = select_hand(
            &candidates,
            &letterbox,
            self.config.detection_confidence,
            self.config.mirror_handedness,
        );

        debug!(
            "Hand detection: {} candidates, detected={}, {}ms",
            candidates.len(),
            hand.is_some(),
            start.elapsed().as_millis()
        );

        Ok(hand)
    }

    fn name(&self) -> &str {
        "onnx-hand-detector"
    }

    fn release(&self) {
        if let Ok(mut guard) = self.session.lock() {
            if guard.take().is_some() {
                info!("Hand detection model released");
            }
        }
    }
}

/// Parse model output rows into candidates
///
/// Accepts `[1, N, 6]` or `[N, 6]`.
pub fn parse_candidates(output: ArrayViewD<f32>) -> Result<Vec<Candidate>> {
    let shape = output.shape().to_vec();
    let rows = match shape.as_slice() {
        [1, n, w] if *w == CANDIDATE_WIDTH => *n,
        [n, w] if *w == CANDIDATE_WIDTH => *n,
        _ => anyhow::bail!(
            "Unexpected hand detection output shape: {:?}, expected [1, N, {}]",
            shape,
            CANDIDATE_WIDTH
        ),
    };

    let values: Vec<f32> = output.iter().copied().collect();
    let candidates = values
        .chunks_exact(CANDIDATE_WIDTH)
        .take(rows)
        .filter(|row| row[5] >= 0.0)
        .map(|row| Candidate {
            x1: row[0],
            y1: row[1],
            x2: row[2],
            y2: row[3],
            score: row[4],
            class_id: row[5].round() as usize,
        })
        .collect();

    Ok(candidates)
}

/// Keep the best candidate above `threshold` and map it to original pixels
///
/// Candidates with an unknown class or a box that collapses after clamping
/// to the image are skipped.
pub fn select_hand(
    candidates: &[Candidate],
    letterbox: &LetterboxInfo,
    threshold: f32,
    mirror_handedness: bool,
) -> Option<HandDescriptor> {
    let mut ranked: Vec<&Candidate> = candidates
        .iter()
        .filter(|c| c.score.is_finite() && c.score >= threshold)
        .collect();
    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    ranked
        .into_iter()
        .filter_map(|c| {
            let handedness = Handedness::from_class_id(c.class_id)?;
            let handedness = if mirror_handedness {
                handedness.mirrored()
            } else {
                handedness
            };
            let bbox = to_pixel_box(c, letterbox)?;
            Some(HandDescriptor {
                bbox,
                handedness,
                score: c.score,
            })
        })
        .take(MAX_HANDS)
        .next()
}

fn to_pixel_box(candidate: &Candidate, letterbox: &LetterboxInfo) -> Option<PixelBox> {
    let (x1, y1) = letterbox.map_to_original(candidate.x1, candidate.y1);
    let (x2, y2) = letterbox.map_to_original(candidate.x2, candidate.y2);

    let max_x = letterbox.original_width as f32;
    let max_y = letterbox.original_height as f32;

    let left = x1.min(x2).clamp(0.0, max_x).round() as u32;
    let top = y1.min(y2).clamp(0.0, max_y).round() as u32;
    let right = x1.max(x2).clamp(0.0, max_x).round() as u32;
    let bottom = y1.max(y2).clamp(0.0, max_y).round() as u32;

    if right <= left || bottom <= top {
        return None;
    }

    Some(PixelBox {
        x: left,
        y: top,
        width: right - left,
        height: bottom - top,
    })
}
