// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Hand detector adapter tests
//!
//! The adapter tests drive the tensor mapping with synthetic model output.
//! Tests that need the real model are ignored unless HAND_MODEL_PATH points
//! at an ONNX file.

use hand_detect_node::vision::hands::{
    detect_blocking,
    model::{parse_candidates, select_hand, Candidate},
    preprocess_for_detection, HandDetector, HandDetectorConfig, Handedness, LetterboxInfo,
    OnnxHandDetector, DEFAULT_INPUT_SIZE,
};
use image::{DynamicImage, RgbImage};
use ndarray::Array3;
use std::path::PathBuf;
use std::sync::Arc;

fn candidate(x1: f32, y1: f32, x2: f32, y2: f32, score: f32, class_id: usize) -> Candidate {
    Candidate {
        x1,
        y1,
        x2,
        y2,
        score,
        class_id,
    }
}

#[test]
fn test_missing_model_fails_construction() {
    let config = HandDetectorConfig {
        model_path: PathBuf::from("/nonexistent/hand-detector.onnx"),
        ..Default::default()
    };

    let err = OnnxHandDetector::new(config).err().unwrap();
    assert!(err.to_string().contains("not found"));
}

#[test]
fn test_model_output_to_descriptor() {
    // 1280x720 frame letterboxed into 640: scale 0.5, vertical padding 140
    let letterbox = LetterboxInfo::new(1280, 720, DEFAULT_INPUT_SIZE);
    assert_eq!(letterbox.offset_y, 140);

    let output = Array3::from_shape_vec(
        (1, 3, 6),
        vec![
            100.0, 200.0, 150.0, 300.0, 0.65, 1.0, // below threshold
            320.0, 240.0, 420.0, 340.0, 0.91, 0.0, // best
            0.0, 0.0, 0.0, 0.0, 0.0, -1.0, // padding row
        ],
    )
    .unwrap()
    .into_dyn();

    let candidates = parse_candidates(output.view()).unwrap();
    assert_eq!(candidates.len(), 2);

    let hand = select_hand(&candidates, &letterbox, 0.7, false).unwrap();
    assert_eq!(hand.handedness, Handedness::Left);
    assert_eq!(hand.bbox.x, 640);
    assert_eq!(hand.bbox.y, 200);
    assert_eq!(hand.bbox.width, 200);
    assert_eq!(hand.bbox.height, 200);
}

#[test]
fn test_only_one_hand_reported() {
    let letterbox = LetterboxInfo::new(640, 640, 640);
    let candidates = vec![
        candidate(10.0, 10.0, 60.0, 60.0, 0.80, 0),
        candidate(300.0, 300.0, 400.0, 400.0, 0.97, 1),
        candidate(500.0, 500.0, 600.0, 600.0, 0.90, 0),
    ];

    let hand = select_hand(&candidates, &letterbox, 0.7, false).unwrap();
    assert_eq!(hand.handedness, Handedness::Right);
    assert_eq!(hand.bbox.x, 300);
}

#[test]
fn test_box_is_clamped_into_image() {
    let letterbox = LetterboxInfo::new(640, 640, 640);
    let candidates = vec![candidate(-50.0, 600.0, 100.0, 700.0, 0.9, 1)];

    let hand = select_hand(&candidates, &letterbox, 0.7, false).unwrap();
    assert_eq!(hand.bbox.x, 0);
    assert_eq!(hand.bbox.width, 100);
    assert_eq!(hand.bbox.y + hand.bbox.height, 640);
}

#[test]
fn test_box_in_padding_is_dropped() {
    // Box lies entirely in the top padding band of a wide frame
    let letterbox = LetterboxInfo::new(1280, 720, 640);
    let candidates = vec![candidate(100.0, 10.0, 200.0, 100.0, 0.95, 0)];

    assert!(select_hand(&candidates, &letterbox, 0.7, false).is_none());
}

#[test]
fn test_preprocess_shape_for_any_aspect() {
    for (w, h) in [(640, 480), (480, 640), (1, 1), (1920, 1080)] {
        let image = DynamicImage::ImageRgb8(RgbImage::new(w, h));
        let (tensor, letterbox) = preprocess_for_detection(&image, 320);

        assert_eq!(tensor.shape(), &[1, 3, 320, 320]);
        assert!(tensor.iter().all(|v| (0.0..=1.0).contains(v)));
        assert_eq!(letterbox.original_width, w);
        assert_eq!(letterbox.original_height, h);
    }
}

fn model_from_env() -> Option<OnnxHandDetector> {
    let path = std::env::var("HAND_MODEL_PATH").ok()?;
    let config = HandDetectorConfig {
        model_path: PathBuf::from(path),
        ..Default::default()
    };
    Some(OnnxHandDetector::new(config).unwrap())
}

#[tokio::test]
#[ignore] // Requires HAND_MODEL_PATH
async fn test_real_model_blank_frame_has_no_hand() {
    let Some(detector) = model_from_env() else {
        eprintln!("HAND_MODEL_PATH not set, skipping");
        return;
    };

    let detector: Arc<dyn HandDetector> = Arc::new(detector);
    let blank = DynamicImage::ImageRgb8(RgbImage::new(640, 480));

    let first = detect_blocking(detector.clone(), blank.clone()).await.unwrap();
    let second = detect_blocking(detector.clone(), blank).await.unwrap();

    assert!(first.is_none());
    assert_eq!(first, second);
}

#[tokio::test]
#[ignore] // Requires HAND_MODEL_PATH
async fn test_real_model_release_fails_later_calls() {
    let Some(detector) = model_from_env() else {
        eprintln!("HAND_MODEL_PATH not set, skipping");
        return;
    };

    let detector: Arc<dyn HandDetector> = Arc::new(detector);
    detector.release();

    let image = DynamicImage::ImageRgb8(RgbImage::new(64, 64));
    assert!(detect_blocking(detector, image).await.is_err());
}
