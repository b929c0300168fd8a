// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Hand detection endpoint handler

use axum::{body::Bytes, extract::State, Json};
use axum_extra::extract::Multipart;
use tracing::{debug, error, warn};

use super::response::DetectionResult;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::vision::{decode_blocking, decode_image_bytes, hands::detect_blocking};

/// Multipart field carrying the image
pub const UPLOAD_FIELD: &str = "file";

/// POST /detect-hand - Detect a single hand in an uploaded image
///
/// Accepts a multipart upload with the encoded image in the `file` field.
///
/// # Response
/// - `handDetected`: Whether a hand was found
/// - `handType`: "Left" | "Right" | null
/// - `bbox`: `{x, y, w, h}` in image pixels | null
///
/// # Errors
/// - 400 Bad Request: Bytes do not decode to an image, or malformed multipart body
/// - 422 Unprocessable Entity: No `file` field
/// - 500 Internal Server Error: Detection failed
pub async fn detect_hand_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<DetectionResult>, ApiError> {
    let bytes = read_upload(&mut multipart).await?;

    let max_bytes = state.max_image_bytes;
    let (image, info) = decode_blocking(move || decode_image_bytes(&bytes, max_bytes))
        .await
        .map_err(|e| {
            warn!("Failed to decode uploaded image: {}", e);
            ApiError::InvalidImage(e.to_string())
        })?;

    debug!(
        "Decoded upload: {}x{} {:?}, {} bytes",
        info.width, info.height, info.format, info.size_bytes
    );

    let hand = detect_blocking(state.detector.clone(), image)
        .await
        .map_err(|e| {
            error!("Hand detection failed: {:#}", e);
            ApiError::InternalError(e.to_string())
        })?;

    Ok(Json(DetectionResult::from(hand)))
}

async fn read_upload(multipart: &mut Multipart) -> Result<Bytes, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidRequest(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        return field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to read upload: {}", e)));
    }

    Err(ApiError::MissingField(UPLOAD_FIELD.to_string()))
}
