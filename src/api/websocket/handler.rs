// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! WS /ws/detect-hand - streaming hand detection
//!
//! One result per image message, in arrival order. A frame that fails to
//! decode gets the error record and the connection stays open. A detector
//! fault closes the connection with code 1011.

use axum::{
    extract::{
        ws::{close_code, CloseFrame, Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, error, info, warn};

use super::messages::{decode_frame, result_message, FramePayload};
use crate::api::detect_hand::DetectionResult;
use crate::api::http_server::AppState;
use crate::vision::decode_blocking;
use crate::vision::hands::detect_blocking;

/// Room for the data URI prefix on top of the base64 body
const DATA_URI_SLACK_BYTES: usize = 1024;

/// Messages up to this many times the encoded image limit are read and
/// answered in-band; larger ones are refused by the transport
const TRANSPORT_HEADROOM: usize = 4;

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Text length of a data URI carrying a `max_image_bytes` image
pub fn encoded_frame_size(max_image_bytes: usize) -> usize {
    max_image_bytes
        .saturating_add(2)
        .saturating_div(3)
        .saturating_mul(4)
        .saturating_add(DATA_URI_SLACK_BYTES)
}

/// Largest message the transport accepts before dropping the connection
pub fn max_message_size(max_image_bytes: usize) -> usize {
    encoded_frame_size(max_image_bytes).saturating_mul(TRANSPORT_HEADROOM)
}

pub async fn ws_detect_hand_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let limit = max_message_size(state.max_image_bytes);
    ws.max_message_size(limit)
        .max_frame_size(limit)
        .on_upgrade(move |socket| handle_detect_stream(socket, state))
}

/// Serve one client connection until it disconnects or a fault occurs
pub async fn handle_detect_stream(mut socket: WebSocket, state: AppState) {
    let connection_id = NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed);
    let mut frames: u64 = 0;
    info!("🔌 Detection stream {} connected", connection_id);

    while let Some(msg) = socket.recv().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                warn!("Detection stream {} receive error: {}", connection_id, e);
                break;
            }
        };

        let payload = match msg {
            // Pongs are queued by the transport when a ping is read
            Message::Ping(_) | Message::Pong(_) => continue,
            Message::Close(frame) => {
                debug!("Detection stream {} close frame: {:?}", connection_id, frame);
                break;
            }
            other => match FramePayload::from_message(other) {
                Some(payload) => payload,
                None => continue,
            },
        };

        frames += 1;

        let max_bytes = state.max_image_bytes;
        let decoded = decode_blocking(move || decode_frame(&payload, max_bytes)).await;

        let result = match decoded {
            Ok((image, _)) => match detect_blocking(state.detector.clone(), image).await {
                Ok(hand) => DetectionResult::from(hand),
                Err(e) => {
                    error!(
                        "Detection stream {} inference failed on frame {}: {:#}",
                        connection_id, frames, e
                    );
                    close_with_error(&mut socket, "Hand detection failed").await;
                    return;
                }
            },
            Err(e) => {
                warn!(
                    "Detection stream {} frame {} rejected: {}",
                    connection_id, frames, e
                );
                DetectionResult::invalid_image()
            }
        };

        let reply = match result_message(&result) {
            Ok(reply) => reply,
            Err(e) => {
                error!("Failed to serialize detection result: {}", e);
                close_with_error(&mut socket, "Internal error").await;
                return;
            }
        };

        if let Err(e) = socket.send(reply).await {
            warn!("Detection stream {} send failed: {}", connection_id, e);
            break;
        }
    }

    info!(
        "📴 Detection stream {} disconnected after {} frames",
        connection_id, frames
    );
}

async fn close_with_error(socket: &mut WebSocket, reason: &'static str) {
    let _ = socket
        .send(Message::Close(Some(CloseFrame {
            code: close_code::ERROR,
            reason: reason.into(),
        })))
        .await;
}
