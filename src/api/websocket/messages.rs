// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Frame payloads for the detection stream
//!
//! Clients send one image per message: a text data URI
//! (`data:image/jpeg;base64,...`) or the raw encoded bytes as a binary
//! message. Every image message gets exactly one JSON result back.

use axum::extract::ws::Message;
use image::DynamicImage;

use crate::api::detect_hand::DetectionResult;
use crate::vision::{decode_data_uri, decode_image_bytes, ImageError, ImageInfo};

/// Image-bearing payload of an inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FramePayload {
    DataUri(String),
    Raw(Vec<u8>),
}

impl FramePayload {
    /// Extract the payload, or `None` for control messages
    pub fn from_message(message: Message) -> Option<Self> {
        match message {
            Message::Text(text) => Some(FramePayload::DataUri(text)),
            Message::Binary(bytes) => Some(FramePayload::Raw(bytes)),
            _ => None,
        }
    }
}

/// Decode a frame payload into an RGB image
pub fn decode_frame(
    payload: &FramePayload,
    max_bytes: usize,
) -> Result<(DynamicImage, ImageInfo), ImageError> {
    match payload {
        FramePayload::DataUri(frame) => decode_data_uri(frame, max_bytes),
        FramePayload::Raw(bytes) => decode_image_bytes(bytes, max_bytes),
    }
}

/// Serialize a result as an outbound text message
pub fn result_message(result: &DetectionResult) -> Result<Message, serde_json::Error> {
    serde_json::to_string(result).map(Message::Text)
}
