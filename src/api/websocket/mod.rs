// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod handler;
pub mod messages;

pub use handler::{handle_detect_stream, ws_detect_hand_handler};
pub use messages::{decode_frame, result_message, FramePayload};
