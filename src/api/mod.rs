// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod detect_hand;
pub mod errors;
pub mod handlers;
pub mod http_server;
pub mod server;
pub mod websocket;

pub use detect_hand::{detect_hand_handler, BoundingBox, DetectionResult, INVALID_IMAGE_MESSAGE};
pub use errors::{ApiError, ErrorResponse};
pub use handlers::{health_handler, HealthResponse};
pub use http_server::{create_app, cors_layer, AppState};
pub use server::{ApiConfig, ApiServer};
pub use websocket::ws_detect_hand_handler;
