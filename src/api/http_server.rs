// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use super::detect_hand::detect_hand_handler;
use super::handlers::health_handler;
use super::server::ApiConfig;
use super::websocket::ws_detect_hand_handler;
use crate::vision::HandDetector;

/// Slack on top of the image limit for multipart headers and boundaries
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub detector: Arc<dyn HandDetector>,
    pub max_image_bytes: usize,
}

impl AppState {
    pub fn new(detector: Arc<dyn HandDetector>, max_image_bytes: usize) -> Self {
        Self {
            detector,
            max_image_bytes,
        }
    }
}

/// Build the router for both transports
pub fn create_app(state: AppState, config: &ApiConfig) -> Result<Router> {
    let body_limit = state.max_image_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES);

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/detect-hand", post(detect_hand_handler))
        .route("/ws/detect-hand", get(ws_detect_hand_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors_layer(&config.cors_allowed_origins)?)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// CORS restricted to an explicit origin list
///
/// Credentials are allowed, so methods and headers mirror the preflight
/// request instead of using a wildcard.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .with_context(|| format!("Invalid CORS origin: {}", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}
