// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use clap::Parser;
use std::path::PathBuf;

use crate::config::{NodeConfig, CONFIG_PATH_ENV};

/// Hand Detect Node
#[derive(Parser, Debug, Default)]
#[command(name = "hand-detect-node")]
#[command(version)]
#[command(about = "Hand detection over HTTP upload and WebSocket stream", long_about = None)]
pub struct Cli {
    /// TOML config file with [api] and [detector] sections
    #[arg(long, env = CONFIG_PATH_ENV)]
    pub config: Option<PathBuf>,

    /// Socket address to listen on (e.g. 0.0.0.0:8000)
    #[arg(long)]
    pub listen_addr: Option<String>,

    /// Path to the ONNX hand detection model
    #[arg(long)]
    pub model_path: Option<PathBuf>,

    /// Minimum detection confidence in (0, 1]
    #[arg(long)]
    pub detection_confidence: Option<f32>,

    /// Emit logs as JSON lines
    #[arg(long, env = "LOG_JSON")]
    pub log_json: bool,
}

impl Cli {
    /// Overlay flags that were given on the command line
    pub fn apply_overrides(&self, config: &mut NodeConfig) {
        if let Some(addr) = &self.listen_addr {
            config.api.listen_addr = addr.clone();
        }
        if let Some(path) = &self.model_path {
            config.detector.model_path = path.clone();
        }
        if let Some(confidence) = self.detection_confidence {
            config.detector.detection_confidence = confidence;
        }
    }
}
