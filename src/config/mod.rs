// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Node configuration
//!
//! Layered lowest priority first: built-in defaults, an optional TOML file,
//! environment variables, then CLI flags (applied by `cli`).

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::api::ApiConfig;
use crate::vision::HandDetectorConfig;

/// Environment variable naming the TOML config file
pub const CONFIG_PATH_ENV: &str = "HAND_NODE_CONFIG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: {value:?}")]
    InvalidEnv { key: &'static str, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NodeConfig {
    pub api: ApiConfig,
    pub detector: HandDetectorConfig,
}

impl NodeConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults, overlaid with `path` (or `HAND_NODE_CONFIG`) and the process environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from);

        let mut config = match path.map(Path::to_path_buf).or(env_path) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_env()?;
        Ok(config)
    }

    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("LISTEN_ADDR") {
            self.api.listen_addr = addr;
        }

        if let Some(port) = lookup("API_PORT") {
            let port: u16 = parse_env("API_PORT", &port)?;
            self.api.listen_addr = with_port(&self.api.listen_addr, port);
        }

        if let Some(origins) = lookup("CORS_ALLOWED_ORIGINS") {
            self.api.cors_allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect();
        }

        if let Some(max) = lookup("MAX_IMAGE_BYTES") {
            self.api.max_image_bytes = parse_env("MAX_IMAGE_BYTES", &max)?;
        }

        if let Some(path) = lookup("HAND_MODEL_PATH") {
            self.detector.model_path = PathBuf::from(path);
        }

        if let Some(confidence) = lookup("DETECTION_CONFIDENCE") {
            self.detector.detection_confidence = parse_env("DETECTION_CONFIDENCE", &confidence)?;
        }

        if let Some(size) = lookup("HAND_MODEL_INPUT_SIZE") {
            self.detector.input_size = parse_env("HAND_MODEL_INPUT_SIZE", &size)?;
        }

        if let Some(threads) = lookup("HAND_MODEL_THREADS") {
            self.detector.intra_threads = parse_env("HAND_MODEL_THREADS", &threads)?;
        }

        if let Some(mirror) = lookup("MIRROR_HANDEDNESS") {
            self.detector.mirror_handedness = parse_bool("MIRROR_HANDEDNESS", &mirror)?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let confidence = self.detector.detection_confidence;
        if !(confidence > 0.0 && confidence <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "detection_confidence must be in (0, 1], got {}",
                confidence
            )));
        }

        let size = self.detector.input_size;
        if size == 0 || size % 32 != 0 {
            return Err(ConfigError::Invalid(format!(
                "input_size must be a positive multiple of 32, got {}",
                size
            )));
        }

        if self.detector.intra_threads == 0 {
            return Err(ConfigError::Invalid(
                "intra_threads must be at least 1".to_string(),
            ));
        }

        if self.api.max_image_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_image_bytes must be greater than 0".to_string(),
            ));
        }

        if self.api.cors_allowed_origins.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one CORS origin is required".to_string(),
            ));
        }

        for origin in &self.api.cors_allowed_origins {
            if HeaderValue::from_str(origin).is_err() {
                return Err(ConfigError::Invalid(format!(
                    "CORS origin is not a valid header value: {:?}",
                    origin
                )));
            }
        }

        if self.api.listen_addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::Invalid(format!(
                "listen_addr is not a socket address: {}",
                self.api.listen_addr
            )));
        }

        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        key,
        value: value.to_string(),
    })
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            key,
            value: value.to_string(),
        }),
    }
}

/// Replace the port of a `host:port` address, keeping the host
fn with_port(addr: &str, port: u16) -> String {
    match addr.parse::<SocketAddr>() {
        Ok(mut parsed) => {
            parsed.set_port(port);
            parsed.to_string()
        }
        Err(_) => {
            let host = addr.rsplit_once(':').map(|(host, _)| host).unwrap_or(addr);
            format!("{}:{}", host, port)
        }
    }
}
