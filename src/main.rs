// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Parser;
use hand_detect_node::{
    api::ApiServer,
    cli::Cli,
    config::NodeConfig,
    version,
    vision::{HandDetector, OnnxHandDetector},
};
use std::{env, sync::Arc};
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    init_tracing(cli.log_json);

    println!("🚀 Starting {}...\n", version::get_version_string());
    println!("📦 BUILD VERSION: {}", version::VERSION);
    println!();

    let mut config = NodeConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply_overrides(&mut config);
    config.validate().context("Invalid configuration")?;

    println!("🧠 Loading hand detection model...");
    println!("   Model: {}", config.detector.model_path.display());
    println!("   Confidence: {}", config.detector.detection_confidence);
    let detector: Arc<dyn HandDetector> = Arc::new(
        OnnxHandDetector::new(config.detector.clone())
            .context("Failed to initialize hand detector")?,
    );
    println!("✅ Hand detector ready ({})", detector.name());

    let server = ApiServer::new(config.api.clone(), detector.clone()).await?;
    println!("🌐 Listening on {}", server.local_addr());
    println!("   POST /detect-hand");
    println!("   WS   /ws/detect-hand");
    println!("   CORS origins: {}", config.api.cors_allowed_origins.join(", "));
    println!("\nPress Ctrl+C to stop\n");

    signal::ctrl_c().await?;
    println!("\n🛑 Shutting down...");

    server.shutdown().await;
    detector.release();
    info!("Hand detector released");

    println!("👋 Goodbye");
    Ok(())
}

fn init_tracing(json: bool) {
    let builder = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env());
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
