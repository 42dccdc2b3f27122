//! tubedl - Interactive yt-dlp/ffmpeg download tool
//!
//! Wraps the external yt-dlp binary for extraction and ffmpeg for
//! high-resolution merge/re-encode, saving downloads into a structured
//! per-channel folder layout.

use anyhow::{Context, Result};
use std::path::Path;
use tubedl::downloader::{FfmpegTranscoder, Orchestrator};
use tubedl::extractor::{EngineOptions, YtDlpEngine};
use tubedl::shell;
use tubedl::utils::AppSettings;

const CONFIG_FILE: &str = "config.json";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let settings = AppSettings::load(Path::new(CONFIG_FILE));

    let engine = YtDlpEngine::new(EngineOptions {
        cookies_from_browser: settings.cookies_from_browser.clone(),
        player_client: settings.player_client.clone(),
    })
    .context("yt-dlp is required. Install it with `pip install yt-dlp` or `brew install yt-dlp`")?;

    let transcoder = FfmpegTranscoder::new()
        .context("ffmpeg is required for high-resolution merging. Install it from your package manager")?;

    println!("=== tubedl (interactive downloader) ===");
    println!("Base download path: {}\n", settings.base_path.display());

    let orchestrator = Orchestrator::new(engine, transcoder, settings);
    shell::run(&orchestrator).await
}
