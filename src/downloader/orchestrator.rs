//! Download orchestration
//!
//! Sequences one download from metadata fetch to final file: path
//! derivation, skip-if-exists, engine invocation(s), and the optional
//! high-resolution merge/re-encode. Single-flow and blocking; nothing
//! here retries beyond the one documented standard-tier fallback.

use crate::downloader::catalog::{available_resolutions, find_stream_by_height};
use crate::downloader::paths::{build_target, DownloadTarget, MediaKind};
use crate::downloader::transcoder::{cleanup_temp_files, Transcoder};
use crate::extractor::models::MediaInfo;
use crate::extractor::traits::{DownloadRequest, MediaEngine};
use crate::utils::config::AppSettings;
use crate::utils::error::TubedlError;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Combined selector preferring native H.264 mp4 streams
fn avc1_selector(resolution: Option<u32>) -> String {
    match resolution {
        Some(height) => format!(
            "bestvideo[ext=mp4][vcodec^=avc1][height={height}]+bestaudio[ext=m4a]/best[ext=mp4][vcodec^=avc1]"
        ),
        None => "bestvideo[ext=mp4][vcodec^=avc1]+bestaudio[ext=m4a]/best[ext=mp4][vcodec^=avc1]"
            .to_string(),
    }
}

/// Broadest selector, used by every fallback
const GENERIC_BEST_SELECTOR: &str = "bestvideo+bestaudio/best";

/// Result of one orchestrated download
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// File was produced at this path
    Completed(PathBuf),
    /// File already existed at this path; nothing was downloaded
    Skipped(PathBuf),
}

impl DownloadOutcome {
    pub fn path(&self) -> &Path {
        match self {
            DownloadOutcome::Completed(p) | DownloadOutcome::Skipped(p) => p,
        }
    }
}

/// Drives the engine and transcoder for one download at a time
pub struct Orchestrator<E: MediaEngine, T: Transcoder> {
    engine: E,
    transcoder: T,
    settings: AppSettings,
}

impl<E: MediaEngine, T: Transcoder> Orchestrator<E, T> {
    pub fn new(engine: E, transcoder: T, settings: AppSettings) -> Self {
        Self { engine, transcoder, settings }
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    /// Metadata passthrough for the interactive shell
    pub async fn fetch_info(&self, url: &str) -> Result<MediaInfo> {
        self.engine.fetch_info(url).await
    }

    /// Audio flow: best audio extracted to mp3 at the derived path
    pub async fn download_audio(&self, url: &str) -> Result<DownloadOutcome> {
        let info = self.engine.fetch_info(url).await?;
        let target = build_target(&info, None, MediaKind::Audio, &self.settings.base_path);

        if let Some(outcome) = self.prepare_target(&target).await? {
            return Ok(outcome);
        }

        self.engine
            .download(&DownloadRequest::Audio {
                url: url.to_string(),
                output: target.full_path.clone(),
            })
            .await?;

        info!("Audio saved to {}", target.full_path.display());
        Ok(DownloadOutcome::Completed(target.full_path))
    }

    /// Video flow: standard tier at or below the configured threshold,
    /// merge/re-encode tier above it
    pub async fn download_video(
        &self,
        url: &str,
        requested: Option<u32>,
    ) -> Result<DownloadOutcome> {
        let info = self.engine.fetch_info(url).await?;
        let catalog = available_resolutions(&info.streams, &self.settings.selectable_containers);

        // The filename needs a height before anything is downloaded, so
        // a "best" request borrows the catalog maximum when one exists.
        let effective = requested.or_else(|| catalog.last().copied());
        let target = build_target(&info, effective, MediaKind::Video, &self.settings.base_path);

        if let Some(outcome) = self.prepare_target(&target).await? {
            return Ok(outcome);
        }

        match requested {
            Some(height) if height > self.settings.high_res_threshold => {
                self.download_high_res(url, &info, height, &target).await
            }
            _ => self.download_standard(url, requested, &target).await,
        }
    }

    /// Standard tier: one combined download, with a single explicit
    /// fallback to the generic selector when the preferred H.264
    /// combination is unavailable
    async fn download_standard(
        &self,
        url: &str,
        requested: Option<u32>,
        target: &DownloadTarget,
    ) -> Result<DownloadOutcome> {
        let preferred = DownloadRequest::Video {
            url: url.to_string(),
            selector: avc1_selector(requested),
            output: target.full_path.clone(),
            recode: false,
        };

        match self.engine.download(&preferred).await {
            Ok(()) => {}
            Err(TubedlError::FormatUnavailable(reason)) => {
                warn!(
                    "Preferred H.264 selection unavailable ({}), retrying with best streams and re-encode",
                    reason.trim()
                );
                let fallback = DownloadRequest::Video {
                    url: url.to_string(),
                    selector: GENERIC_BEST_SELECTOR.to_string(),
                    output: target.full_path.clone(),
                    recode: true,
                };
                self.engine.download(&fallback).await?;
            }
            Err(e) => return Err(e.into()),
        }

        info!("Video saved to {}", target.full_path.display());
        Ok(DownloadOutcome::Completed(target.full_path.clone()))
    }

    /// High-resolution tier: separate video and audio downloads muxed
    /// and re-encoded by the external transcoder
    async fn download_high_res(
        &self,
        url: &str,
        info: &MediaInfo,
        height: u32,
        target: &DownloadTarget,
    ) -> Result<DownloadOutcome> {
        let Some(stream) = find_stream_by_height(&info.streams, height) else {
            warn!("{}p not offered for this video, falling back to best available", height);
            return self
                .download_generic_best(url, target)
                .await;
        };

        let temp_video = target
            .directory
            .join(format!("temp_video_{}.{}", info.id, stream.ext));
        let temp_audio_base = target.directory.join(format!("temp_audio_{}", info.id));

        self.engine
            .download(&DownloadRequest::Stream {
                url: url.to_string(),
                format_id: stream.format_id.clone(),
                output: temp_video.clone(),
            })
            .await?;

        self.engine
            .download(&DownloadRequest::AudioIntermediate {
                url: url.to_string(),
                output_base: temp_audio_base.clone(),
            })
            .await?;

        let temp_audio = locate_intermediate_audio(&temp_audio_base).await?;

        let merge_result = self
            .transcoder
            .mux_reencode(&temp_video, &temp_audio, &target.full_path)
            .await;
        cleanup_temp_files(&[temp_video, temp_audio]).await;
        merge_result?;

        info!("Merged video saved to {}", target.full_path.display());
        Ok(DownloadOutcome::Completed(target.full_path.clone()))
    }

    /// Resolution-not-found fallback: generic best selector, no merge
    /// path and no further retries
    async fn download_generic_best(
        &self,
        url: &str,
        target: &DownloadTarget,
    ) -> Result<DownloadOutcome> {
        self.engine
            .download(&DownloadRequest::Video {
                url: url.to_string(),
                selector: GENERIC_BEST_SELECTOR.to_string(),
                output: target.full_path.clone(),
                recode: false,
            })
            .await?;

        info!("Video saved to {}", target.full_path.display());
        Ok(DownloadOutcome::Completed(target.full_path.clone()))
    }

    /// Create the destination directory and short-circuit when the file
    /// is already present
    async fn prepare_target(&self, target: &DownloadTarget) -> Result<Option<DownloadOutcome>> {
        tokio::fs::create_dir_all(&target.directory).await?;

        if target.full_path.exists() {
            info!("Already present, skipping: {}", target.full_path.display());
            return Ok(Some(DownloadOutcome::Skipped(target.full_path.clone())));
        }
        Ok(None)
    }
}

/// Find the audio intermediate the engine produced next to `base`.
///
/// The engine appends its own extension, so the file is matched by
/// stem. Missing file means the merge cannot proceed.
async fn locate_intermediate_audio(base: &Path) -> Result<PathBuf, TubedlError> {
    let dir = base.parent().unwrap_or_else(|| Path::new("."));
    let stem = base
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name
            .strip_prefix(stem)
            .is_some_and(|rest| rest.starts_with('.'))
        {
            return Ok(entry.path());
        }
    }

    Err(TubedlError::Merge(format!(
        "Audio temp file not found after download: {}",
        base.display()
    )))
}
