//! External transcoder (ffmpeg) and temp-file cleanup

use crate::utils::error::TubedlError;
use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Mux + re-encode seam, kept behind a trait so orchestrator flows can
/// be tested without a real ffmpeg
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Combine a video-only and an audio-only file into `output`.
    /// Non-zero exit from the underlying tool is fatal for the invocation.
    async fn mux_reencode(&self, video: &Path, audio: &Path, output: &Path)
        -> Result<(), TubedlError>;
}

/// ffmpeg-backed transcoder with a fixed quality profile:
/// visually-lossless H.264 (crf 23, preset fast) plus 192k AAC
pub struct FfmpegTranscoder {
    ffmpeg_path: PathBuf,
}

impl FfmpegTranscoder {
    pub fn new() -> Result<Self> {
        let ffmpeg_path = match which::which("ffmpeg") {
            Ok(path) => {
                info!("Found ffmpeg at: {}", path.display());
                path
            }
            Err(_) => {
                error!("ffmpeg not found on PATH!");
                return Err(TubedlError::FfmpegNotFound.into());
            }
        };

        Ok(Self { ffmpeg_path })
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn mux_reencode(
        &self,
        video: &Path,
        audio: &Path,
        output: &Path,
    ) -> Result<(), TubedlError> {
        debug!(
            "Transcoding {} + {} -> {}",
            video.display(),
            audio.display(),
            output.display()
        );

        let result = tokio::process::Command::new(&self.ffmpeg_path)
            .arg("-y")
            .arg("-i")
            .arg(video)
            .arg("-i")
            .arg(audio)
            .arg("-c:v")
            .arg("libx264")
            .arg("-preset")
            .arg("fast")
            .arg("-crf")
            .arg("23")
            .arg("-c:a")
            .arg("aac")
            .arg("-b:a")
            .arg("192k")
            .arg(output)
            .output()
            .await?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            error!("ffmpeg exited with {}: {}", result.status, stderr.trim());
            return Err(TubedlError::Merge(format!(
                "ffmpeg exited with {}: {}",
                result.status, stderr
            )));
        }

        info!("Transcoded into {}", output.display());
        Ok(())
    }
}

/// Remove temp files, tolerating ones that are already gone
pub async fn cleanup_temp_files(paths: &[PathBuf]) {
    for path in paths {
        match tokio::fs::remove_file(path).await {
            Ok(()) => debug!("Removed temp file: {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove temp file {}: {}", path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_cleanup_removes_existing_files() {
        let temp_dir = TempDir::new().unwrap();
        let file_a = temp_dir.path().join("temp_video.webm");
        let file_b = temp_dir.path().join("temp_audio.opus");
        std::fs::write(&file_a, b"v").unwrap();
        std::fs::write(&file_b, b"a").unwrap();

        cleanup_temp_files(&[file_a.clone(), file_b.clone()]).await;

        assert!(!file_a.exists());
        assert!(!file_b.exists());
    }

    #[tokio::test]
    async fn test_cleanup_tolerates_missing_files() {
        let temp_dir = TempDir::new().unwrap();
        let present = temp_dir.path().join("present.tmp");
        let missing = temp_dir.path().join("missing.tmp");
        std::fs::write(&present, b"x").unwrap();

        // Must not panic or error on the missing entry
        cleanup_temp_files(&[missing, present.clone()]).await;
        assert!(!present.exists());
    }
}
