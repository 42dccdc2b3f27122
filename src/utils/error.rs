//! Error handling for tubedl

use thiserror::Error;

/// Main error type for tubedl
#[derive(Debug, Error)]
pub enum TubedlError {
    #[error("yt-dlp not found. Please install yt-dlp")]
    YtDlpNotFound,

    #[error("ffmpeg not found. Please install ffmpeg")]
    FfmpegNotFound,

    #[error("Failed to extract media info: {0}")]
    Extraction(String),

    /// Recoverable: the preferred format selector matched nothing.
    /// The orchestrator retries once with a broader selector.
    #[error("Requested format not available: {0}")]
    FormatUnavailable(String),

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Merge failed: {0}")]
    Merge(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
