use crate::extractor::models::MediaInfo;
use crate::utils::error::TubedlError;
use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// One engine invocation, fully described.
///
/// Each variant corresponds to one step of an orchestrator flow; the
/// engine implementation maps it to concrete yt-dlp arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadRequest {
    /// Best audio, extracted to mp3, written to `output`
    Audio { url: String, output: PathBuf },

    /// Combined video+audio selector, merged into mp4 at `output`.
    /// `recode` forces a re-encode when the source is not already mp4.
    Video {
        url: String,
        selector: String,
        output: PathBuf,
        recode: bool,
    },

    /// A single stream picked by format id, written verbatim to `output`
    Stream {
        url: String,
        format_id: String,
        output: PathBuf,
    },

    /// Best audio extracted to opus next to `output_base`; the engine
    /// appends the extension, so callers locate the result by stem
    AudioIntermediate { url: String, output_base: PathBuf },
}

/// Core trait for the external download engine
///
/// Isolates the orchestrator from the concrete yt-dlp binary so flows
/// can be exercised against in-memory fakes.
#[async_trait]
pub trait MediaEngine: Send + Sync {
    /// Fetch metadata for a URL without downloading anything
    async fn fetch_info(&self, url: &str) -> Result<MediaInfo>;

    /// Perform one download. Returns the concrete error type so callers
    /// can match the recoverable `FormatUnavailable` variant explicitly.
    async fn download(&self, request: &DownloadRequest) -> Result<(), TubedlError>;
}
