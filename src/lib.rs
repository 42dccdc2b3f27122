//! tubedl library

pub mod downloader;
pub mod extractor;
pub mod shell;
pub mod utils;

// Re-export main types for easier use
pub use downloader::{DownloadOutcome, DownloadTarget, MediaKind, Orchestrator, Transcoder};
pub use extractor::{DownloadRequest, MediaEngine, MediaInfo, StreamDescriptor, YtDlpEngine};
pub use utils::{AppSettings, TubedlError};
