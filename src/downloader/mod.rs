//! Download orchestration module

pub mod catalog;
pub mod orchestrator;
pub mod paths;
pub mod transcoder;

// Re-export for convenience
pub use catalog::available_resolutions;
pub use orchestrator::{DownloadOutcome, Orchestrator};
pub use paths::{build_target, sanitize, DownloadTarget, MediaKind};
pub use transcoder::{FfmpegTranscoder, Transcoder};
