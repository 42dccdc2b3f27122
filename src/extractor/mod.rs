pub mod models;
pub mod traits;
pub mod ytdlp;

pub use models::{MediaInfo, StreamDescriptor};
pub use traits::{DownloadRequest, MediaEngine};
pub use ytdlp::{normalize_url, EngineOptions, YtDlpEngine};
