//! Application configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Application settings, loaded once at startup and read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Root of the download library
    #[serde(alias = "basePath")]
    pub base_path: PathBuf,

    /// Containers that count towards the resolution catalog
    pub selectable_containers: Vec<String>,

    /// Resolutions above this height go through the merge/re-encode path
    pub high_res_threshold: u32,

    /// Browser to pull cookies from (yt-dlp --cookies-from-browser)
    pub cookies_from_browser: Option<String>,

    /// YouTube player client override (yt-dlp extractor args)
    pub player_client: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            base_path: dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("YouTubeDownloads"),
            selectable_containers: vec!["mp4".to_string(), "webm".to_string()],
            high_res_threshold: 1080,
            cookies_from_browser: None,
            player_client: None,
        }
    }
}

impl AppSettings {
    /// Load settings from a JSON config file.
    ///
    /// A missing, unreadable, or malformed file falls back to defaults
    /// rather than aborting startup.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!("Invalid config file {}: {}, using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}
