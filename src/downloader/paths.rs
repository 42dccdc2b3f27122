//! Deterministic output-path construction
//!
//! Everything here is pure: the orchestrator checks the computed target
//! for existence before any download starts, so the same metadata must
//! always map to the same path.

use crate::extractor::models::MediaInfo;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Folder used when the engine reports neither channel nor uploader
const UNKNOWN_CHANNEL: &str = "UnknownChannel";

/// What kind of file a flow produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
}

impl MediaKind {
    pub fn extension(self) -> &'static str {
        match self {
            MediaKind::Audio => "mp3",
            MediaKind::Video => "mp4",
        }
    }
}

/// Fully derived download destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub directory: PathBuf,
    pub filename: String,
    pub full_path: PathBuf,
}

/// Strip a title or channel name down to letters, digits, and spaces.
///
/// Colons are removed outright (they show up as separators in titles);
/// everything else non-alphanumeric is dropped. Idempotent.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|c| *c != ':')
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect()
}

/// Render the engine's compact upload date as ISO.
///
/// "20240115" becomes "2024-01-15"; a missing date renders literally as
/// "unknown"; anything unparseable passes through verbatim.
pub fn format_upload_date(upload_date: Option<&str>) -> String {
    match upload_date {
        None => "unknown".to_string(),
        Some(raw) => match NaiveDate::parse_from_str(raw, "%Y%m%d") {
            Ok(date) => date.format("%Y-%m-%d").to_string(),
            Err(_) => raw.to_string(),
        },
    }
}

/// Derive the destination for a download.
///
/// Directory is `{base}/{sanitized channel}`; filename is
/// `{date} - [{res}p - ]{sanitized title} - {id}.{ext}` with the
/// resolution segment omitted when `resolution` is `None`.
pub fn build_target(
    info: &MediaInfo,
    resolution: Option<u32>,
    kind: MediaKind,
    base_path: &Path,
) -> DownloadTarget {
    let channel = match info.channel_or_uploader() {
        Some(name) => {
            let cleaned = sanitize(name);
            if cleaned.trim().is_empty() {
                UNKNOWN_CHANNEL.to_string()
            } else {
                cleaned
            }
        }
        None => UNKNOWN_CHANNEL.to_string(),
    };

    let date = format_upload_date(info.upload_date.as_deref());
    let title = sanitize(&info.title);

    let filename = match resolution {
        Some(height) => format!(
            "{date} - {height}p - {title} - {id}.{ext}",
            id = info.id,
            ext = kind.extension()
        ),
        None => format!(
            "{date} - {title} - {id}.{ext}",
            id = info.id,
            ext = kind.extension()
        ),
    };

    let directory = base_path.join(channel);
    let full_path = directory.join(&filename);

    DownloadTarget { directory, filename, full_path }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_info() -> MediaInfo {
        MediaInfo {
            id: "abc123".to_string(),
            title: "Part 1: The Beginning!".to_string(),
            channel: Some("Cool Channel".to_string()),
            uploader: None,
            upload_date: Some("20240115".to_string()),
            duration: Some(120),
            streams: vec![],
        }
    }

    #[test]
    fn test_sanitize_strips_punctuation_keeps_spaces() {
        assert_eq!(sanitize("Part 1: The Beginning!"), "Part 1 The Beginning");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let once = sanitize("Mix: 90's & 00's [Remastered]");
        assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn test_sanitize_empty_input() {
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_format_upload_date_compact_to_iso() {
        assert_eq!(format_upload_date(Some("20240115")), "2024-01-15");
    }

    #[test]
    fn test_format_upload_date_unknown() {
        assert_eq!(format_upload_date(None), "unknown");
    }

    #[test]
    fn test_format_upload_date_unparseable_passthrough() {
        assert_eq!(format_upload_date(Some("sometime")), "sometime");
    }

    #[test]
    fn test_build_target_video_with_resolution() {
        let target = build_target(&sample_info(), Some(1080), MediaKind::Video, Path::new("/dl"));

        assert_eq!(target.directory, Path::new("/dl/Cool Channel"));
        assert_eq!(
            target.filename,
            "2024-01-15 - 1080p - Part 1 The Beginning - abc123.mp4"
        );
        assert_eq!(
            target.full_path,
            Path::new("/dl/Cool Channel/2024-01-15 - 1080p - Part 1 The Beginning - abc123.mp4")
        );
    }

    #[test]
    fn test_build_target_audio_omits_resolution() {
        let target = build_target(&sample_info(), None, MediaKind::Audio, Path::new("/dl"));
        assert_eq!(
            target.filename,
            "2024-01-15 - Part 1 The Beginning - abc123.mp3"
        );
    }

    #[test]
    fn test_build_target_is_pure_and_idempotent() {
        let info = sample_info();
        let a = build_target(&info, Some(720), MediaKind::Video, Path::new("/dl"));
        let b = build_target(&info, Some(720), MediaKind::Video, Path::new("/dl"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_build_target_unknown_channel_fallback() {
        let mut info = sample_info();
        info.channel = None;
        let target = build_target(&info, None, MediaKind::Audio, Path::new("/dl"));
        assert_eq!(target.directory, Path::new("/dl/UnknownChannel"));

        // A channel that sanitizes to nothing also falls back
        info.channel = Some("!!!".to_string());
        let target = build_target(&info, None, MediaKind::Audio, Path::new("/dl"));
        assert_eq!(target.directory, Path::new("/dl/UnknownChannel"));
    }
}
