//! Data structures for media information

use serde::{Deserialize, Serialize};

/// Snapshot of a video's metadata, fetched once per operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaInfo {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub uploader: Option<String>,
    /// Compact 8-digit form as reported by the engine, e.g. "20240115"
    #[serde(default)]
    pub upload_date: Option<String>,
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default, rename = "formats")]
    pub streams: Vec<StreamDescriptor>,
}

impl MediaInfo {
    /// Channel name with uploader as fallback
    pub fn channel_or_uploader(&self) -> Option<&str> {
        self.channel
            .as_deref()
            .or(self.uploader.as_deref())
            .filter(|s| !s.is_empty())
    }
}

/// A single selectable stream variant offered by the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamDescriptor {
    pub format_id: String,
    pub ext: String,
    #[serde(default)]
    pub vcodec: Option<String>,
    #[serde(default)]
    pub acodec: Option<String>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl StreamDescriptor {
    /// True when the stream carries a video track
    pub fn has_video(&self) -> bool {
        !matches!(self.vcodec.as_deref(), None | Some("none"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_ytdlp_json() {
        let json = r#"{
            "id": "abc123",
            "title": "Some Video",
            "channel": "Some Channel",
            "upload_date": "20240115",
            "duration": 213,
            "formats": [
                {"format_id": "140", "ext": "m4a", "vcodec": "none", "acodec": "mp4a.40.2"},
                {"format_id": "137", "ext": "mp4", "vcodec": "avc1.640028", "acodec": "none", "height": 1080}
            ]
        }"#;

        let info: MediaInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.id, "abc123");
        assert_eq!(info.channel_or_uploader(), Some("Some Channel"));
        assert_eq!(info.streams.len(), 2);
        assert!(!info.streams[0].has_video());
        assert!(info.streams[1].has_video());
        assert_eq!(info.streams[1].height, Some(1080));
    }

    #[test]
    fn test_uploader_fallback() {
        let info = MediaInfo {
            id: "x".into(),
            title: "t".into(),
            channel: None,
            uploader: Some("Uploader".into()),
            upload_date: None,
            duration: None,
            streams: vec![],
        };
        assert_eq!(info.channel_or_uploader(), Some("Uploader"));

        let info = MediaInfo { uploader: Some(String::new()), ..info };
        assert_eq!(info.channel_or_uploader(), None);
    }
}
