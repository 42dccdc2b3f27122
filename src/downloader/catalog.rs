//! Resolution catalog derived from the engine's stream list

use crate::extractor::models::StreamDescriptor;

/// Distinct available video heights, ascending.
///
/// A stream counts when it carries video, reports a height, and uses one
/// of the accepted containers. An empty result means "no selectable
/// resolution, let the engine pick its best".
pub fn available_resolutions(streams: &[StreamDescriptor], containers: &[String]) -> Vec<u32> {
    let mut heights: Vec<u32> = streams
        .iter()
        .filter(|s| s.has_video() && containers.iter().any(|c| c == &s.ext))
        .filter_map(|s| s.height)
        .collect();

    heights.sort_unstable();
    heights.dedup();
    heights
}

/// Exact-height lookup for the high-resolution merge path
pub fn find_stream_by_height(streams: &[StreamDescriptor], height: u32) -> Option<&StreamDescriptor> {
    streams
        .iter()
        .find(|s| s.has_video() && s.height == Some(height))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(format_id: &str, ext: &str, vcodec: Option<&str>, height: Option<u32>) -> StreamDescriptor {
        StreamDescriptor {
            format_id: format_id.to_string(),
            ext: ext.to_string(),
            vcodec: vcodec.map(String::from),
            acodec: None,
            height,
        }
    }

    fn mp4_webm() -> Vec<String> {
        vec!["mp4".to_string(), "webm".to_string()]
    }

    #[test]
    fn test_catalog_sorted_ascending_no_duplicates() {
        let streams = vec![
            stream("1", "mp4", Some("avc1"), Some(1080)),
            stream("2", "webm", Some("vp9"), Some(2160)),
            stream("3", "mp4", Some("avc1"), Some(360)),
            stream("4", "webm", Some("vp9"), Some(1080)),
            stream("5", "mp4", Some("avc1"), Some(720)),
        ];

        let catalog = available_resolutions(&streams, &mp4_webm());
        assert_eq!(catalog, vec![360, 720, 1080, 2160]);
    }

    #[test]
    fn test_catalog_skips_audio_only_and_unknown_height() {
        let streams = vec![
            stream("a", "m4a", Some("none"), None),
            stream("b", "mp4", None, Some(720)),
            stream("c", "mp4", Some("avc1"), None),
            stream("d", "mp4", Some("avc1"), Some(480)),
        ];

        let catalog = available_resolutions(&streams, &mp4_webm());
        assert_eq!(catalog, vec![480]);
    }

    #[test]
    fn test_catalog_respects_container_policy() {
        let streams = vec![
            stream("1", "mp4", Some("avc1"), Some(720)),
            stream("2", "webm", Some("vp9"), Some(2160)),
        ];

        let mp4_only = vec!["mp4".to_string()];
        assert_eq!(available_resolutions(&streams, &mp4_only), vec![720]);
        assert_eq!(available_resolutions(&streams, &mp4_webm()), vec![720, 2160]);
    }

    #[test]
    fn test_empty_streams_give_empty_catalog() {
        assert!(available_resolutions(&[], &mp4_webm()).is_empty());
    }

    #[test]
    fn test_find_stream_by_height() {
        let streams = vec![
            stream("audio", "webm", Some("none"), Some(2160)),
            stream("video", "webm", Some("vp9"), Some(2160)),
        ];

        let found = find_stream_by_height(&streams, 2160).unwrap();
        assert_eq!(found.format_id, "video");
        assert!(find_stream_by_height(&streams, 4320).is_none());
    }
}
