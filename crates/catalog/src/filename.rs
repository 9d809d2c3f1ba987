//! Clip file names: `YYYY-MM-DD_HH-MM-SS-<camera>.<ext>`

use chrono::NaiveDateTime;

/// Length of the `YYYY-MM-DD_HH-MM-SS` prefix
const KEY_LEN: usize = 19;
const KEY_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// A clip file name split into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipName<'a> {
    pub key: NaiveDateTime,
    /// Raw camera suffix, not yet resolved against the camera table
    pub camera: &'a str,
    pub extension: &'a str,
}

/// Parse a clip file name. Anything that does not fit the pattern is `None`.
pub fn parse_clip_name(file_name: &str) -> Option<ClipName<'_>> {
    let (stem, extension) = file_name.rsplit_once('.')?;
    if extension.is_empty() {
        return None;
    }
    let key_part = stem.get(..KEY_LEN)?;
    let camera = stem.get(KEY_LEN..)?.strip_prefix('-')?;
    if camera.is_empty() {
        return None;
    }
    let key = NaiveDateTime::parse_from_str(key_part, KEY_FORMAT).ok()?;
    Some(ClipName {
        key,
        camera,
        extension,
    })
}

/// Format a clip key the way file names spell it
pub fn format_clip_key(key: &NaiveDateTime) -> String {
    key.format(KEY_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_valid() {
        let parsed = parse_clip_name("2024-03-09_10-01-00-left_repeater.mp4").unwrap();
        assert_eq!(
            parsed.key,
            NaiveDate::from_ymd_opt(2024, 3, 9)
                .unwrap()
                .and_hms_opt(10, 1, 0)
                .unwrap()
        );
        assert_eq!(parsed.camera, "left_repeater");
        assert_eq!(parsed.extension, "mp4");
        assert_eq!(format_clip_key(&parsed.key), "2024-03-09_10-01-00");
    }

    #[test]
    fn test_other_extensions_accepted() {
        assert_eq!(
            parse_clip_name("2024-03-09_10-01-00-front.MOV").map(|c| c.camera),
            Some("front")
        );
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(parse_clip_name("2024-03-09_10-01-00.mp4").is_none());
        assert!(parse_clip_name("2024-03-09_10-01-00-.mp4").is_none());
        assert!(parse_clip_name("2024-03-09_10-01-00-front").is_none());
        assert!(parse_clip_name("2024-13-09_10-01-00-front.mp4").is_none());
        assert!(parse_clip_name("thumb.png").is_none());
        assert!(parse_clip_name("event.json").is_none());
        assert!(parse_clip_name("2024-03-09_10-01-00_front.mp4").is_none());
        assert!(parse_clip_name("日本語日本語日本語日本語日本語.mp4").is_none());
    }
}
