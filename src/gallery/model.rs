//! Gallery entry model.

use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::generation::model::DownloadTarget;

/// Titles keep at most this many characters of the description.
pub const TITLE_MAX_CHARS: usize = 50;

const TITLE_ELLIPSIS: &str = "...";

/// `dd.mm.yyyy, HH:MM:SS` in local time.
const DATE_FORMAT: &str = "%d.%m.%Y, %H:%M:%S";

/// A saved video. Entries are never modified after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryEntry {
    /// Save-time epoch milliseconds as a string.
    pub id: String,

    #[serde(rename = "url")]
    pub video_url: String,

    pub title: String,

    /// Human-readable creation time.
    #[serde(rename = "date")]
    pub created_at: String,
}

impl GalleryEntry {
    /// Builds an entry for a video saved at `now_ms`.
    pub fn new(video_url: impl Into<String>, description: &str, now_ms: i64) -> Self {
        Self {
            id: now_ms.to_string(),
            video_url: video_url.into(),
            title: gallery_title(description),
            created_at: format_created_at(now_ms),
        }
    }

    /// Download of a saved video: `video_<id>.mp4`.
    pub fn download_target(&self) -> DownloadTarget {
        DownloadTarget {
            url: self.video_url.clone(),
            file_name: format!("video_{}.mp4", self.id),
        }
    }
}

/// First `TITLE_MAX_CHARS` characters of `description`, with `...` appended
/// only when something was cut.
pub fn gallery_title(description: &str) -> String {
    let mut chars = description.chars();
    let mut title: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        title.push_str(TITLE_ELLIPSIS);
    }
    title
}

fn format_created_at(now_ms: i64) -> String {
    Local
        .timestamp_millis_opt(now_ms)
        .earliest()
        .map(|time| time.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| now_ms.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_short_description_unchanged() {
        assert_eq!(gallery_title("Sunset"), "Sunset");
        let exactly_fifty = "a".repeat(50);
        assert_eq!(gallery_title(&exactly_fifty), exactly_fifty);
    }

    #[test]
    fn test_title_long_description_truncated() {
        let long = "b".repeat(51);
        let title = gallery_title(&long);
        assert_eq!(title, format!("{}...", "b".repeat(50)));
    }

    #[test]
    fn test_title_counts_characters_not_bytes() {
        let cyrillic = "Космический корабль летит сквозь звёзды, камера медленно приближается";
        let title = gallery_title(cyrillic);
        assert!(title.ends_with("..."));
        assert_eq!(title.chars().count(), 53);
        assert!(cyrillic.starts_with(title.trim_end_matches("...")));
    }

    #[test]
    fn test_entry_fields() {
        let entry = GalleryEntry::new("https://cdn.example/v.svg", "Sunset", 1_700_000_000_000);
        assert_eq!(entry.id, "1700000000000");
        assert_eq!(entry.video_url, "https://cdn.example/v.svg");
        assert_eq!(entry.title, "Sunset");

        // dd.mm.yyyy, HH:MM:SS
        let date = entry.created_at.as_bytes();
        assert_eq!(date.len(), 20);
        assert_eq!(date[2], b'.');
        assert_eq!(date[5], b'.');
        assert_eq!(&date[10..12], b", ");
        assert_eq!(date[14], b':');
        assert_eq!(date[17], b':');
    }

    #[test]
    fn test_entry_wire_names() {
        let entry = GalleryEntry::new("u", "t", 5);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["id"], "5");
        assert_eq!(json["url"], "u");
        assert_eq!(json["title"], "t");
        assert!(json["date"].is_string());
    }

    #[test]
    fn test_entry_download_target() {
        let entry = GalleryEntry::new("u", "t", 42);
        let target = entry.download_target();
        assert_eq!(target.url, "u");
        assert_eq!(target.file_name, "video_42.mp4");
    }
}
