//! Gallery list operations.
//!
//! The whole list is one JSON array under the `videoGallery` key; every
//! mutation reads it, changes it in memory and writes it back in full.

use tracing::{info, warn};

use super::model::GalleryEntry;
use crate::error::{VideoError, VideoResult};
use crate::generation::model::DownloadTarget;
use crate::storage::{KeyValueStore, GALLERY_KEY};

/// The saved-videos list, newest first.
pub struct Gallery<S> {
    store: S,
}

impl<S: KeyValueStore> Gallery<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All entries, newest first. An absent or unreadable list is empty.
    pub fn list(&self) -> VideoResult<Vec<GalleryEntry>> {
        let Some(raw) = self.store.get(GALLERY_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(error) => {
                warn!(%error, "discarding unreadable gallery list");
                Ok(Vec::new())
            }
        }
    }

    /// Number of saved entries.
    pub fn len(&self) -> VideoResult<usize> {
        Ok(self.list()?.len())
    }

    pub fn is_empty(&self) -> VideoResult<bool> {
        Ok(self.list()?.is_empty())
    }

    /// Looks up an entry by id.
    pub fn get(&self, id: &str) -> VideoResult<Option<GalleryEntry>> {
        Ok(self.list()?.into_iter().find(|entry| entry.id == id))
    }

    /// Saves a video at the front of the list.
    ///
    /// The id is the save time in milliseconds, bumped forward if an entry
    /// with that id already exists.
    pub fn save(&self, video_url: &str, description: &str, now_ms: i64) -> VideoResult<GalleryEntry> {
        let mut entries = self.list()?;
        let mut stamp = now_ms;
        while entries.iter().any(|entry| entry.id == stamp.to_string()) {
            stamp += 1;
        }
        let mut entry = GalleryEntry::new(video_url, description, now_ms);
        entry.id = stamp.to_string();

        entries.insert(0, entry.clone());
        self.write(&entries)?;
        info!(id = %entry.id, total = entries.len(), "saved video to gallery");
        Ok(entry)
    }

    /// Removes the entry with `id`. Returns false when nothing matched; the
    /// remaining entries are left as they were.
    pub fn delete(&self, id: &str) -> VideoResult<bool> {
        let mut entries = self.list()?;
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        if entries.len() == before {
            return Ok(false);
        }
        self.write(&entries)?;
        info!(id, total = entries.len(), "deleted video from gallery");
        Ok(true)
    }

    /// Download target for a saved entry.
    pub fn download_target(&self, id: &str) -> VideoResult<DownloadTarget> {
        self.get(id)?
            .map(|entry| entry.download_target())
            .ok_or_else(|| VideoError::entry_not_found(id))
    }

    fn write(&self, entries: &[GalleryEntry]) -> VideoResult<()> {
        let raw = serde_json::to_string(entries)?;
        self.store.set(GALLERY_KEY, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    const URL: &str = "https://cdn.poehali.dev/placeholder.svg";

    #[test]
    fn test_empty_gallery() {
        let gallery = Gallery::new(MemoryStore::new());
        assert!(gallery.is_empty().unwrap());
        assert_eq!(gallery.get("1").unwrap(), None);
    }

    #[test]
    fn test_save_prepends() {
        let store = MemoryStore::new();
        let gallery = Gallery::new(store.clone());

        let first = gallery.save(URL, "first", 1_000).unwrap();
        let second = gallery.save(URL, "second", 2_000).unwrap();

        let entries = gallery.list().unwrap();
        assert_eq!(entries, vec![second, first]);
        assert!(store.contains(GALLERY_KEY));
    }

    #[test]
    fn test_save_title_truncation() {
        let gallery = Gallery::new(MemoryStore::new());
        let long = "x".repeat(80);
        let entry = gallery.save(URL, &long, 1_000).unwrap();
        assert_eq!(entry.title, format!("{}...", "x".repeat(50)));
        assert_eq!(gallery.len().unwrap(), 1);
    }

    #[test]
    fn test_save_same_millisecond_gets_unique_id() {
        let gallery = Gallery::new(MemoryStore::new());
        let a = gallery.save(URL, "a", 1_000).unwrap();
        let b = gallery.save(URL, "b", 1_000).unwrap();
        assert_eq!(a.id, "1000");
        assert_eq!(b.id, "1001");
    }

    #[test]
    fn test_delete_removes_exactly_one() {
        let gallery = Gallery::new(MemoryStore::new());
        let a = gallery.save(URL, "a", 1_000).unwrap();
        let b = gallery.save(URL, "b", 2_000).unwrap();
        let c = gallery.save(URL, "c", 3_000).unwrap();

        assert!(gallery.delete(&b.id).unwrap());
        assert_eq!(gallery.list().unwrap(), vec![c, a]);
    }

    #[test]
    fn test_delete_unknown_is_noop() {
        let store = MemoryStore::new();
        let gallery = Gallery::new(store.clone());
        gallery.save(URL, "a", 1_000).unwrap();
        let before = store.get(GALLERY_KEY).unwrap();

        assert!(!gallery.delete("999").unwrap());
        assert_eq!(store.get(GALLERY_KEY).unwrap(), before);
    }

    #[test]
    fn test_corrupt_list_reads_empty() {
        let store = MemoryStore::new();
        store.set(GALLERY_KEY, "{\"oops\":").unwrap();
        let gallery = Gallery::new(store);
        assert!(gallery.list().unwrap().is_empty());

        // Saving over a corrupt list starts a fresh one.
        gallery.save(URL, "a", 1_000).unwrap();
        assert_eq!(gallery.len().unwrap(), 1);
    }

    #[test]
    fn test_reads_list_written_by_browser() {
        let store = MemoryStore::new();
        store
            .set(
                GALLERY_KEY,
                r#"[{"id":"1712345678901","url":"https://cdn.poehali.dev/placeholder.svg","title":"Ocean","date":"05.04.2024, 21:34:38"}]"#,
            )
            .unwrap();
        let gallery = Gallery::new(store);
        let entry = gallery.get("1712345678901").unwrap().unwrap();
        assert_eq!(entry.title, "Ocean");
        assert_eq!(entry.created_at, "05.04.2024, 21:34:38");
    }

    #[test]
    fn test_download_target() {
        let gallery = Gallery::new(MemoryStore::new());
        let entry = gallery.save(URL, "a", 7).unwrap();
        assert_eq!(gallery.download_target(&entry.id).unwrap().file_name, "video_7.mp4");
        assert!(matches!(
            gallery.download_target("nope"),
            Err(VideoError::EntryNotFound(_))
        ));
    }
}
