//! Directory-backed store: each key lives in `<root>/<key>.json`.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::KeyValueStore;
use crate::error::{VideoError, VideoResult};

/// File-per-key store rooted at a directory.
///
/// The directory is created on first write. A missing file reads as an
/// absent key. Writes go to a temporary file in the same directory that is
/// then renamed over the target, so readers see the old or the new value,
/// never a partial one.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `root`. Nothing is touched on disk yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory holding the record files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> VideoResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.json")))
    }
}

fn validate_key(key: &str) -> VideoResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(VideoError::invalid_storage_key(key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> VideoResult<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(VideoError::storage(format!(
                "failed to read {}: {error}",
                path.display()
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> VideoResult<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.root).map_err(|error| {
            VideoError::storage(format!(
                "failed to create {}: {error}",
                self.root.display()
            ))
        })?;
        let write_error = |error: std::io::Error| {
            VideoError::storage(format!("failed to write {}: {error}", path.display()))
        };

        let mut file = NamedTempFile::new_in(&self.root).map_err(write_error)?;
        file.write_all(value.as_bytes()).map_err(write_error)?;
        file.as_file().sync_all().map_err(write_error)?;
        file.persist(&path).map_err(|error| write_error(error.error))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> VideoResult<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(VideoError::storage(format!(
                "failed to remove {}: {error}",
                path.display()
            ))),
        }
    }
}
