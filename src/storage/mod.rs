//! Key-value storage backends.
//!
//! Session and gallery records are whole JSON strings under a fixed key,
//! written with last-writer-wins semantics, the same contract the browser's
//! `localStorage` offers:
//! - `memory`: in-process map (tests, benches)
//! - `file`: one `<key>.json` file per key under a directory (CLI)
//! - `wasm`: any JS object exposing `getItem`/`setItem`/`removeItem`

pub mod file;
pub mod memory;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use file::FileStore;
pub use memory::MemoryStore;

#[cfg(feature = "wasm")]
pub use wasm::JsStorage;

use crate::error::VideoResult;

/// Key under which the active session record is stored.
pub const SESSION_KEY: &str = "videoGeneration";

/// Key under which the gallery list is stored.
pub const GALLERY_KEY: &str = "videoGallery";

/// A string key-value store.
///
/// Methods take `&self`: a store value is a handle, and clones of it see the
/// same underlying entries.
pub trait KeyValueStore {
    /// Returns the value for `key`, or `None` when absent.
    fn get(&self, key: &str) -> VideoResult<Option<String>>;

    /// Replaces the value for `key`.
    fn set(&self, key: &str, value: &str) -> VideoResult<()>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> VideoResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> VideoResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> VideoResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> VideoResult<()> {
        (**self).remove(key)
    }
}
