//! Locally persisted list of saved videos.
//!
//! - `model`: the `GalleryEntry` record and title/date derivation
//! - `manager`: `Gallery`, list/save/delete over a key-value store

pub mod manager;
pub mod model;

pub use manager::Gallery;
pub use model::{gallery_title, GalleryEntry, TITLE_MAX_CHARS};
