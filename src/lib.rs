//! videoai - Simulated text-to-video generation with resumable countdowns.
//!
//! A generation request (description, duration, resolution, format and an
//! optional audio track) starts a countdown whose length is derived from the
//! options. The countdown is persisted to a key-value store on every step so
//! that a restarted process picks it up where wall-clock time says it should
//! be, and finished videos can be saved to a locally persisted gallery:
//!
//! - **Pure transitions**: `SessionState::start/tick/resume` never touch I/O
//! - **Explicit persistence**: `GenerationController` saves after each step
//! - **Pluggable storage**: in-memory, file directory, or browser `localStorage`
//!
//! # Example
//!
//! ```rust
//! use videoai::{
//!     ControllerConfig, GenerationController, GenerationRequest, ManualClock, MemoryStore,
//!     Resolution, VideoDuration,
//! };
//!
//! let store = MemoryStore::new();
//! let clock = ManualClock::new(1_700_000_000_000);
//! let mut controller =
//!     GenerationController::new(store.clone(), clock.clone(), ControllerConfig::default());
//!
//! // Pick up anything an earlier run left behind.
//! controller.resume().unwrap();
//!
//! let request = GenerationRequest::new("A spaceship flies through the stars")
//!     .with_duration(VideoDuration::Secs30)
//!     .with_resolution(Resolution::Hd720);
//! controller.submit(&request).unwrap();
//! assert_eq!(controller.remaining_secs(), 60);
//!
//! // The driver ticks once per second.
//! while controller.is_generating() {
//!     clock.advance(1_000);
//!     controller.tick().unwrap();
//! }
//!
//! let entry = controller.save_to_gallery(&request.description).unwrap();
//! assert_eq!(controller.gallery().list().unwrap(), vec![entry]);
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod gallery;
pub mod generation;
pub mod storage;

// Re-exports for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ControllerConfig, EndTimePolicy};
pub use error::{VideoError, VideoResult};
pub use gallery::{Gallery, GalleryEntry};
pub use generation::{
    estimate_generation_secs, DownloadTarget, ExportFormat, GenerationController,
    GenerationRequest, GenerationResult, Phase, Resolution, SessionEvent, SessionSnapshot,
    SessionState, VideoDuration,
};
pub use storage::{FileStore, KeyValueStore, MemoryStore};

#[cfg(feature = "wasm")]
pub use clock::JsClock;

#[cfg(feature = "wasm")]
pub use generation::JsGenerationController;

#[cfg(feature = "wasm")]
pub use storage::JsStorage;
