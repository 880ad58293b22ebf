//! Simulated generation sessions.
//!
//! Provides the countdown state machine, its persisted record and the
//! controller that binds both to a store and a clock.

pub mod controller;
pub mod event;
pub mod model;
pub mod session;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-exports for convenience
pub use controller::{GenerationController, SessionSnapshot};
pub use event::SessionEvent;
pub use model::{
    estimate_generation_secs, format_clock, resolution_multiplier, validate_audio_upload,
    DownloadTarget, ExportFormat, GenerationRequest, GenerationResult, Resolution, SessionRecord,
    VideoDuration,
};
pub use session::{Phase, RunningSession, SessionState, Step};

#[cfg(feature = "wasm")]
pub use wasm::JsGenerationController;
