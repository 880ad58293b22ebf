//! `GenerationController`: the session state machine bound to a store and a
//! clock.
//!
//! Every operation reads the clock, runs a pure transition from
//! `session.rs`, persists the resulting record (or removes it when the
//! session is no longer running) and only then adopts the new state. A
//! failed write leaves the in-memory state untouched.

use serde::Serialize;
use tracing::{debug, info};

use super::event::SessionEvent;
use super::model::{DownloadTarget, ExportFormat, GenerationRequest, GenerationResult, SessionRecord};
use super::session::{Phase, SessionState, Step};
use crate::clock::Clock;
use crate::config::ControllerConfig;
use crate::error::{VideoError, VideoResult};
use crate::gallery::{Gallery, GalleryEntry};
use crate::storage::KeyValueStore;

/// Read model for a presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub is_generating: bool,
    pub estimated_total_secs: u32,
    pub remaining_secs: u32,
    pub progress_percent: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_timestamp_ms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_track_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<GenerationResult>,
}

/// Drives one simulated generation at a time.
///
/// The controller does not own a timer: the driver calls [`tick`] every
/// [`ControllerConfig::tick_interval`] while [`is_generating`] is true.
///
/// [`tick`]: GenerationController::tick
/// [`is_generating`]: GenerationController::is_generating
pub struct GenerationController<S, C> {
    store: S,
    clock: C,
    config: ControllerConfig,
    state: SessionState,
}

impl<S: KeyValueStore, C: Clock> GenerationController<S, C> {
    // =========================================================================
    // INITIALIZATION
    // =========================================================================

    /// Creates an idle controller. Call [`resume`](Self::resume) to pick up a
    /// session persisted by an earlier run.
    pub fn new(store: S, clock: C, config: ControllerConfig) -> Self {
        Self {
            store,
            clock,
            config,
            state: SessionState::idle(),
        }
    }

    /// Reconstructs the session from the persisted record.
    ///
    /// Unreadable or inactive records are discarded. A session whose end time
    /// has already passed completes immediately.
    pub fn resume(&mut self) -> VideoResult<Option<SessionEvent>> {
        let record = SessionRecord::load(&self.store)?;
        let now = self.clock.now_ms();
        let step = SessionState::resume(record.as_ref(), now, &self.config);
        match &step.event {
            Some(SessionEvent::Resumed { remaining_secs, .. }) => {
                info!(remaining_secs, "resumed generation session");
            }
            Some(SessionEvent::Completed { .. }) => {
                info!("generation finished while not running");
            }
            _ => {}
        }
        self.apply(step)
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    /// Starts a new session from the form input.
    ///
    /// Rejected with `EmptyDescription` or `AlreadyGenerating` without
    /// touching state or storage.
    pub fn submit(&mut self, request: &GenerationRequest) -> VideoResult<SessionEvent> {
        let now = self.clock.now_ms();
        let (state, event) = self.state.start(request, now)?;
        self.commit(state)?;
        info!(
            estimated_total_secs = self.state.estimated_total_secs(),
            duration = request.duration.as_secs(),
            resolution = %request.resolution,
            format = %request.format,
            "generation started"
        );
        Ok(event)
    }

    /// Advances the countdown by one tick. Returns `None` when idle.
    pub fn tick(&mut self) -> VideoResult<Option<SessionEvent>> {
        if !self.state.is_generating() {
            return Ok(None);
        }
        let now = self.clock.now_ms();
        let step = self.state.tick(now, &self.config);
        match &step.event {
            Some(SessionEvent::Completed { .. }) => info!("generation completed"),
            Some(SessionEvent::Progress { remaining_secs, .. }) => {
                debug!(remaining_secs, "tick")
            }
            _ => {}
        }
        self.apply(step)
    }

    fn apply(&mut self, step: Step) -> VideoResult<Option<SessionEvent>> {
        self.commit(step.state)?;
        Ok(step.event)
    }

    fn commit(&mut self, state: SessionState) -> VideoResult<()> {
        match state.to_record() {
            Some(record) => record.save(&self.store)?,
            None => SessionRecord::clear(&self.store)?,
        }
        self.state = state;
        Ok(())
    }

    // =========================================================================
    // READ MODEL
    // =========================================================================

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_generating(&self) -> bool {
        self.state.is_generating()
    }

    pub fn remaining_secs(&self) -> u32 {
        self.state.remaining_secs()
    }

    pub fn estimated_total_secs(&self) -> u32 {
        self.state.estimated_total_secs()
    }

    pub fn progress_percent(&self) -> u8 {
        self.state.progress_percent()
    }

    /// The finished artifact, if the last session completed.
    pub fn result(&self) -> Option<&GenerationResult> {
        self.state.result()
    }

    /// Everything a display needs in one serializable value.
    pub fn snapshot(&self) -> SessionSnapshot {
        let running = self.state.running();
        SessionSnapshot {
            phase: self.state.phase(),
            is_generating: self.state.is_generating(),
            estimated_total_secs: self.state.estimated_total_secs(),
            remaining_secs: self.state.remaining_secs(),
            progress_percent: self.state.progress_percent(),
            end_timestamp_ms: running.map(|s| s.end_timestamp_ms),
            audio_track_name: running.and_then(|s| s.audio_track_name.clone()),
            result: self.state.result().cloned(),
        }
    }

    // =========================================================================
    // RESULT ACTIONS
    // =========================================================================

    /// File name and source for downloading the finished video.
    pub fn download_target(&self, format: ExportFormat) -> VideoResult<DownloadTarget> {
        let result = self.state.result().ok_or(VideoError::NoResult)?;
        Ok(DownloadTarget::for_result(result, format, self.clock.now_ms()))
    }

    /// Saves the finished video to the gallery, titled from `description`.
    pub fn save_to_gallery(&self, description: &str) -> VideoResult<GalleryEntry> {
        let result = self.state.result().ok_or(VideoError::NoResult)?;
        self.gallery()
            .save(&result.video_url, description, self.clock.now_ms())
    }

    /// The gallery sharing this controller's store.
    pub fn gallery(&self) -> Gallery<&S> {
        Gallery::new(&self.store)
    }
}

// =============================================================================
// TESTS
// =============================================================================
