//! The generation session state machine.
//!
//! Transitions are pure: they take the current state and the wall-clock time
//! and return the next state plus an optional notice. Persisting the result
//! is the caller's job (see `GenerationController`).
//!
//! ```text
//!            start                  tick (remaining > 1)
//!   Idle ──────────────▶ Running ◀───────────────┐
//!    ▲                     │  └─────────────────┘
//!    │  tick (remaining ≤ 1) / resume past end
//!    └─────────────────────┘   (produces a result)
//! ```

use serde::{Deserialize, Serialize};

use super::event::SessionEvent;
use super::model::{GenerationRequest, GenerationResult, SessionRecord};
use crate::config::{ControllerConfig, EndTimePolicy};
use crate::error::{VideoError, VideoResult};

/// Coarse lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
}

/// An active countdown.
///
/// Invariant: `remaining_secs <= estimated_total_secs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningSession {
    pub estimated_total_secs: u32,
    pub remaining_secs: u32,
    /// Expected completion instant, epoch milliseconds.
    pub end_timestamp_ms: i64,
    pub audio_track_name: Option<String>,
}

impl RunningSession {
    /// `round((1 - remaining / estimated) * 100)`; 100 for a zero estimate.
    pub fn progress_percent(&self) -> u8 {
        if self.estimated_total_secs == 0 {
            return 100;
        }
        let done = 1.0 - f64::from(self.remaining_secs) / f64::from(self.estimated_total_secs);
        (done * 100.0).round().clamp(0.0, 100.0) as u8
    }

    /// The record persisted while this session runs.
    pub fn to_record(&self) -> SessionRecord {
        SessionRecord {
            is_generating: true,
            estimated_time: self.estimated_total_secs,
            remaining_time: self.remaining_secs,
            end_time: self.end_timestamp_ms,
            music_file_name: self.audio_track_name.clone(),
        }
    }
}

/// Whole-seconds left until `end_ms`, rounded up; 0 once it has passed.
fn secs_until(end_ms: i64, now_ms: i64) -> u32 {
    let remaining_ms = end_ms.saturating_sub(now_ms);
    if remaining_ms <= 0 {
        return 0;
    }
    let secs = remaining_ms / 1000 + i64::from(remaining_ms % 1000 != 0);
    u32::try_from(secs).unwrap_or(u32::MAX)
}

fn end_after(now_ms: i64, secs: u32) -> i64 {
    now_ms.saturating_add(i64::from(secs) * 1000)
}

/// Result of a transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub state: SessionState,
    pub event: Option<SessionEvent>,
}

impl Step {
    fn quiet(state: SessionState) -> Self {
        Self { state, event: None }
    }

    fn with_event(state: SessionState, event: SessionEvent) -> Self {
        Self {
            state,
            event: Some(event),
        }
    }
}

/// Current session state. A result, once produced, stays available in
/// `Idle` until the next session starts.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle { result: Option<GenerationResult> },
    Running(RunningSession),
}

impl Default for SessionState {
    fn default() -> Self {
        Self::idle()
    }
}

impl SessionState {
    /// Idle with no result.
    pub fn idle() -> Self {
        Self::Idle { result: None }
    }

    pub fn phase(&self) -> Phase {
        match self {
            Self::Idle { .. } => Phase::Idle,
            Self::Running(_) => Phase::Running,
        }
    }

    pub fn is_generating(&self) -> bool {
        matches!(self, Self::Running(_))
    }

    /// The active countdown, if any.
    pub fn running(&self) -> Option<&RunningSession> {
        match self {
            Self::Running(session) => Some(session),
            Self::Idle { .. } => None,
        }
    }

    /// The produced artifact, if the last session completed.
    pub fn result(&self) -> Option<&GenerationResult> {
        match self {
            Self::Idle { result } => result.as_ref(),
            Self::Running(_) => None,
        }
    }

    pub fn remaining_secs(&self) -> u32 {
        self.running().map_or(0, |s| s.remaining_secs)
    }

    pub fn estimated_total_secs(&self) -> u32 {
        self.running().map_or(0, |s| s.estimated_total_secs)
    }

    /// Percent complete: the countdown's progress while running, 100 once a
    /// result exists, 0 otherwise.
    pub fn progress_percent(&self) -> u8 {
        match self {
            Self::Running(session) => session.progress_percent(),
            Self::Idle { result: Some(_) } => 100,
            Self::Idle { result: None } => 0,
        }
    }

    /// What should be persisted for this state; `None` means no record.
    pub fn to_record(&self) -> Option<SessionRecord> {
        self.running().map(RunningSession::to_record)
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    /// `Idle → Running` on submit. Any previous result is dropped.
    pub fn start(
        &self,
        request: &GenerationRequest,
        now_ms: i64,
    ) -> VideoResult<(SessionState, SessionEvent)> {
        if self.is_generating() {
            return Err(VideoError::AlreadyGenerating);
        }
        request.validate()?;

        let estimated = request.estimated_total_secs();
        let session = RunningSession {
            estimated_total_secs: estimated,
            remaining_secs: estimated,
            end_timestamp_ms: end_after(now_ms, estimated),
            audio_track_name: request.audio_track_name.clone(),
        };
        let event = SessionEvent::Started {
            estimated_total_secs: estimated,
            audio_track_name: session.audio_track_name.clone(),
        };
        Ok((Self::Running(session), event))
    }

    /// One countdown tick. Idle states are returned unchanged.
    pub fn tick(&self, now_ms: i64, config: &ControllerConfig) -> Step {
        let Self::Running(session) = self else {
            return Step::quiet(self.clone());
        };

        let mut next = session.remaining_secs.saturating_sub(1);
        if config.end_time_policy == EndTimePolicy::Pinned {
            next = next.min(secs_until(session.end_timestamp_ms, now_ms));
        }
        if next == 0 {
            return Self::complete(config, false);
        }

        let end_timestamp_ms = match config.end_time_policy {
            EndTimePolicy::Resync => end_after(now_ms, next),
            EndTimePolicy::Pinned => session.end_timestamp_ms,
        };
        let session = RunningSession {
            remaining_secs: next,
            end_timestamp_ms,
            ..session.clone()
        };
        let event = SessionEvent::Progress {
            remaining_secs: next,
            progress_percent: session.progress_percent(),
        };
        Step::with_event(Self::Running(session), event)
    }

    /// Rebuilds state from a persisted record at start-up.
    ///
    /// Records that are absent, not generating, or lack an end time yield
    /// `Idle`. A future end time resumes the countdown from the wall-clock
    /// remainder; a past one completes immediately. The persisted end is
    /// carried over as is, only pulled in when the remainder was clamped to
    /// the estimate, so reopening never moves completion later.
    pub fn resume(record: Option<&SessionRecord>, now_ms: i64, config: &ControllerConfig) -> Step {
        let Some(record) = record else {
            return Step::quiet(Self::idle());
        };
        if !record.is_generating || record.end_time <= 0 {
            return Step::quiet(Self::idle());
        }

        let remaining = secs_until(record.end_time, now_ms).min(record.estimated_time);
        if remaining == 0 {
            return Self::complete(config, true);
        }

        let end_timestamp_ms = record.end_time.min(end_after(now_ms, remaining));
        let session = RunningSession {
            estimated_total_secs: record.estimated_time,
            remaining_secs: remaining,
            end_timestamp_ms,
            audio_track_name: record.music_file_name.clone(),
        };
        let event = SessionEvent::Resumed {
            remaining_secs: remaining,
            estimated_total_secs: record.estimated_time,
            audio_track_name: session.audio_track_name.clone(),
        };
        Step::with_event(Self::Running(session), event)
    }

    fn complete(config: &ControllerConfig, while_away: bool) -> Step {
        let result = GenerationResult::new(config.placeholder_url.clone());
        let event = SessionEvent::Completed {
            video_url: result.video_url.clone(),
            while_away,
        };
        Step::with_event(
            Self::Idle {
                result: Some(result),
            },
            event,
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================
