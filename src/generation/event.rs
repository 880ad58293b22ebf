//! Notices emitted by session transitions.
//!
//! Each variant carries the data a presentation layer needs plus a ready-made
//! title and message for a toast.

use serde::{Deserialize, Serialize};

use super::model::format_clock;

/// Something the user should be told about after a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A new session started counting down.
    Started {
        estimated_total_secs: u32,
        audio_track_name: Option<String>,
    },

    /// One tick elapsed.
    Progress {
        remaining_secs: u32,
        progress_percent: u8,
    },

    /// A session persisted by an earlier run is counting down again.
    Resumed {
        remaining_secs: u32,
        estimated_total_secs: u32,
        audio_track_name: Option<String>,
    },

    /// The countdown finished and a result is available. `while_away` is set
    /// when it finished while nothing was ticking.
    Completed { video_url: String, while_away: bool },
}

impl SessionEvent {
    /// Short heading for a notification.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Started { .. } => "Generation started!",
            Self::Progress { .. } => "Creating video",
            Self::Resumed { .. } => "Generation continues",
            Self::Completed { .. } => "Video ready!",
        }
    }

    /// Body text for a notification.
    pub fn message(&self) -> String {
        match self {
            Self::Started {
                estimated_total_secs,
                audio_track_name: Some(name),
            } => format!(
                "With music {}. Time: {}",
                name,
                format_clock(*estimated_total_secs)
            ),
            Self::Started {
                estimated_total_secs,
                audio_track_name: None,
            } => format!("Estimated time: {}", format_clock(*estimated_total_secs)),
            Self::Progress { remaining_secs, .. } => {
                format!("Time remaining: {}", format_clock(*remaining_secs))
            }
            Self::Resumed {
                audio_track_name: Some(name),
                ..
            } => format!("With music: {}", name),
            Self::Resumed { .. } => "Your video is still being created".to_string(),
            Self::Completed {
                while_away: true, ..
            } => "Your video was created while you were away".to_string(),
            Self::Completed { .. } => {
                "Your video was created successfully and is ready to download".to_string()
            }
        }
    }

    /// False for per-tick progress, which updates a display rather than
    /// raising a notification.
    pub fn is_notice(&self) -> bool {
        !matches!(self, Self::Progress { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_started_messages() {
        let plain = SessionEvent::Started {
            estimated_total_secs: 180,
            audio_track_name: None,
        };
        assert_eq!(plain.title(), "Generation started!");
        assert_eq!(plain.message(), "Estimated time: 3m 0s");

        let with_music = SessionEvent::Started {
            estimated_total_secs: 95,
            audio_track_name: Some("beat.mp3".into()),
        };
        assert_eq!(with_music.message(), "With music beat.mp3. Time: 1m 35s");
    }

    #[test]
    fn test_completed_messages() {
        let away = SessionEvent::Completed {
            video_url: "u".into(),
            while_away: true,
        };
        assert_eq!(away.message(), "Your video was created while you were away");
        assert!(away.is_notice());

        let progress = SessionEvent::Progress {
            remaining_secs: 61,
            progress_percent: 66,
        };
        assert_eq!(progress.message(), "Time remaining: 1m 1s");
        assert!(!progress.is_notice());
    }

    #[test]
    fn test_tagged_serialization() {
        let event = SessionEvent::Completed {
            video_url: "u".into(),
            while_away: false,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "completed");
        assert_eq!(json["while_away"], false);
    }
}
