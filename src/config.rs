//! Controller configuration.
//!
//! All settings have defaults matching the demo page, so a controller can be
//! built with `ControllerConfig::default()`. The CLI fills these from flags
//! and environment variables.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::VideoError;

/// Artifact reference every completed session produces.
pub const DEFAULT_PLACEHOLDER_URL: &str = "https://cdn.poehali.dev/placeholder.svg";

/// Interval between countdown ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// How the persisted end timestamp evolves while a session runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndTimePolicy {
    /// Every tick persists `now + remaining * 1000`. A late tick pushes the
    /// completion time back by the delay.
    #[default]
    Resync,
    /// The end timestamp is fixed at submit. Ticks also cap the remaining
    /// seconds at the wall-clock remainder, so late ticks cannot stretch
    /// the session.
    Pinned,
}

impl EndTimePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resync => "resync",
            Self::Pinned => "pinned",
        }
    }
}

impl fmt::Display for EndTimePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EndTimePolicy {
    type Err = VideoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "resync" => Ok(Self::Resync),
            "pinned" => Ok(Self::Pinned),
            other => Err(VideoError::InvalidEndTimePolicy(other.to_string())),
        }
    }
}

/// Settings for a `GenerationController`.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerConfig {
    /// End timestamp policy for running sessions.
    pub end_time_policy: EndTimePolicy,

    /// Artifact reference produced on completion.
    pub placeholder_url: String,

    /// How often the driver should call `tick()`.
    pub tick_interval: Duration,
}

impl ControllerConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: Set end time policy.
    pub fn with_end_time_policy(mut self, policy: EndTimePolicy) -> Self {
        self.end_time_policy = policy;
        self
    }

    /// Builder: Set placeholder artifact URL.
    pub fn with_placeholder_url(mut self, url: impl Into<String>) -> Self {
        self.placeholder_url = url.into();
        self
    }

    /// Builder: Set tick interval.
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            end_time_policy: EndTimePolicy::default(),
            placeholder_url: DEFAULT_PLACEHOLDER_URL.to_string(),
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ControllerConfig::default();
        assert_eq!(config.end_time_policy, EndTimePolicy::Resync);
        assert_eq!(config.placeholder_url, DEFAULT_PLACEHOLDER_URL);
        assert_eq!(config.tick_interval, Duration::from_secs(1));
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("pinned".parse::<EndTimePolicy>().unwrap(), EndTimePolicy::Pinned);
        assert_eq!(" Resync ".parse::<EndTimePolicy>().unwrap(), EndTimePolicy::Resync);
        assert!(matches!(
            "drift".parse::<EndTimePolicy>(),
            Err(VideoError::InvalidEndTimePolicy(_))
        ));
    }

    #[test]
    fn test_builder() {
        let config = ControllerConfig::new()
            .with_end_time_policy(EndTimePolicy::Pinned)
            .with_placeholder_url("https://example.com/v.mp4")
            .with_tick_interval(Duration::from_millis(250));
        assert_eq!(config.end_time_policy, EndTimePolicy::Pinned);
        assert_eq!(config.placeholder_url, "https://example.com/v.mp4");
        assert_eq!(config.tick_interval, Duration::from_millis(250));
    }
}
