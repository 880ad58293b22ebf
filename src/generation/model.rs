//! Data models for generation requests, persisted session records and
//! produced artifacts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{VideoError, VideoResult};
use crate::storage::{KeyValueStore, SESSION_KEY};

// =============================================================================
// FORM OPTIONS
// =============================================================================

/// Generates a closed string-valued option enum with `as_str`, `label`,
/// `Display`, strict `FromStr` and serde support.
macro_rules! option_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $error:ident {
            $($variant:ident => $text:literal, $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Every supported value, in form order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire/form value.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }

            /// Human-readable label for option pickers.
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = VideoError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($text => Ok($name::$variant),)+
                    other => Err(VideoError::$error(other.to_string())),
                }
            }
        }
    };
}

option_enum! {
    /// Output resolution.
    Resolution, InvalidResolution {
        Hd720 => "1280x720", "HD (720p)",
        FullHd1080 => "1920x1080", "Full HD (1080p)",
        Uhd2160 => "3840x2160", "4K (2160p)",
    }
}

option_enum! {
    /// Export container format.
    ExportFormat, InvalidFormat {
        Mp4 => "mp4", "MP4",
        Mov => "mov", "MOV",
        Webm => "webm", "WebM",
    }
}

impl Resolution {
    /// Generation time multiplier for this resolution.
    pub fn multiplier(&self) -> f64 {
        resolution_multiplier(self.as_str())
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::FullHd1080
    }
}

impl ExportFormat {
    /// File extension (without the dot).
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

impl Default for ExportFormat {
    fn default() -> Self {
        Self::Mp4
    }
}

/// Requested video length. Serialized as a plain number of seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum VideoDuration {
    Secs30,
    Secs60,
    Secs120,
    Secs180,
    Secs240,
    Secs300,
}

impl VideoDuration {
    /// Every supported duration, shortest first.
    pub const ALL: &'static [VideoDuration] = &[
        Self::Secs30,
        Self::Secs60,
        Self::Secs120,
        Self::Secs180,
        Self::Secs240,
        Self::Secs300,
    ];

    pub fn as_secs(&self) -> u32 {
        match self {
            Self::Secs30 => 30,
            Self::Secs60 => 60,
            Self::Secs120 => 120,
            Self::Secs180 => 180,
            Self::Secs240 => 240,
            Self::Secs300 => 300,
        }
    }

    /// Human-readable label for option pickers.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Secs30 => "30 seconds",
            Self::Secs60 => "1 minute",
            Self::Secs120 => "2 minutes",
            Self::Secs180 => "3 minutes",
            Self::Secs240 => "4 minutes",
            Self::Secs300 => "5 minutes",
        }
    }
}

impl Default for VideoDuration {
    fn default() -> Self {
        Self::Secs60
    }
}

impl TryFrom<u32> for VideoDuration {
    type Error = VideoError;

    fn try_from(secs: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .iter()
            .copied()
            .find(|d| d.as_secs() == secs)
            .ok_or_else(|| VideoError::InvalidDuration(secs.to_string()))
    }
}

impl From<VideoDuration> for u32 {
    fn from(duration: VideoDuration) -> u32 {
        duration.as_secs()
    }
}

impl fmt::Display for VideoDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_secs())
    }
}

impl FromStr for VideoDuration {
    type Err = VideoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let secs: u32 = s
            .trim()
            .parse()
            .map_err(|_| VideoError::InvalidDuration(s.trim().to_string()))?;
        Self::try_from(secs)
    }
}

// =============================================================================
// ESTIMATION
// =============================================================================

/// Multiplier applied to the base generation time for a resolution string.
/// Unknown resolutions fall back to 1.0.
pub fn resolution_multiplier(resolution: &str) -> f64 {
    match resolution {
        "1920x1080" => 1.5,
        "3840x2160" => 2.5,
        _ => 1.0,
    }
}

/// Simulated generation time: `round(duration * 2 * multiplier)` seconds.
pub fn estimate_generation_secs(duration_secs: u32, resolution: &str) -> u32 {
    let base = f64::from(duration_secs) * 2.0;
    (base * resolution_multiplier(resolution)).round() as u32
}

/// Formats seconds as `"{m}m {s}s"`.
pub fn format_clock(secs: u32) -> String {
    format!("{}m {}s", secs / 60, secs % 60)
}

/// Accepts an uploaded file as the audio track when its MIME type is audio.
/// Returns the track name to attach.
pub fn validate_audio_upload(name: &str, mime_type: &str) -> VideoResult<String> {
    if mime_type.starts_with("audio/") {
        Ok(name.to_string())
    } else {
        Err(VideoError::not_audio_file(name, mime_type))
    }
}

// =============================================================================
// GENERATION REQUEST
// =============================================================================

/// Form input for a generation. Lives only in memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationRequest {
    /// Free-form description; must be non-empty after trimming.
    pub description: String,

    pub duration: VideoDuration,

    pub resolution: Resolution,

    pub format: ExportFormat,

    /// Name of the attached audio file; its contents are never read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_track_name: Option<String>,
}

impl GenerationRequest {
    /// Creates a request with the default options.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    /// Builder: Set duration.
    pub fn with_duration(mut self, duration: VideoDuration) -> Self {
        self.duration = duration;
        self
    }

    /// Builder: Set resolution.
    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Builder: Set export format.
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    /// Builder: Set audio track name.
    pub fn with_audio_track(mut self, name: impl Into<String>) -> Self {
        self.audio_track_name = Some(name.into());
        self
    }

    /// Attaches an uploaded file as the audio track. A non-audio upload is
    /// rejected and the current track is kept.
    pub fn attach_audio(&mut self, name: &str, mime_type: &str) -> VideoResult<()> {
        self.audio_track_name = Some(validate_audio_upload(name, mime_type)?);
        Ok(())
    }

    /// Detaches the audio track.
    pub fn clear_audio(&mut self) {
        self.audio_track_name = None;
    }

    /// Checks the request can be submitted.
    pub fn validate(&self) -> VideoResult<()> {
        if self.description.trim().is_empty() {
            return Err(VideoError::EmptyDescription);
        }
        Ok(())
    }

    /// Simulated generation time for this request.
    pub fn estimated_total_secs(&self) -> u32 {
        estimate_generation_secs(self.duration.as_secs(), self.resolution.as_str())
    }
}

// =============================================================================
// PERSISTED SESSION RECORD
// =============================================================================

/// The stored form of a running session, under the `videoGeneration` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub is_generating: bool,

    /// Total simulated seconds, fixed at submit.
    pub estimated_time: u32,

    pub remaining_time: u32,

    /// Expected completion instant, epoch milliseconds.
    pub end_time: i64,

    pub music_file_name: Option<String>,
}

impl SessionRecord {
    /// Reads the record. Absent and unparsable records both read as `None`.
    pub fn load<S: KeyValueStore>(store: &S) -> VideoResult<Option<Self>> {
        let Some(raw) = store.get(SESSION_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(record) => Ok(Some(record)),
            Err(error) => {
                warn!(%error, "discarding unreadable session record");
                Ok(None)
            }
        }
    }

    /// Overwrites the stored record.
    pub fn save<S: KeyValueStore>(&self, store: &S) -> VideoResult<()> {
        let raw = serde_json::to_string(self)?;
        store.set(SESSION_KEY, &raw)
    }

    /// Deletes the stored record.
    pub fn clear<S: KeyValueStore>(store: &S) -> VideoResult<()> {
        store.remove(SESSION_KEY)
    }
}

// =============================================================================
// ARTIFACTS
// =============================================================================

/// The artifact produced by a completed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub video_url: String,
}

impl GenerationResult {
    pub fn new(video_url: impl Into<String>) -> Self {
        Self {
            video_url: video_url.into(),
        }
    }
}

/// What a "save as" action needs: where to fetch from and what to name it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadTarget {
    pub url: String,
    pub file_name: String,
}

impl DownloadTarget {
    /// Download of a freshly generated video: `video_<now_ms>.<ext>`.
    pub fn for_result(result: &GenerationResult, format: ExportFormat, now_ms: i64) -> Self {
        Self {
            url: result.video_url.clone(),
            file_name: format!("video_{}.{}", now_ms, format.extension()),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_estimates() {
        assert_eq!(estimate_generation_secs(60, "1920x1080"), 180);
        assert_eq!(estimate_generation_secs(60, "3840x2160"), 300);
        assert_eq!(estimate_generation_secs(30, "1280x720"), 60);
        assert_eq!(estimate_generation_secs(300, "3840x2160"), 1500);
        assert_eq!(estimate_generation_secs(120, "640x480"), 240);
    }

    #[test]
    fn test_request_estimate_matches_formula() {
        for duration in VideoDuration::ALL {
            for resolution in Resolution::ALL {
                let request = GenerationRequest::new("x")
                    .with_duration(*duration)
                    .with_resolution(*resolution);
                let expected =
                    (f64::from(duration.as_secs()) * 2.0 * resolution.multiplier()).round() as u32;
                assert_eq!(request.estimated_total_secs(), expected);
            }
        }
    }

    #[test]
    fn test_request_defaults() {
        let request = GenerationRequest::new("A spaceship flies through the stars");
        assert_eq!(request.duration, VideoDuration::Secs60);
        assert_eq!(request.resolution, Resolution::FullHd1080);
        assert_eq!(request.format, ExportFormat::Mp4);
        assert_eq!(request.audio_track_name, None);
        assert_eq!(request.estimated_total_secs(), 180);
    }

    #[test]
    fn test_validate_description() {
        assert!(matches!(
            GenerationRequest::new("  ").validate(),
            Err(VideoError::EmptyDescription)
        ));
        assert!(matches!(
            GenerationRequest::new("\n\t").validate(),
            Err(VideoError::EmptyDescription)
        ));
        assert!(GenerationRequest::new("x").validate().is_ok());
    }

    #[test]
    fn test_option_parsing() {
        assert_eq!("3840x2160".parse::<Resolution>().unwrap(), Resolution::Uhd2160);
        assert_eq!("webm".parse::<ExportFormat>().unwrap(), ExportFormat::Webm);
        assert_eq!("180".parse::<VideoDuration>().unwrap(), VideoDuration::Secs180);
        assert!(matches!(
            "800x600".parse::<Resolution>(),
            Err(VideoError::InvalidResolution(_))
        ));
        assert!(matches!("avi".parse::<ExportFormat>(), Err(VideoError::InvalidFormat(_))));
        assert!(matches!("45".parse::<VideoDuration>(), Err(VideoError::InvalidDuration(_))));
        assert!(matches!("soon".parse::<VideoDuration>(), Err(VideoError::InvalidDuration(_))));
    }

    #[test]
    fn test_request_serde_shape() {
        let request = GenerationRequest::new("x")
            .with_duration(VideoDuration::Secs120)
            .with_resolution(Resolution::Hd720)
            .with_format(ExportFormat::Mov);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["duration"], 120);
        assert_eq!(json["resolution"], "1280x720");
        assert_eq!(json["format"], "mov");

        let parsed: GenerationRequest =
            serde_json::from_str(r#"{"description":"y","duration":300}"#).unwrap();
        assert_eq!(parsed.duration, VideoDuration::Secs300);
        assert_eq!(parsed.resolution, Resolution::FullHd1080);

        assert!(serde_json::from_str::<GenerationRequest>(r#"{"duration":61}"#).is_err());
    }

    #[test]
    fn test_attach_audio() {
        let mut request = GenerationRequest::new("x");
        request.attach_audio("beat.mp3", "audio/mpeg").unwrap();
        assert_eq!(request.audio_track_name.as_deref(), Some("beat.mp3"));

        let err = request.attach_audio("cover.png", "image/png").unwrap_err();
        assert!(matches!(err, VideoError::NotAudioFile { .. }));
        assert_eq!(request.audio_track_name.as_deref(), Some("beat.mp3"));

        request.clear_audio();
        assert_eq!(request.audio_track_name, None);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(180), "3m 0s");
        assert_eq!(format_clock(59), "0m 59s");
        assert_eq!(format_clock(1500), "25m 0s");
    }

    #[test]
    fn test_record_wire_format() {
        let record = SessionRecord {
            is_generating: true,
            estimated_time: 180,
            remaining_time: 170,
            end_time: 1_700_000_170_000,
            music_file_name: None,
        };
        let json: serde_json::Value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "isGenerating": true,
                "estimatedTime": 180,
                "remainingTime": 170,
                "endTime": 1_700_000_170_000_i64,
                "musicFileName": null,
            })
        );
    }

    #[test]
    fn test_record_load_save_clear() {
        let store = MemoryStore::new();
        assert_eq!(SessionRecord::load(&store).unwrap(), None);

        let record = SessionRecord {
            is_generating: true,
            estimated_time: 60,
            remaining_time: 60,
            end_time: 60_000,
            music_file_name: Some("beat.mp3".into()),
        };
        record.save(&store).unwrap();
        assert_eq!(SessionRecord::load(&store).unwrap(), Some(record));

        SessionRecord::clear(&store).unwrap();
        assert!(!store.contains(SESSION_KEY));
    }

    #[test]
    fn test_record_load_corrupt_is_absent() {
        let store = MemoryStore::new();
        store.set(SESSION_KEY, "{not json").unwrap();
        assert_eq!(SessionRecord::load(&store).unwrap(), None);

        store.set(SESSION_KEY, r#"{"isGenerating":true}"#).unwrap();
        assert_eq!(SessionRecord::load(&store).unwrap(), None);
    }

    #[test]
    fn test_download_target_for_result() {
        let result = GenerationResult::new("https://cdn.example/v.svg");
        let target = DownloadTarget::for_result(&result, ExportFormat::Webm, 1_700_000_000_123);
        assert_eq!(target.url, "https://cdn.example/v.svg");
        assert_eq!(target.file_name, "video_1700000000123.webm");
    }
}
