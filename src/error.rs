//! Error types for generation sessions, the gallery and storage backends.

use thiserror::Error;

/// Result type alias for videoai operations.
pub type VideoResult<T> = Result<T, VideoError>;

/// Errors that can occur while driving a generation session.
#[derive(Error, Debug)]
pub enum VideoError {
    /// The description was empty or whitespace only.
    #[error("Enter a video description")]
    EmptyDescription,

    /// A session is already running; only one may be active.
    #[error("A video is already being generated")]
    AlreadyGenerating,

    /// The attached file is not an audio file.
    #[error("Choose an audio file: {name} has type {mime_type}")]
    NotAudioFile { name: String, mime_type: String },

    /// Duration outside the supported set.
    #[error("Unsupported duration: {0}")]
    InvalidDuration(String),

    /// Resolution outside the supported set.
    #[error("Unsupported resolution: {0}")]
    InvalidResolution(String),

    /// Export format outside the supported set.
    #[error("Unsupported format: {0}")]
    InvalidFormat(String),

    /// Unknown end time policy name.
    #[error("Unknown end time policy: {0}")]
    InvalidEndTimePolicy(String),

    /// No generated video is available yet.
    #[error("No generated video is available")]
    NoResult,

    /// Gallery entry not found.
    #[error("Gallery entry not found: {0}")]
    EntryNotFound(String),

    /// Storage key contains characters the backend cannot represent.
    #[error("Invalid storage key: {0}")]
    InvalidStorageKey(String),

    /// Backend read/write failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl VideoError {
    /// Creates a NotAudioFile error.
    pub fn not_audio_file(name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self::NotAudioFile {
            name: name.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Creates an EntryNotFound error.
    pub fn entry_not_found(id: impl Into<String>) -> Self {
        Self::EntryNotFound(id.into())
    }

    /// Creates an InvalidStorageKey error.
    pub fn invalid_storage_key(key: impl Into<String>) -> Self {
        Self::InvalidStorageKey(key.into())
    }

    /// Creates a Storage error.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Creates a Serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// True for user-correctable input problems that a UI shows as a
    /// dismissible notice rather than a failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyDescription
                | Self::AlreadyGenerating
                | Self::NotAudioFile { .. }
                | Self::InvalidDuration(_)
                | Self::InvalidResolution(_)
                | Self::InvalidFormat(_)
        )
    }
}

impl From<serde_json::Error> for VideoError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}
