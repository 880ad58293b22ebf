//! WASM bindings for the generation controller.
//!
//! The page owns the timer: it calls `tick()` from `setInterval` every
//! `tickIntervalMs()` while `isGenerating()` is true, and renders the notices
//! the controller returns.

use js_sys::Array;
use serde::Serialize;
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::prelude::*;

use super::controller::GenerationController;
use super::event::SessionEvent;
use super::model::{
    estimate_generation_secs as estimate, validate_audio_upload as validate_audio, ExportFormat,
    GenerationRequest, Resolution, VideoDuration,
};
use crate::clock::JsClock;
use crate::config::{ControllerConfig, EndTimePolicy};
use crate::error::VideoError;
use crate::storage::JsStorage;

/// Serialize a value to a plain JS object.
fn to_js_value<T: Serialize>(value: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    value.serialize(&Serializer::json_compatible())
}

// =============================================================================
// ERROR CONVERSION
// =============================================================================

impl From<VideoError> for JsValue {
    fn from(err: VideoError) -> JsValue {
        JsValue::from_str(&err.to_string())
    }
}

/// Helper macro for Result conversion
macro_rules! js_result {
    ($expr:expr) => {
        $expr.map_err(|e: VideoError| JsValue::from(e))
    };
}

/// An event plus its toast text, as handed to JavaScript.
#[derive(Serialize)]
struct JsNotice<'a> {
    #[serde(flatten)]
    event: &'a SessionEvent,
    title: &'static str,
    message: String,
    notice: bool,
}

fn notice_to_js(event: Option<&SessionEvent>) -> Result<JsValue, JsValue> {
    match event {
        Some(event) => Ok(to_js_value(&JsNotice {
            event,
            title: event.title(),
            message: event.message(),
            notice: event.is_notice(),
        })?),
        None => Ok(JsValue::NULL),
    }
}

// =============================================================================
// MAIN WRAPPER TYPE
// =============================================================================

/// JavaScript-friendly wrapper around `GenerationController`, persisting to a
/// Web Storage object.
#[wasm_bindgen]
pub struct JsGenerationController {
    inner: GenerationController<JsStorage, JsClock>,
}

#[wasm_bindgen]
impl JsGenerationController {
    /// Creates an idle controller over `storage` (normally
    /// `window.localStorage`). `endTimePolicy` is `"resync"` (default) or
    /// `"pinned"`.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const controller = new JsGenerationController(window.localStorage);
    /// const notice = controller.resume();
    /// if (notice) toast(notice.title, notice.message);
    /// ```
    #[wasm_bindgen(constructor)]
    pub fn new(
        storage: JsValue,
        end_time_policy: Option<String>,
    ) -> Result<JsGenerationController, JsValue> {
        let policy = match end_time_policy {
            Some(name) => js_result!(name.parse::<EndTimePolicy>())?,
            None => EndTimePolicy::default(),
        };
        let config = ControllerConfig::default().with_end_time_policy(policy);
        Ok(JsGenerationController {
            inner: GenerationController::new(JsStorage::new(storage), JsClock, config),
        })
    }

    /// Picks up a persisted session. Returns a notice object or `null`.
    pub fn resume(&mut self) -> Result<JsValue, JsValue> {
        let event = js_result!(self.inner.resume())?;
        notice_to_js(event.as_ref())
    }

    /// Starts a generation.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// controller.submit({
    ///   description: 'A spaceship flies through the stars',
    ///   duration: 60,
    ///   resolution: '1920x1080',
    ///   format: 'mp4',
    ///   audio_track_name: 'beat.mp3',
    /// });
    /// ```
    pub fn submit(&mut self, request: JsValue) -> Result<JsValue, JsValue> {
        let request: GenerationRequest = from_value(request)?;
        let event = js_result!(self.inner.submit(&request))?;
        notice_to_js(Some(&event))
    }

    /// Advances the countdown. Returns a notice object, or `null` when idle.
    pub fn tick(&mut self) -> Result<JsValue, JsValue> {
        let event = js_result!(self.inner.tick())?;
        notice_to_js(event.as_ref())
    }

    /// Current read model: phase, remaining/estimated seconds, percent and
    /// result.
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        Ok(to_js_value(&self.inner.snapshot())?)
    }

    #[wasm_bindgen(js_name = isGenerating)]
    pub fn is_generating(&self) -> bool {
        self.inner.is_generating()
    }

    #[wasm_bindgen(js_name = progressPercent)]
    pub fn progress_percent(&self) -> u8 {
        self.inner.progress_percent()
    }

    #[wasm_bindgen(js_name = tickIntervalMs)]
    pub fn tick_interval_ms(&self) -> u32 {
        self.inner.config().tick_interval.as_millis() as u32
    }
}

// =============================================================================
// RESULT AND GALLERY METHODS
// =============================================================================

#[wasm_bindgen]
impl JsGenerationController {
    /// `{ url, file_name }` for downloading the finished video.
    #[wasm_bindgen(js_name = downloadTarget)]
    pub fn download_target(&self, format: &str) -> Result<JsValue, JsValue> {
        let format: ExportFormat = js_result!(format.parse())?;
        let target = js_result!(self.inner.download_target(format))?;
        Ok(to_js_value(&target)?)
    }

    /// Saves the finished video; returns the new entry.
    #[wasm_bindgen(js_name = saveToGallery)]
    pub fn save_to_gallery(&self, description: &str) -> Result<JsValue, JsValue> {
        let entry = js_result!(self.inner.save_to_gallery(description))?;
        Ok(to_js_value(&entry)?)
    }

    /// All gallery entries, newest first.
    pub fn gallery(&self) -> Result<Array, JsValue> {
        let entries = js_result!(self.inner.gallery().list())?;
        let array = Array::new();
        for entry in &entries {
            array.push(&to_js_value(entry)?);
        }
        Ok(array)
    }

    #[wasm_bindgen(js_name = deleteFromGallery)]
    pub fn delete_from_gallery(&self, id: &str) -> Result<bool, JsValue> {
        js_result!(self.inner.gallery().delete(id))
    }

    #[wasm_bindgen(js_name = galleryDownloadTarget)]
    pub fn gallery_download_target(&self, id: &str) -> Result<JsValue, JsValue> {
        let target = js_result!(self.inner.gallery().download_target(id))?;
        Ok(to_js_value(&target)?)
    }
}

// =============================================================================
// FREE FUNCTIONS
// =============================================================================

/// Simulated generation time in seconds for a duration and resolution.
#[wasm_bindgen(js_name = estimateGenerationSecs)]
pub fn estimate_generation_secs(duration_secs: u32, resolution: &str) -> u32 {
    estimate(duration_secs, resolution)
}

/// Returns the track name for an audio upload, or throws for other files.
#[wasm_bindgen(js_name = validateAudioUpload)]
pub fn validate_audio_upload(name: &str, mime_type: &str) -> Result<String, JsValue> {
    js_result!(validate_audio(name, mime_type))
}

#[derive(Serialize)]
struct JsOption {
    value: String,
    label: &'static str,
}

#[derive(Serialize)]
struct JsFormOptions {
    durations: Vec<JsOption>,
    resolutions: Vec<JsOption>,
    formats: Vec<JsOption>,
}

/// Option lists for the form pickers: `{ durations, resolutions, formats }`,
/// each an array of `{ value, label }`.
#[wasm_bindgen(js_name = formOptions)]
pub fn form_options() -> Result<JsValue, JsValue> {
    let options = JsFormOptions {
        durations: VideoDuration::ALL
            .iter()
            .map(|d| JsOption {
                value: d.to_string(),
                label: d.label(),
            })
            .collect(),
        resolutions: Resolution::ALL
            .iter()
            .map(|r| JsOption {
                value: r.to_string(),
                label: r.label(),
            })
            .collect(),
        formats: ExportFormat::ALL
            .iter()
            .map(|f| JsOption {
                value: f.to_string(),
                label: f.label(),
            })
            .collect(),
    };
    Ok(to_js_value(&options)?)
}
