//! Browser storage backend.

use js_sys::{Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};

use super::KeyValueStore;
use crate::error::{VideoError, VideoResult};

/// Store backed by a JS object with the Web Storage interface
/// (`getItem`, `setItem`, `removeItem`), normally `window.localStorage`.
#[derive(Debug, Clone)]
pub struct JsStorage {
    inner: JsValue,
}

impl JsStorage {
    /// Wraps a Web Storage object.
    pub fn new(storage: JsValue) -> Self {
        Self { inner: storage }
    }

    fn method(&self, name: &str) -> VideoResult<Function> {
        Reflect::get(&self.inner, &JsValue::from_str(name))
            .map_err(js_error)?
            .dyn_into::<Function>()
            .map_err(|_| VideoError::storage(format!("storage object has no {name}() method")))
    }
}

fn js_error(value: JsValue) -> VideoError {
    VideoError::storage(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

impl KeyValueStore for JsStorage {
    fn get(&self, key: &str) -> VideoResult<Option<String>> {
        let value = self
            .method("getItem")?
            .call1(&self.inner, &JsValue::from_str(key))
            .map_err(js_error)?;
        // getItem returns null for absent keys.
        Ok(value.as_string())
    }

    fn set(&self, key: &str, value: &str) -> VideoResult<()> {
        self.method("setItem")?
            .call2(&self.inner, &JsValue::from_str(key), &JsValue::from_str(value))
            .map_err(js_error)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> VideoResult<()> {
        self.method("removeItem")?
            .call1(&self.inner, &JsValue::from_str(key))
            .map_err(js_error)?;
        Ok(())
    }
}
