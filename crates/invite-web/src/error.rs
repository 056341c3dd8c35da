use wasm_bindgen::JsValue;

/// Alias for `Result<T, WebError>`.
pub type WebResult<T> = Result<T, WebError>;

/// Startup failures of the browser binding.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// Not running in a window context.
    #[error("no global window")]
    NoWindow,

    /// The window has no document.
    #[error("window has no document")]
    NoDocument,

    /// The host page lacks an element the invitation needs.
    #[error("missing element #{0}")]
    MissingElement(&'static str),

    /// A DOM call threw.
    #[error("dom error: {0}")]
    Js(String),
}

impl WebError {
    /// Wrap a thrown JS value.
    pub fn js(value: &JsValue) -> Self {
        Self::Js(describe(value))
    }
}

impl From<WebError> for JsValue {
    fn from(err: WebError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Best-effort text for a thrown JS value.
pub fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
