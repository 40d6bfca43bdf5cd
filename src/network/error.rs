use thiserror::Error;
use wasm_bindgen::JsValue;

/// Every way a resource call can fail.  The console never shows these to the
/// user; they end up in the console log and flip the form's save indicator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("request failed to complete: {0}")]
    Transport(String),

    #[error("API request failed: {status} {status_text}")]
    Status { status: u16, status_text: String },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("failed to encode request body: {0}")]
    Encode(String),

    #[error("resource has no action named '{0}'")]
    UnknownAction(String),
}

impl From<JsValue> for ApiError {
    fn from(value: JsValue) -> Self {
        ApiError::Transport(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

impl From<ApiError> for JsValue {
    fn from(err: ApiError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
