// Re-export network modules
pub mod api_client;
pub mod config;
pub mod error;
pub mod resource;
pub mod transport;
pub mod ui_updates;

// Re-export commonly used items
pub use api_client::SystemConfigClient;
pub use error::ApiError;
pub use resource::Resource;
pub use transport::{FetchTransport, HttpRequest, HttpTransport, Method};

use config::ApiConfig;
use lazy_static::lazy_static;
use std::sync::RwLock;
use wasm_bindgen::prelude::*;

lazy_static! {
    static ref API_CONFIG: RwLock<Option<ApiConfig>> = RwLock::new(None);
}

/// Initialize the API configuration from the build-time `API_BASE_URL`.
pub fn init_api_config() -> Result<(), &'static str> {
    let config = ApiConfig::new()?;
    store_api_config(config);
    Ok(())
}

/// Initialize the API configuration from a JS-provided URL.
/// This allows the hosting page to point the console at the plugin's
/// absolute path without rebuilding.
#[wasm_bindgen]
pub fn init_api_config_js(api_base_url: &str) -> Result<(), JsValue> {
    crate::debug_log!("Initializing API config from JS: {}", api_base_url);
    store_api_config(ApiConfig::from_url(api_base_url));
    Ok(())
}

fn store_api_config(config: ApiConfig) {
    match API_CONFIG.write() {
        Ok(mut guard) => *guard = Some(config),
        Err(poisoned) => *poisoned.into_inner() = Some(config),
    }
}

/// Current API configuration, falling back to same-origin relative paths
/// when nothing was configured.
pub fn current_api_config() -> ApiConfig {
    API_CONFIG
        .read()
        .ok()
        .and_then(|guard| guard.clone())
        .unwrap_or_default()
}
