/// API route configuration
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApiConfig {
    /// Prefix for every resource path.  Empty means "relative to the page",
    /// which is how the console is served from inside the plugin host.
    base_url: String,
}

impl ApiConfig {
    /// Create a new ApiConfig from the API_BASE_URL environment variable
    pub fn new() -> Result<Self, &'static str> {
        if let Some(url) = option_env!("API_BASE_URL") {
            Ok(Self::from_url(url))
        } else {
            Err("API_BASE_URL environment variable is not set")
        }
    }

    /// Create a new ApiConfig from a URL string
    pub fn from_url(url: &str) -> Self {
        Self { base_url: url.trim_end_matches('/').to_string() }
    }

    /// Get the base URL for all API calls
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get a full URL for a resource path such as `systemconfig/schedule`
    pub fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if self.base_url.is_empty() {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

/// Timing knobs for the console controllers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub poll_interval_ms: u32,
    pub schedule_save: crate::save_indicator::SaveTiming,
    pub metadata_save: crate::save_indicator::SaveTiming,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: crate::constants::STATUS_POLL_INTERVAL_MS,
            schedule_save: crate::save_indicator::SaveTiming::schedule(),
            metadata_save: crate::save_indicator::SaveTiming::metadata(),
        }
    }
}
