// Defaults for the console - these are the single source of truth for timing
// and resource locations.

// REST resources, relative to the configured base URL
pub const SCHEDULE_PATH: &str = "systemconfig/schedule";
pub const HOST_PATH: &str = "systemconfig/host";
pub const STATUS_PATH: &str = "systemconfig/status/:action";
pub const METADATA_PATH: &str = "systemconfig/metadata";
pub const RESET_PATH: &str = "systemconfig/reset";

// Status polling
pub const STATUS_POLL_INTERVAL_MS: u32 = 10_000;

// Save indicator: "success" appears after the first delay and is cleared
// entirely once the second delay (measured from the response) has passed.
pub const SAVE_CONFIRM_DELAY_MS: u32 = 500;
pub const SCHEDULE_SAVE_CLEAR_MS: u32 = 5_000;
pub const METADATA_SAVE_CLEAR_MS: u32 = 6_000;

// DOM ids
pub const APP_CONTAINER_ID: &str = "app-container";
pub const SCHEDULE_PANEL_ID: &str = "schedule-panel";
pub const STATUS_PANEL_ID: &str = "status-panel";
pub const METADATA_PANEL_ID: &str = "metadata-panel";
pub const CRON_INPUT_ID: &str = "croninput";
