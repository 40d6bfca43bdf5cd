use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Schedule document served by `systemconfig/schedule`.
///
/// `cron` is opaque to the console: it is produced and consumed by the cron
/// builder widget.  Everything the console does not edit is kept in `extra`
/// so a save never drops fields the backend knows about.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_cron")]
    pub cron: String,
    /// Stored by the backend as the string "true" / "false".
    #[serde(default = "default_enable")]
    pub enable: String,
    /// Cap the length of a single run at `hours`:`minutes`.
    #[serde(default)]
    pub limit: bool,
    #[serde(default = "default_hours")]
    pub hours: i64,
    #[serde(default)]
    pub minutes: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syncstatus: Option<SyncStatus>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_cron() -> String {
    "0 1 * * 6".to_string()
}

fn default_enable() -> String {
    "false".to_string()
}

fn default_hours() -> i64 {
    1
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            cron: default_cron(),
            enable: default_enable(),
            limit: false,
            hours: default_hours(),
            minutes: 0,
            syncstatus: None,
            extra: Map::new(),
        }
    }
}

impl ScheduleConfig {
    pub fn is_enabled(&self) -> bool {
        self.enable == "true"
    }
}

/// Which peer hosts picked up the configuration after a schedule save.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStatus {
    #[serde(rename = "syncSuccess", default)]
    pub sync_success: Vec<String>,
    #[serde(rename = "syncFailure", default)]
    pub sync_failure: Vec<String>,
}

/// Host document served by `systemconfig/host`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HostOptions {
    /// Host selected to run alert generation.
    #[serde(default)]
    pub leader: String,
    /// Host that answered the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Snapshot returned by `systemconfig/status/status`.
///
/// Only `status` takes part in change detection; the remaining fields are
/// display-only and arrive as `"-"` when they do not apply.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub status: String,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub runstart: Option<String>,
    #[serde(default)]
    pub runend: Option<String>,
    #[serde(default)]
    pub runtime: Option<String>,
    #[serde(default)]
    pub leader: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
}

impl StatusSnapshot {
    pub fn is_running(&self) -> bool {
        self.status == "running"
    }
}

/// Counts returned by `systemconfig/status/progress`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    #[serde(rename = "fileCount", default)]
    pub file_count: u64,
    #[serde(rename = "queueCount", default)]
    pub queue_count: u64,
}

/// Metadata attribute list served by `systemconfig/metadata`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataConfig {
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body returned by `systemconfig/reset`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetOutcome {
    #[serde(default)]
    pub status: String,
}
