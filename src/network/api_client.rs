use std::rc::Rc;

use super::config::ApiConfig;
use super::resource::Resource;
use super::transport::{HttpTransport, Method};
use super::ApiError;
use crate::constants::{HOST_PATH, METADATA_PATH, RESET_PATH, SCHEDULE_PATH, STATUS_PATH};
use crate::models::{
    HostOptions, MetadataConfig, Progress, ResetOutcome, ScheduleConfig, StatusSnapshot,
};

/// REST client for the system configuration resources.  One instance per
/// console; every controller is handed a clone of the same `Rc`.
pub struct SystemConfigClient<H> {
    schedule: Resource<ScheduleConfig, H>,
    host: Resource<HostOptions, H>,
    status: Resource<StatusSnapshot, H>,
    metadata: Resource<MetadataConfig, H>,
    reset: Resource<ResetOutcome, H>,
}

impl<H: HttpTransport> SystemConfigClient<H> {
    pub fn new(config: &ApiConfig, transport: Rc<H>) -> Self {
        Self {
            schedule: Resource::new(config, SCHEDULE_PATH, transport.clone()),
            host: Resource::new(config, HOST_PATH, transport.clone()),
            status: Resource::new(config, STATUS_PATH, transport.clone())
                .with_default_param("action", "status")
                .with_action("stop", Method::Get, &[("action", "stop")])
                .with_action("progress", Method::Get, &[("action", "progress")]),
            metadata: Resource::new(config, METADATA_PATH, transport.clone()),
            reset: Resource::new(config, RESET_PATH, transport),
        }
    }

    // ---------------- Schedule ----------------

    pub async fn get_schedule(&self) -> Result<ScheduleConfig, ApiError> {
        self.schedule.get().await
    }

    pub async fn save_schedule(&self, schedule: &ScheduleConfig) -> Result<ScheduleConfig, ApiError> {
        self.schedule.save(schedule).await
    }

    // ---------------- Host ----------------

    pub async fn get_host(&self) -> Result<HostOptions, ApiError> {
        self.host.get().await
    }

    pub async fn save_host(&self, host: &HostOptions) -> Result<HostOptions, ApiError> {
        self.host.save(host).await
    }

    // ---------------- Status ----------------

    pub async fn get_status(&self) -> Result<StatusSnapshot, ApiError> {
        self.status.get().await
    }

    /// Ask the backend to interrupt the running job.  Answers with no body.
    pub async fn stop(&self) -> Result<(), ApiError> {
        self.status.invoke::<serde_json::Value>("stop").await.map(|_| ())
    }

    pub async fn get_progress(&self) -> Result<Progress, ApiError> {
        self.status
            .invoke::<Progress>("progress")
            .await
            .map(|p| p.unwrap_or_default())
    }

    // ---------------- Metadata ----------------

    pub async fn get_metadata(&self) -> Result<MetadataConfig, ApiError> {
        self.metadata.get().await
    }

    pub async fn save_metadata(&self, config: &MetadataConfig) -> Result<MetadataConfig, ApiError> {
        self.metadata.save(config).await
    }

    // ---------------- Maintenance ----------------

    /// Wipe the backend's file/queue/host tables and restore its default
    /// configuration.
    pub async fn reset(&self) -> Result<ResetOutcome, ApiError> {
        self.reset.get().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockTransport;
    use futures::executor::block_on;

    #[test]
    fn status_actions_share_one_endpoint() {
        let transport = Rc::new(MockTransport::new());
        transport.respond("/bb/systemconfig/status/status", r#"{"status":"running"}"#);
        transport.respond("/bb/systemconfig/status/stop", "");
        transport.respond("/bb/systemconfig/status/progress", r#"{"fileCount":9,"queueCount":1}"#);
        let client = SystemConfigClient::new(&ApiConfig::from_url("/bb"), transport.clone());

        assert_eq!(block_on(client.get_status()).unwrap().status, "running");
        block_on(client.stop()).unwrap();
        assert_eq!(block_on(client.get_progress()).unwrap().file_count, 9);

        assert_eq!(
            transport.urls(),
            vec![
                "/bb/systemconfig/status/status",
                "/bb/systemconfig/status/stop",
                "/bb/systemconfig/status/progress",
            ]
        );
        assert!(transport.requests().iter().all(|r| r.method == Method::Get));
    }

    #[test]
    fn reset_reads_outcome() {
        let transport = Rc::new(MockTransport::new());
        transport.respond("systemconfig/reset", r#"{"status":"successful"}"#);
        let client = SystemConfigClient::new(&ApiConfig::default(), transport);
        assert_eq!(block_on(client.reset()).unwrap().status, "successful");
    }
}
