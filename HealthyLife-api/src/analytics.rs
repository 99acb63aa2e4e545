//! Fire-and-forget analytics beacon

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use crate::config::AppConfig;

/// Event names reported by the API
pub mod events {
    pub const ASSESSMENT_STARTED: &str = "assessment_started";
    pub const MEASUREMENTS_SUBMITTED: &str = "measurements_submitted";
    pub const ADVISORY_SHOWN: &str = "advisory_shown";
    pub const ASSESSMENT_COMPLETED: &str = "assessment_completed";
}

/// Prefix added to every event name on the wire
const EVENT_PREFIX: &str = "kk:";

/// Records usage events; implementations never block or fail the caller
#[cfg_attr(test, mockall::automock)]
pub trait EventRecorder: Send + Sync {
    fn record_event(&self, name: &str);
}

/// Posts events to the beacon endpoint on a background task
pub struct BeaconRecorder {
    client: reqwest::Client,
    endpoint: String,
}

impl BeaconRecorder {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

impl EventRecorder for BeaconRecorder {
    fn record_event(&self, name: &str) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!("No runtime available, dropping event {}", name);
            return;
        };

        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let body = json!({ "event": format!("{}{}", EVENT_PREFIX, name) });

        handle.spawn(async move {
            match client.post(&endpoint).json(&body).send().await {
                Ok(response) => debug!("Analytics event sent: {}", response.status()),
                Err(e) => debug!("Analytics event failed: {}", e),
            }
        });
    }
}

/// Drops every event
pub struct NoopRecorder;

impl EventRecorder for NoopRecorder {
    fn record_event(&self, _name: &str) {}
}

/// Recorder for the configured analytics mode
pub fn create_recorder(config: &AppConfig) -> Arc<dyn EventRecorder> {
    if config.analytics_enabled {
        debug!("Analytics beacon enabled: {}", config.analytics_endpoint);
        Arc::new(BeaconRecorder::new(config.analytics_endpoint.clone()))
    } else {
        Arc::new(NoopRecorder)
    }
}
